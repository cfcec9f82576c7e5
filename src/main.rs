// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fintrack::config::LOG_ENV;
use fintrack::{AuthScheme, TrackerBuilder, cli, commands, db};

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut builder = TrackerBuilder::new();
    if let Some(url) = matches.get_one::<String>("api_url") {
        builder = builder.base_url(url.trim());
    }
    if let Some(raw) = matches.get_one::<String>("auth_scheme") {
        let scheme: AuthScheme = raw.parse().map_err(|e: String| anyhow!(e))?;
        builder = builder.auth_scheme(scheme);
    }
    if let Some(secs) = matches.get_one::<u64>("timeout") {
        builder = builder.timeout(Duration::from_secs(*secs));
    }
    tracing::debug!(
        api = %builder.config().base_url,
        db = %db::db_path()?.display(),
        "starting fintrack"
    );
    let store = builder.build()?;

    match matches.subcommand() {
        Some(("login", sub)) => commands::auth::login(&store, sub)?,
        Some(("register", sub)) => commands::auth::register(&store, sub)?,
        Some(("logout", _)) => commands::auth::logout(&store)?,
        Some(("whoami", sub)) => commands::auth::whoami(&store, sub)?,
        Some(("account", sub)) => commands::accounts::handle(&store, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&store, sub)?,
        Some(("rules", sub)) => commands::rules::handle(&store, sub)?,
        Some(("report", sub)) => commands::reports::handle(&store, sub)?,
        Some(("import", sub)) => commands::importer::handle(&store, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
