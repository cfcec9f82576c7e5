// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{optional, required};
use crate::models::{DocumentExtension, ExportQuery};
use crate::store::Store;
use crate::transport::Transport;
use crate::utils::parse_date;
use anyhow::{Context, Result, anyhow};

pub fn handle<T: Transport>(store: &Store<T>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(store, sub),
        _ => Ok(()),
    }
}

pub fn export_query(sub: &clap::ArgMatches) -> Result<ExportQuery> {
    let fmt = required(sub, "format")?;
    let format = DocumentExtension::parse(fmt)
        .ok_or_else(|| anyhow!("Unknown format: {} (use xlsx|csv)", fmt.trim()))?;
    Ok(ExportQuery {
        date_from: optional(sub, "from").map(|s| parse_date(&s)).transpose()?,
        date_to: optional(sub, "to").map(|s| parse_date(&s)).transpose()?,
        format,
    })
}

fn export_transactions<T: Transport>(store: &Store<T>, sub: &clap::ArgMatches) -> Result<()> {
    let query = export_query(sub)?;
    let out = required(sub, "out")?.trim();
    let bytes = store.export_transactions(&query)?;
    std::fs::write(out, &bytes).with_context(|| format!("Write {}", out))?;
    println!("Exported transactions to {} ({} bytes)", out, bytes.len());
    Ok(())
}
