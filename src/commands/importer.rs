// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{required, settled};
use crate::models::DocumentExtension;
use crate::store::Store;
use crate::transport::Transport;
use anyhow::{Context, Result, anyhow, bail};
use std::path::Path;

pub fn handle<T: Transport>(store: &Store<T>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(store, sub),
        Some(("template", sub)) => download_template(store, sub),
        _ => Ok(()),
    }
}

/// Accepts only the formats the server can parse, judged by file extension.
pub fn upload_format(path: &Path) -> Result<DocumentExtension> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| anyhow!("File {} has no extension (use .xlsx or .csv)", path.display()))?;
    DocumentExtension::parse(ext)
        .ok_or_else(|| anyhow!("Unsupported file type '.{}' (use .xlsx or .csv)", ext))
}

fn import_transactions<T: Transport>(store: &Store<T>, sub: &clap::ArgMatches) -> Result<()> {
    let path = Path::new(required(sub, "path")?.trim());
    upload_format(path)?;
    let bytes = std::fs::read(path).with_context(|| format!("Read {}", path.display()))?;
    if bytes.is_empty() {
        bail!("File {} is empty", path.display());
    }
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("transactions")
        .to_string();

    store.import_transactions(&file_name, bytes)?;
    settled(store.fetch_transactions())?;
    println!(
        "Imported {}; {} transaction(s) now on record",
        file_name,
        store.state().transactions.transactions.len()
    );
    Ok(())
}

fn download_template<T: Transport>(store: &Store<T>, sub: &clap::ArgMatches) -> Result<()> {
    let raw = required(sub, "format")?;
    let format = DocumentExtension::parse(raw)
        .ok_or_else(|| anyhow!("Unknown format: {} (use xlsx|csv)", raw.trim()))?;
    let out = required(sub, "out")?.trim();
    let bytes = store.import_template(format)?;
    std::fs::write(out, bytes).with_context(|| format!("Write {}", out))?;
    println!("Saved {} import template to {}", format.extension(), out);
    Ok(())
}
