// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod auth;
pub mod exporter;
pub mod importer;
pub mod reports;
pub mod rules;
pub mod transactions;

use crate::models::{Id, TransactionKind};
use crate::store::Settled;
use anyhow::{Result, anyhow, bail};

/// Turn the outcome of a store intent into a CLI error.
pub fn settled(outcome: Settled) -> Result<()> {
    match outcome {
        Settled::Fulfilled => Ok(()),
        Settled::Rejected(msg) => Err(anyhow!(msg)),
        Settled::SessionEnded(msg) => Err(anyhow!("{msg} (run `fintrack login`)")),
    }
}

pub(crate) fn required<'a>(m: &'a clap::ArgMatches, key: &str) -> Result<&'a String> {
    m.get_one::<String>(key)
        .ok_or_else(|| anyhow!("missing --{}", key.replace('_', "-")))
}

pub(crate) fn optional(m: &clap::ArgMatches, key: &str) -> Option<String> {
    m.get_one::<String>(key)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub(crate) fn ids(m: &clap::ArgMatches) -> Vec<Id> {
    m.get_many::<String>("id")
        .into_iter()
        .flatten()
        .map(|s| Id::from(s.trim()))
        .collect()
}

pub(crate) fn kind(m: &clap::ArgMatches) -> Result<TransactionKind> {
    let raw = required(m, "type")?;
    match TransactionKind::parse(raw) {
        Some(k) => Ok(k),
        None => bail!("Unknown transaction type '{}' (use income|expense)", raw.trim()),
    }
}
