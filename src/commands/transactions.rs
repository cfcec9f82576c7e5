// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{ids, kind, optional, required, settled};
use crate::models::{Id, ListFilter, NewTransaction, Transaction, TransactionUpdate};
use crate::store::Store;
use crate::transport::Transport;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table, start_of_day};
use anyhow::{Result, bail};
use serde::Serialize;

pub fn handle<T: Transport>(store: &Store<T>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => {
            let ids = ids(sub);
            settled(store.delete_transactions(&ids))?;
            println!("Removed {} transaction(s)", ids.len());
        }
        _ => {}
    }
    Ok(())
}

fn add<T: Transport>(store: &Store<T>, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(required(sub, "date")?)?;
    let tx = NewTransaction {
        name: required(sub, "name")?.trim().to_string(),
        amount: parse_decimal(required(sub, "amount")?)?,
        description: optional(sub, "description"),
        transaction_type_id: kind(sub)?.id(),
        date: start_of_day(date),
        category_id: optional(sub, "category").map(Id::from),
    };
    settled(store.create_transaction(&tx))?;
    println!("Recorded {} '{}' on {}", tx.amount, tx.name, date);
    Ok(())
}

fn edit<T: Transport>(store: &Store<T>, sub: &clap::ArgMatches) -> Result<()> {
    let update = TransactionUpdate {
        id: Id::from(required(sub, "id")?.trim()),
        name: required(sub, "name")?.trim().to_string(),
        description: optional(sub, "description"),
        category_id: optional(sub, "category").map(Id::from),
    };
    settled(store.edit_transaction(&update))?;
    println!("Updated transaction {}", update.id);
    Ok(())
}

fn list<T: Transport>(store: &Store<T>, sub: &clap::ArgMatches) -> Result<()> {
    let filter = list_filter(sub)?;
    settled(store.filter_transactions(&filter))?;
    let data: Vec<TransactionRow> = store
        .state()
        .transactions
        .transactions
        .iter()
        .map(TransactionRow::from)
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.id.clone(),
                    r.name.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.currency.clone(),
                    r.category.clone(),
                    r.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "ID", "Name", "Type", "Amount", "CCY", "Category", "Description"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub date: String,
    pub id: String,
    pub name: String,
    pub kind: String,
    pub amount: String,
    pub currency: String,
    pub category: String,
    pub description: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(t: &Transaction) -> Self {
        Self {
            date: t.date.date_naive().to_string(),
            id: t.id.to_string(),
            name: t.name.clone(),
            kind: t.kind.name.clone(),
            amount: t.amount.round_dp(2).to_string(),
            currency: t.currency.as_ref().map(|c| c.name.clone()).unwrap_or_default(),
            category: t.category_name.clone().unwrap_or_default(),
            description: t.description.clone().unwrap_or_default(),
        }
    }
}

/// Build the server-side filter from `list` arguments. Shared with `rules list`.
pub fn list_filter(sub: &clap::ArgMatches) -> Result<ListFilter> {
    let filter = ListFilter {
        name: optional(sub, "name"),
        amount_from: optional(sub, "amount_from")
            .map(|s| parse_decimal(&s))
            .transpose()?,
        amount_to: optional(sub, "amount_to")
            .map(|s| parse_decimal(&s))
            .transpose()?,
        date_from: optional(sub, "from").map(|s| parse_date(&s)).transpose()?,
        date_to: optional(sub, "to").map(|s| parse_date(&s)).transpose()?,
        page_size: sub.get_one::<u32>("limit").copied(),
    };
    if let (Some(from), Some(to)) = (filter.amount_from, filter.amount_to) {
        if from > to {
            bail!("--amount-from {} is greater than --amount-to {}", from, to);
        }
    }
    if let (Some(from), Some(to)) = (filter.date_from, filter.date_to) {
        if from > to {
            bail!("--from {} is after --to {}", from, to);
        }
    }
    Ok(filter)
}
