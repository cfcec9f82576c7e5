// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::settled;
use crate::store::Store;
use crate::transport::Transport;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle<T: Transport>(store: &Store<T>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("monthly", sub)) => monthly(store, sub)?,
        Some(("savings", sub)) => savings(store, sub)?,
        _ => {
            settled(store.fetch_reports())?;
            let reports = store.state().reports;
            println!(
                "{} month(s) of income/expense, {} month(s) of savings",
                reports.monthly.len(),
                reports.savings.len()
            );
        }
    }
    Ok(())
}

fn monthly<T: Transport>(store: &Store<T>, sub: &clap::ArgMatches) -> Result<()> {
    settled(store.fetch_monthly_reports())?;
    let data = store.state().reports.monthly;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.month.format("%Y-%m").to_string(),
                    format!("{:.2}", r.total_income_amount),
                    r.total_income_transaction_count.to_string(),
                    format!("{:.2}", r.total_expense_amount),
                    r.total_expense_transaction_count.to_string(),
                    r.total_transaction_count.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Month", "Income", "# In", "Expense", "# Out", "# Total"],
                rows
            )
        );
    }
    Ok(())
}

fn savings<T: Transport>(store: &Store<T>, sub: &clap::ArgMatches) -> Result<()> {
    settled(store.fetch_monthly_savings())?;
    let data = store.state().reports.savings;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.month.format("%Y-%m").to_string(),
                    format!("{:.2}", r.income),
                    format!("{:.2}", r.expense),
                    format!("{:.2}", r.savings),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Savings"], rows)
        );
    }
    Ok(())
}
