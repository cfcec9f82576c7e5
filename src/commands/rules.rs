// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::transactions::list_filter;
use super::{ids, kind, optional, required, settled};
use crate::models::{Id, NewRecurringRule, RecurringRuleUpdate, TransactionKind};
use crate::store::{Settled, Store};
use crate::transport::Transport;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table, start_of_day};
use anyhow::{Result, anyhow};

fn frequency(sub: &clap::ArgMatches) -> Result<i32> {
    sub.get_one::<i32>("frequency")
        .copied()
        .ok_or_else(|| anyhow!("missing --frequency"))
}

pub fn handle<T: Transport>(store: &Store<T>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let rule = NewRecurringRule {
                name: required(sub, "name")?.trim().to_string(),
                amount: parse_decimal(required(sub, "amount")?)?,
                category_id: optional(sub, "category").map(Id::from),
                transaction_type_id: kind(sub)?.id(),
                recurring_frequency_id: frequency(sub)?,
                start_date: start_of_day(parse_date(required(sub, "start")?)?),
            };
            settled(store.create_recurring_rule(&rule))?;
            println!(
                "Added rule '{}' starting {}",
                rule.name,
                rule.start_date.date_naive()
            );
        }
        Some(("list", sub)) => {
            let filter = list_filter(sub)?;
            // A failed lookup only costs the names; the table falls back to ids.
            let lookup = store.fetch_frequencies();
            if matches!(lookup, Settled::SessionEnded(_)) {
                settled(lookup)?;
            }
            settled(store.filter_recurring_rules(&filter))?;
            let state = store.state();
            let rules = &state.recurring.rules;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), rules)? {
                let data: Vec<Vec<String>> = rules
                    .iter()
                    .map(|r| {
                        let kind = r
                            .type_id()
                            .and_then(TransactionKind::from_id)
                            .map(|k| k.to_string())
                            .unwrap_or_default();
                        vec![
                            r.id.to_string(),
                            r.name.clone(),
                            kind,
                            r.amount.round_dp(2).to_string(),
                            state
                                .lookups
                                .frequency_name(r.recurring_frequency_id)
                                .map(str::to_string)
                                .unwrap_or_else(|| r.recurring_frequency_id.to_string()),
                            r.next_run_at.date_naive().to_string(),
                            if r.is_active { "yes" } else { "no" }.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["ID", "Name", "Type", "Amount", "Frequency", "Next Run", "Active"],
                        data
                    )
                );
            }
        }
        Some(("edit", sub)) => {
            let update = RecurringRuleUpdate {
                id: Id::from(required(sub, "id")?.trim()),
                name: required(sub, "name")?.trim().to_string(),
                amount: parse_decimal(required(sub, "amount")?)?,
                category_id: optional(sub, "category").map(Id::from),
                transaction_type_id: kind(sub)?.id(),
                recurring_frequency_id: frequency(sub)?,
                next_run_at: start_of_day(parse_date(required(sub, "next_run")?)?),
                is_active: !sub.get_flag("inactive"),
            };
            settled(store.edit_recurring_rule(&update))?;
            println!("Updated rule {}", update.id);
        }
        Some(("rm", sub)) => {
            let ids = ids(sub);
            settled(store.delete_recurring_rules(&ids))?;
            println!("Removed {} rule(s)", ids.len());
        }
        Some(("frequencies", _)) => {
            settled(store.fetch_frequencies())?;
            let data = store
                .state()
                .lookups
                .frequencies
                .into_iter()
                .map(|f| vec![f.id.to_string(), f.name])
                .collect();
            println!("{}", pretty_table(&["ID", "Frequency"], data));
        }
        _ => {}
    }
    Ok(())
}
