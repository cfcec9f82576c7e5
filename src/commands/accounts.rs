// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{required, settled};
use crate::models::{AccountUpdate, Id, NewAccount};
use crate::store::Store;
use crate::transport::Transport;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Result, anyhow};

pub fn handle<T: Transport>(store: &Store<T>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required(sub, "name")?.trim().to_string();
            let balance = parse_decimal(required(sub, "balance")?)?;
            let currency_id = *sub
                .get_one::<i32>("currency_id")
                .ok_or_else(|| anyhow!("missing --currency-id"))?;
            let account = NewAccount {
                name: name.clone(),
                balance,
                currency_id,
                is_default: sub.get_flag("default"),
            };
            settled(store.create_account(&account))?;
            println!("Added account '{}'", name);
        }
        Some(("list", sub)) => {
            settled(store.fetch_accounts())?;
            let state = store.state().accounts;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &state.accounts)? {
                let current = state.current_account_id.as_ref();
                let data: Vec<Vec<String>> = state
                    .accounts
                    .iter()
                    .map(|a| {
                        vec![
                            if Some(&a.id) == current { "*" } else { "" }.to_string(),
                            a.id.to_string(),
                            a.name.clone(),
                            fmt_money(&a.balance, &a.currency.name),
                            if a.is_default { "yes" } else { "" }.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["", "ID", "Name", "Balance", "Default"], data)
                );
            }
        }
        Some(("edit", sub)) => {
            let update = AccountUpdate {
                id: Id::from(required(sub, "id")?.trim()),
                name: required(sub, "name")?.trim().to_string(),
                is_default: sub.get_flag("default"),
            };
            settled(store.edit_account(&update))?;
            println!("Updated account {}", update.id);
        }
        Some(("rm", sub)) => {
            let id = Id::from(required(sub, "id")?.trim());
            settled(store.delete_account(&id))?;
            println!("Removed account {}", id);
        }
        Some(("currencies", _)) => {
            settled(store.fetch_currencies())?;
            let data = store
                .state()
                .lookups
                .currencies
                .into_iter()
                .map(|c| vec![c.id.to_string(), c.name])
                .collect();
            println!("{}", pretty_table(&["ID", "Currency"], data));
        }
        _ => {}
    }
    Ok(())
}
