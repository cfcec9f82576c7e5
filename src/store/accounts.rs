// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{remove_ids, replace_by_id, Reducer, Status};
use crate::models::{Account, Id};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountState {
    pub accounts: Vec<Account>,
    pub current_account_id: Option<Id>,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AccountEvent {
    Pending,
    Rejected(String),
    Fetched(Vec<Account>),
    Created(Account),
    Edited(Option<Account>),
    Deleted(Vec<Id>),
    Selected(Id),
}

impl AccountState {
    pub fn current(&self) -> Option<&Account> {
        let id = self.current_account_id.as_ref()?;
        self.accounts.iter().find(|a| &a.id == id)
    }

    fn contains(&self, id: &Id) -> bool {
        self.accounts.iter().any(|a| &a.id == id)
    }

    /// Keep the current selection if it still exists, otherwise fall back to
    /// the first account (or none).
    fn reselect(&mut self) {
        let keep = self
            .current_account_id
            .as_ref()
            .is_some_and(|id| self.contains(id));
        if !keep {
            self.current_account_id = self.accounts.first().map(|a| a.id.clone());
        }
    }
}

impl Reducer for AccountState {
    type Event = AccountEvent;

    fn pending() -> AccountEvent {
        AccountEvent::Pending
    }

    fn rejected(message: String) -> AccountEvent {
        AccountEvent::Rejected(message)
    }

    fn reduce(&self, event: AccountEvent) -> Self {
        let mut next = self.clone();
        match event {
            AccountEvent::Pending => next.status = Status::pending(),
            AccountEvent::Rejected(message) => next.status = Status::failed(message),
            AccountEvent::Fetched(accounts) => {
                next.status = Status::idle();
                next.accounts = accounts;
                next.reselect();
            }
            AccountEvent::Created(account) => {
                next.status = Status::idle();
                next.current_account_id = Some(account.id.clone());
                next.accounts.push(account);
            }
            AccountEvent::Edited(updated) => {
                next.status = Status::idle();
                if let Some(account) = updated {
                    replace_by_id(&mut next.accounts, account);
                }
            }
            AccountEvent::Deleted(ids) => {
                next.status = Status::idle();
                remove_ids(&mut next.accounts, &ids);
                next.reselect();
            }
            AccountEvent::Selected(id) => {
                if next.contains(&id) {
                    next.current_account_id = Some(id);
                }
            }
        }
        next
    }
}
