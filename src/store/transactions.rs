// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{remove_ids, replace_by_id, Reducer, Status};
use crate::models::{Id, Transaction};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionState {
    /// Most recent first.
    pub transactions: Vec<Transaction>,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransactionEvent {
    Pending,
    Rejected(String),
    /// Result of a fetch or filter; replaces the collection.
    Loaded(Vec<Transaction>),
    Created(Transaction),
    Edited(Option<Transaction>),
    Deleted(Vec<Id>),
}

impl Reducer for TransactionState {
    type Event = TransactionEvent;

    fn pending() -> TransactionEvent {
        TransactionEvent::Pending
    }

    fn rejected(message: String) -> TransactionEvent {
        TransactionEvent::Rejected(message)
    }

    fn reduce(&self, event: TransactionEvent) -> Self {
        let mut next = self.clone();
        match event {
            TransactionEvent::Pending => next.status = Status::pending(),
            TransactionEvent::Rejected(message) => next.status = Status::failed(message),
            TransactionEvent::Loaded(items) => {
                next.status = Status::idle();
                next.transactions = items;
            }
            TransactionEvent::Created(tx) => {
                next.status = Status::idle();
                next.transactions.insert(0, tx);
            }
            TransactionEvent::Edited(updated) => {
                next.status = Status::idle();
                if let Some(tx) = updated {
                    replace_by_id(&mut next.transactions, tx);
                }
            }
            TransactionEvent::Deleted(ids) => {
                next.status = Status::idle();
                remove_ids(&mut next.transactions, &ids);
            }
        }
        next
    }
}
