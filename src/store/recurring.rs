// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{remove_ids, replace_by_id, Reducer, Status};
use crate::models::{Id, RecurringRule};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecurringState {
    pub rules: Vec<RecurringRule>,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecurringEvent {
    Pending,
    Rejected(String),
    Loaded(Vec<RecurringRule>),
    Created(RecurringRule),
    Edited(Option<RecurringRule>),
    Deleted(Vec<Id>),
}

impl Reducer for RecurringState {
    type Event = RecurringEvent;

    fn pending() -> RecurringEvent {
        RecurringEvent::Pending
    }

    fn rejected(message: String) -> RecurringEvent {
        RecurringEvent::Rejected(message)
    }

    fn reduce(&self, event: RecurringEvent) -> Self {
        let mut next = self.clone();
        match event {
            RecurringEvent::Pending => next.status = Status::pending(),
            RecurringEvent::Rejected(message) => next.status = Status::failed(message),
            RecurringEvent::Loaded(rules) => {
                next.status = Status::idle();
                next.rules = rules;
            }
            RecurringEvent::Created(rule) => {
                next.status = Status::idle();
                next.rules.insert(0, rule);
            }
            RecurringEvent::Edited(updated) => {
                next.status = Status::idle();
                if let Some(rule) = updated {
                    replace_by_id(&mut next.rules, rule);
                }
            }
            RecurringEvent::Deleted(ids) => {
                next.status = Status::idle();
                remove_ids(&mut next.rules, &ids);
            }
        }
        next
    }
}
