// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Server-provided option lists. They carry their own status so a failed
//! lookup never masks the state of the collection it decorates.

use super::{Reducer, Status};
use crate::models::{Currency, Frequency};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupState {
    pub currencies: Vec<Currency>,
    pub frequencies: Vec<Frequency>,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupEvent {
    Pending,
    Rejected(String),
    CurrenciesFetched(Vec<Currency>),
    FrequenciesFetched(Vec<Frequency>),
}

impl LookupState {
    pub fn frequency_name(&self, id: i32) -> Option<&str> {
        self.frequencies
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.name.as_str())
    }
}

impl Reducer for LookupState {
    type Event = LookupEvent;

    fn pending() -> LookupEvent {
        LookupEvent::Pending
    }

    fn rejected(message: String) -> LookupEvent {
        LookupEvent::Rejected(message)
    }

    fn reduce(&self, event: LookupEvent) -> Self {
        let mut next = self.clone();
        match event {
            LookupEvent::Pending => next.status = Status::pending(),
            LookupEvent::Rejected(message) => next.status = Status::failed(message),
            LookupEvent::CurrenciesFetched(currencies) => {
                next.status = Status::idle();
                next.currencies = currencies;
            }
            LookupEvent::FrequenciesFetched(frequencies) => {
                next.status = Status::idle();
                next.frequencies = frequencies;
            }
        }
        next
    }
}
