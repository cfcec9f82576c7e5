// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Reducer, Status};
use crate::models::{MonthlyReport, MonthlySavings};

/// Read-only aggregates computed by the server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportState {
    pub monthly: Vec<MonthlyReport>,
    pub savings: Vec<MonthlySavings>,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    Pending,
    Rejected(String),
    MonthlyLoaded(Vec<MonthlyReport>),
    SavingsLoaded(Vec<MonthlySavings>),
    Loaded {
        monthly: Vec<MonthlyReport>,
        savings: Vec<MonthlySavings>,
    },
}

impl Reducer for ReportState {
    type Event = ReportEvent;

    fn pending() -> ReportEvent {
        ReportEvent::Pending
    }

    fn rejected(message: String) -> ReportEvent {
        ReportEvent::Rejected(message)
    }

    fn reduce(&self, event: ReportEvent) -> Self {
        let mut next = self.clone();
        match event {
            ReportEvent::Pending => next.status = Status::pending(),
            ReportEvent::Rejected(message) => next.status = Status::failed(message),
            ReportEvent::MonthlyLoaded(monthly) => {
                next.status = Status::idle();
                next.monthly = monthly;
            }
            ReportEvent::SavingsLoaded(savings) => {
                next.status = Status::idle();
                next.savings = savings;
            }
            ReportEvent::Loaded { monthly, savings } => {
                next.status = Status::idle();
                next.monthly = monthly;
                next.savings = savings;
            }
        }
        next
    }
}
