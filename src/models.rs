// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{de_month, de_timestamp};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque server-assigned identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(pub String);

impl Id {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id(s.to_string())
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Id/name pair used for currencies, transaction types and frequencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Named {
    pub id: i32,
    pub name: String,
}

pub type Currency = Named;
pub type Frequency = Named;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Id,
    pub name: String,
    pub balance: Decimal,
    pub currency: Currency,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub user_id: Option<Id>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Income = 1,
    Expense = 2,
}

impl TransactionKind {
    pub fn id(self) -> i32 {
        self as i32
    }

    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(TransactionKind::Income),
            2 => Some(TransactionKind::Expense),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" | "1" => Some(TransactionKind::Income),
            "expense" | "2" => Some(TransactionKind::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Income => f.write_str("income"),
            TransactionKind::Expense => f.write_str("expense"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Id,
    pub name: String,
    pub amount: Decimal,
    #[serde(default)]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "de_timestamp")]
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: Named,
    #[serde(default)]
    pub category_id: Option<Id>,
    #[serde(default)]
    pub category_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringRule {
    pub id: Id,
    pub name: String,
    pub amount: Decimal,
    #[serde(default)]
    pub category_id: Option<Id>,
    #[serde(rename = "type", default)]
    pub kind: Option<Named>,
    #[serde(default)]
    pub transaction_type_id: Option<i32>,
    pub recurring_frequency_id: i32,
    #[serde(deserialize_with = "de_timestamp")]
    pub next_run_at: DateTime<Utc>,
    pub is_active: bool,
    #[serde(default)]
    pub currency: Option<Currency>,
}

impl RecurringRule {
    /// Listings carry a `type` object while other payloads carry the bare id.
    pub fn type_id(&self) -> Option<i32> {
        self.kind
            .as_ref()
            .map(|k| k.id)
            .or(self.transaction_type_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    #[serde(deserialize_with = "de_month")]
    pub month: NaiveDate,
    pub total_income_amount: Decimal,
    pub total_expense_amount: Decimal,
    pub total_income_transaction_count: i64,
    pub total_expense_transaction_count: i64,
    pub total_transaction_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySavings {
    #[serde(deserialize_with = "de_month")]
    pub month: NaiveDate,
    pub income: Decimal,
    pub expense: Decimal,
    pub savings: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    pub address: String,
    #[serde(default)]
    pub is_confirmed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Id,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub role: Named,
}

// -- Request payloads -------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub name: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub balance: Decimal,
    pub currency_id: i32,
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    pub id: Id,
    pub name: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub name: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    pub description: Option<String>,
    pub transaction_type_id: i32,
    pub date: DateTime<Utc>,
    pub category_id: Option<Id>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    pub id: Id,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<Id>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecurringRule {
    pub name: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    pub category_id: Option<Id>,
    pub transaction_type_id: i32,
    pub recurring_frequency_id: i32,
    pub start_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringRuleUpdate {
    pub id: Id,
    pub name: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    pub category_id: Option<Id>,
    pub transaction_type_id: i32,
    pub recurring_frequency_id: i32,
    pub next_run_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Server-side filter for transaction and recurring-rule listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    pub name: Option<String>,
    pub amount_from: Option<Decimal>,
    pub amount_to: Option<Decimal>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub page_size: Option<u32>,
}

/// File format understood by the import/export endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentExtension {
    Xlsx = 1,
    Csv = 2,
}

impl DocumentExtension {
    pub fn id(self) -> i32 {
        self as i32
    }

    pub fn extension(self) -> &'static str {
        match self {
            DocumentExtension::Xlsx => "xlsx",
            DocumentExtension::Csv => "csv",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xlsx" | "1" => Some(DocumentExtension::Xlsx),
            "csv" | "2" => Some(DocumentExtension::Csv),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportQuery {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub format: DocumentExtension,
}
