// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! One typed method per remote endpoint.

use crate::envelope;
use crate::error::{ClientError, Result};
use crate::gateway::Gateway;
use crate::models::{
    Account, AccountUpdate, Credentials, Currency, DocumentExtension, ExportQuery, Frequency, Id,
    ListFilter, MonthlyReport, MonthlySavings, NewAccount, NewRecurringRule, NewTransaction,
    RecurringRule, RecurringRuleUpdate, Registration, TokenPair, Transaction, TransactionUpdate,
    UserProfile,
};
use crate::transport::{ApiRequest, Transport};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde_json::json;

pub const REGISTER: &str = "/Auth/register";
pub const LOGIN: &str = "/Auth/login";
pub const USER: &str = "/User/get-user";
pub const ACCOUNTS: &str = "/Account/get-user-accounts";
pub const CREATE_ACCOUNT: &str = "/Account/create-account";
pub const EDIT_ACCOUNT: &str = "/Account/edit-account";
pub const DELETE_ACCOUNT: &str = "/Account/delete-account";
pub const CURRENCIES: &str = "/Enum/get-currency";
pub const TRANSACTIONS: &str = "/Transaction/get-all-account-transactions";
pub const CREATE_TRANSACTION: &str = "/Transaction/create-transaction";
pub const EDIT_TRANSACTION: &str = "/Transaction/edit-transaction";
pub const DELETE_TRANSACTIONS: &str = "/Transaction/delete-transactions";
pub const IMPORT_TEMPLATE: &str = "/Transaction/get-import-template";
pub const IMPORT_TRANSACTIONS: &str = "/Transaction/import-transactions";
pub const EXPORT_TRANSACTIONS: &str = "/Transaction/export-transactions";
pub const RECURRING_RULES: &str = "/RecurringRule/get-all-account-recurring_rules";
pub const CREATE_RECURRING_RULE: &str = "/RecurringRule/create-recurring-rule";
pub const EDIT_RECURRING_RULE: &str = "/RecurringRule/edit-recurring-rule";
pub const DELETE_RECURRING_RULES: &str = "/RecurringRule/delete-recurring-rules";
pub const FREQUENCIES: &str = "/Enum/get-recurring-frequency";
pub const MONTHLY_REPORTS: &str = "/Report/get-total-expenses-and-incomes-per-month";
pub const MONTHLY_SAVINGS: &str = "/Report/get-monthly-savings";

/// Amounts must be strictly positive; the transaction type carries the sign.
pub fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(ClientError::invalid(format!(
            "Amount must be greater than zero, got {amount}"
        )));
    }
    Ok(())
}

/// A recurring rule's next run may not fall before tomorrow (relative to `now`).
pub fn validate_next_run(next_run_at: DateTime<Utc>, now: DateTime<Utc>) -> Result<()> {
    let earliest = (now + Duration::days(1)).date_naive();
    if next_run_at.date_naive() < earliest {
        return Err(ClientError::invalid(format!(
            "Next run date {} must be on or after {}",
            next_run_at.date_naive(),
            earliest
        )));
    }
    Ok(())
}

fn list_request(path: &str, filter: &ListFilter) -> ApiRequest {
    ApiRequest::get(path)
        .query_opt("Name", filter.name.as_deref().filter(|n| !n.trim().is_empty()))
        .query_opt("AmountFrom", filter.amount_from)
        .query_opt("AmountTo", filter.amount_to)
        .query_opt("DateFrom", filter.date_from)
        .query_opt("DateTo", filter.date_to)
        .query_opt("PageSize", filter.page_size)
}

pub struct Api<T: Transport> {
    gateway: Gateway<T>,
}

impl<T: Transport> Api<T> {
    pub fn new(gateway: Gateway<T>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway<T> {
        &self.gateway
    }

    // -- Auth ---------------------------------------------------------------

    pub fn register(&self, registration: &Registration) -> Result<TokenPair> {
        let resp = self
            .gateway
            .send_anonymous(ApiRequest::post(REGISTER).json(registration)?)?;
        let pair: TokenPair = envelope::first(REGISTER, &resp.body)?;
        self.gateway.tokens().set(&pair)?;
        Ok(pair)
    }

    pub fn login(&self, credentials: &Credentials) -> Result<TokenPair> {
        let resp = self
            .gateway
            .send_anonymous(ApiRequest::post(LOGIN).json(credentials)?)?;
        let pair: TokenPair = envelope::first(LOGIN, &resp.body)?;
        self.gateway.tokens().set(&pair)?;
        Ok(pair)
    }

    pub fn user(&self) -> Result<UserProfile> {
        let resp = self.gateway.send(ApiRequest::get(USER))?;
        envelope::first(USER, &resp.body)
    }

    // -- Accounts -----------------------------------------------------------

    pub fn accounts(&self) -> Result<Vec<Account>> {
        let resp = self.gateway.send(ApiRequest::get(ACCOUNTS))?;
        envelope::nested_list(ACCOUNTS, &resp.body)
    }

    pub fn create_account(&self, account: &NewAccount) -> Result<Account> {
        let resp = self
            .gateway
            .send(ApiRequest::post(CREATE_ACCOUNT).json(account)?)?;
        envelope::nested_first(CREATE_ACCOUNT, &resp.body)
    }

    pub fn edit_account(&self, update: &AccountUpdate) -> Result<Option<Account>> {
        let resp = self
            .gateway
            .send(ApiRequest::put(EDIT_ACCOUNT).json(update)?)?;
        envelope::nested_optional(EDIT_ACCOUNT, &resp.body)
    }

    pub fn delete_account(&self, id: &Id) -> Result<()> {
        self.gateway
            .send(ApiRequest::delete(DELETE_ACCOUNT).json(&json!({ "id": id }))?)?;
        Ok(())
    }

    pub fn currencies(&self) -> Result<Vec<Currency>> {
        let resp = self.gateway.send(ApiRequest::get(CURRENCIES))?;
        envelope::nested_list(CURRENCIES, &resp.body)
    }

    // -- Transactions -------------------------------------------------------

    pub fn transactions(&self, filter: &ListFilter) -> Result<Vec<Transaction>> {
        let resp = self.gateway.send(list_request(TRANSACTIONS, filter))?;
        envelope::page(TRANSACTIONS, &resp.body)
    }

    pub fn create_transaction(&self, tx: &NewTransaction) -> Result<Transaction> {
        validate_amount(tx.amount)?;
        let resp = self
            .gateway
            .send(ApiRequest::post(CREATE_TRANSACTION).json(tx)?)?;
        envelope::single(CREATE_TRANSACTION, &resp.body)
    }

    pub fn edit_transaction(&self, update: &TransactionUpdate) -> Result<Option<Transaction>> {
        let resp = self
            .gateway
            .send(ApiRequest::put(EDIT_TRANSACTION).json(update)?)?;
        envelope::nested_optional(EDIT_TRANSACTION, &resp.body)
    }

    pub fn delete_transactions(&self, ids: &[Id]) -> Result<()> {
        self.gateway
            .send(ApiRequest::delete(DELETE_TRANSACTIONS).json(&json!({ "ids": ids }))?)?;
        Ok(())
    }

    pub fn import_template(&self, format: DocumentExtension) -> Result<Vec<u8>> {
        let resp = self.gateway.send(
            ApiRequest::get(IMPORT_TEMPLATE).query("DocumentExtensionId", format.id()),
        )?;
        Ok(resp.body)
    }

    pub fn import_transactions(&self, file_name: &str, bytes: Vec<u8>) -> Result<()> {
        self.gateway
            .send(ApiRequest::post(IMPORT_TRANSACTIONS).file(file_name, bytes))?;
        Ok(())
    }

    pub fn export_transactions(&self, query: &ExportQuery) -> Result<Vec<u8>> {
        let resp = self.gateway.send(
            ApiRequest::get(EXPORT_TRANSACTIONS)
                .query_opt("DateFrom", query.date_from)
                .query_opt("DateTo", query.date_to)
                .query("DocumentExtensionId", query.format.id()),
        )?;
        Ok(resp.body)
    }

    // -- Recurring rules ----------------------------------------------------

    pub fn recurring_rules(&self, filter: &ListFilter) -> Result<Vec<RecurringRule>> {
        let resp = self.gateway.send(list_request(RECURRING_RULES, filter))?;
        envelope::page(RECURRING_RULES, &resp.body)
    }

    pub fn create_recurring_rule(&self, rule: &NewRecurringRule) -> Result<RecurringRule> {
        validate_amount(rule.amount)?;
        validate_next_run(rule.start_date, Utc::now())?;
        let resp = self
            .gateway
            .send(ApiRequest::post(CREATE_RECURRING_RULE).json(rule)?)?;
        envelope::single(CREATE_RECURRING_RULE, &resp.body)
    }

    pub fn edit_recurring_rule(
        &self,
        update: &RecurringRuleUpdate,
    ) -> Result<Option<RecurringRule>> {
        validate_amount(update.amount)?;
        validate_next_run(update.next_run_at, Utc::now())?;
        let resp = self
            .gateway
            .send(ApiRequest::put(EDIT_RECURRING_RULE).json(update)?)?;
        envelope::nested_optional(EDIT_RECURRING_RULE, &resp.body)
    }

    pub fn delete_recurring_rules(&self, ids: &[Id]) -> Result<()> {
        self.gateway
            .send(ApiRequest::delete(DELETE_RECURRING_RULES).json(&json!({ "ids": ids }))?)?;
        Ok(())
    }

    pub fn frequencies(&self) -> Result<Vec<Frequency>> {
        let resp = self.gateway.send(ApiRequest::get(FREQUENCIES))?;
        envelope::nested_list(FREQUENCIES, &resp.body)
    }

    // -- Reports ------------------------------------------------------------

    pub fn monthly_reports(&self) -> Result<Vec<MonthlyReport>> {
        let resp = self.gateway.send(ApiRequest::get(MONTHLY_REPORTS))?;
        envelope::rows(MONTHLY_REPORTS, &resp.body)
    }

    pub fn monthly_savings(&self) -> Result<Vec<MonthlySavings>> {
        let resp = self.gateway.send(ApiRequest::get(MONTHLY_SAVINGS))?;
        envelope::rows(MONTHLY_SAVINGS, &resp.body)
    }
}
