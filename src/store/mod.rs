// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Domain stores.
//!
//! Each slice is a pure reducer over one collection plus a [`Status`]. The
//! [`Store`] runs the request for an intent, then feeds the outcome to the
//! slice's reducer: `Pending` before the call, then the domain event or
//! `Rejected`. A rejected call never touches the collection.

pub mod accounts;
pub mod lookups;
pub mod recurring;
pub mod reports;
pub mod transactions;
pub mod user;

pub use accounts::{AccountEvent, AccountState};
pub use lookups::{LookupEvent, LookupState};
pub use recurring::{RecurringEvent, RecurringState};
pub use reports::{ReportEvent, ReportState};
pub use transactions::{TransactionEvent, TransactionState};
pub use user::{UserEvent, UserState};

use crate::api::Api;
use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::{ClientError, Result};
use crate::models::{
    Account, AccountUpdate, Credentials, DocumentExtension, ExportQuery, Id, ListFilter,
    NewAccount, NewRecurringRule, NewTransaction, RecurringRule, RecurringRuleUpdate,
    Registration, Transaction, TransactionUpdate,
};
use crate::session::Session;
use crate::transport::Transport;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub loading: bool,
    pub error: Option<String>,
}

impl Status {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn pending() -> Self {
        Self {
            loading: true,
            error: None,
        }
    }

    pub fn failed(message: String) -> Self {
        Self {
            loading: false,
            error: Some(message),
        }
    }
}

pub trait Reducer: Clone {
    type Event;

    fn pending() -> Self::Event;
    fn rejected(message: String) -> Self::Event;

    /// Produce the next state. Must not mutate `self`.
    fn reduce(&self, event: Self::Event) -> Self;
}

pub trait Entity {
    fn id(&self) -> &Id;
}

impl Entity for Account {
    fn id(&self) -> &Id {
        &self.id
    }
}

impl Entity for Transaction {
    fn id(&self) -> &Id {
        &self.id
    }
}

impl Entity for RecurringRule {
    fn id(&self) -> &Id {
        &self.id
    }
}

/// Replace the item with the same id in place. Unknown ids are ignored.
pub(crate) fn replace_by_id<T: Entity>(items: &mut [T], updated: T) -> bool {
    match items.iter_mut().find(|item| item.id() == updated.id()) {
        Some(slot) => {
            *slot = updated;
            true
        }
        None => false,
    }
}

pub(crate) fn remove_ids<T: Entity>(items: &mut Vec<T>, ids: &[Id]) {
    items.retain(|item| !ids.contains(item.id()));
}

/// How a dispatched intent ended.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Settled {
    Fulfilled,
    /// In-page failure; the message is also recorded in the slice's status.
    Rejected(String),
    /// The session could not be recovered. Tokens are already cleared.
    SessionEnded(String),
}

impl Settled {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Settled::Fulfilled)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Settled::Fulfilled => None,
            Settled::Rejected(m) | Settled::SessionEnded(m) => Some(m),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub accounts: AccountState,
    pub lookups: LookupState,
    pub transactions: TransactionState,
    pub recurring: RecurringState,
    pub reports: ReportState,
    pub user: UserState,
}

/// Serializes writes that target the same entity id.
#[derive(Default)]
pub struct EntityLocks {
    locks: Mutex<HashMap<Id, Arc<Mutex<()>>>>,
}

impl EntityLocks {
    pub fn with<R>(&self, ids: &[Id], f: impl FnOnce() -> R) -> R {
        let mut ordered: Vec<&Id> = ids.iter().collect();
        ordered.sort();
        ordered.dedup();
        let handles: Vec<Arc<Mutex<()>>> = {
            let mut map = self.locks.lock();
            ordered
                .iter()
                .map(|id| map.entry((*id).clone()).or_default().clone())
                .collect()
        };
        let result = {
            let _guards: Vec<_> = handles.iter().map(|l| l.lock()).collect();
            f()
        };
        drop(handles);

        // Handles are only cloned under the map lock, so a count of one means
        // no other writer holds or waits on this id.
        let mut map = self.locks.lock();
        for id in ordered {
            if map.get(id).is_some_and(|l| Arc::strong_count(l) == 1) {
                map.remove(id);
            }
        }
        result
    }

    /// Number of ids currently tracked.
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

const STALE_SESSION: &str = "Session ended, please log in again";

fn message_for(err: &ClientError, fallback: &str) -> String {
    match err {
        ClientError::SessionExpired(_) | ClientError::RefreshFailed(_) => {
            "Session expired, please log in again".to_string()
        }
        _ => err
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string()),
    }
}

pub struct Store<T: Transport> {
    api: Api<T>,
    state: RwLock<AppState>,
    writes: EntityLocks,
}

impl<T: Transport> Store<T> {
    /// Build a store and restore any persisted session before the first call.
    pub fn new(api: Api<T>) -> Result<Self> {
        api.gateway().tokens().restore()?;
        Ok(Self {
            api,
            state: RwLock::new(AppState::default()),
            writes: EntityLocks::default(),
        })
    }

    pub fn api(&self) -> &Api<T> {
        &self.api
    }

    pub fn state(&self) -> AppState {
        self.state.read().clone()
    }

    pub fn session(&self) -> Session {
        self.api.gateway().tokens().session()
    }

    fn generation(&self) -> u64 {
        self.api.gateway().tokens().generation()
    }

    fn apply<S: Reducer>(&self, slice: fn(&mut AppState) -> &mut S, event: S::Event) {
        let mut state = self.state.write();
        let current = slice(&mut state);
        *current = current.reduce(event);
    }

    /// Apply `event` only while the session that issued the request is still
    /// the current one. Logout clears tokens before it resets state, so the
    /// check under the state lock cannot interleave with a reset.
    fn apply_within<S: Reducer>(
        &self,
        generation: u64,
        slice: fn(&mut AppState) -> &mut S,
        event: S::Event,
    ) -> bool {
        let mut state = self.state.write();
        if self.generation() != generation {
            return false;
        }
        let current = slice(&mut state);
        *current = current.reduce(event);
        true
    }

    fn dispatch<S: Reducer>(
        &self,
        slice: fn(&mut AppState) -> &mut S,
        fallback: &str,
        call: impl FnOnce(&Api<T>) -> Result<S::Event>,
    ) -> Settled {
        let generation = self.generation();
        self.apply(slice, S::pending());
        match call(&self.api) {
            Ok(event) => {
                if self.apply_within(generation, slice, event) {
                    return Settled::Fulfilled;
                }
                self.discard_stale();
                Settled::SessionEnded(STALE_SESSION.to_string())
            }
            Err(err) => {
                let message = message_for(&err, fallback);
                debug!(error = %err, "action rejected");
                if self.apply_within(generation, slice, S::rejected(message.clone())) {
                    return self.settle_error(generation, err, message);
                }
                self.discard_stale();
                if !err.ends_session() {
                    return Settled::SessionEnded(STALE_SESSION.to_string());
                }
                Settled::SessionEnded(message)
            }
        }
    }

    /// The session moved on while a request was out. Its result is dropped,
    /// and cached state goes too unless a new login already owns it.
    fn discard_stale(&self) {
        debug!("session changed while the request was out, result dropped");
        let mut state = self.state.write();
        if !self.session().is_authenticated() {
            *state = AppState::default();
        }
    }

    fn settle_error(&self, generation: u64, err: ClientError, message: String) -> Settled {
        if err.ends_session() {
            self.end_session(generation, &err);
            Settled::SessionEnded(message)
        } else {
            Settled::Rejected(message)
        }
    }

    /// Forced logout, skipped when a newer session replaced the one that
    /// failed.
    fn end_session(&self, generation: u64, err: &ClientError) {
        warn!(error = %err, "session ended, logging out");
        match self.api.gateway().tokens().clear_if_current(generation) {
            Ok(true) => {}
            Ok(false) => debug!("session already cleared or replaced"),
            Err(e) => warn!(error = %e, "failed to clear persisted session"),
        }
        self.discard_stale();
    }

    /// Side-effecting calls that do not feed a slice.
    fn side_effect<R>(&self, call: impl FnOnce(&Api<T>) -> Result<R>) -> Result<R> {
        let generation = self.generation();
        call(&self.api).inspect_err(|err| {
            if err.ends_session() {
                self.end_session(generation, err);
            }
        })
    }

    // -- Auth ---------------------------------------------------------------

    pub fn login(&self, email: &str, password: &str) -> Settled {
        let credentials = Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        match self.api.login(&credentials) {
            Ok(_) => self.signed_in(),
            Err(err) => Settled::Rejected(message_for(&err, "Login failed")),
        }
    }

    pub fn register(&self, registration: &Registration) -> Settled {
        match self.api.register(registration) {
            Ok(_) => self.signed_in(),
            Err(err) => Settled::Rejected(message_for(&err, "Registration failed")),
        }
    }

    /// A new session never inherits the previous user's cached data.
    fn signed_in(&self) -> Settled {
        *self.state.write() = AppState::default();
        Settled::Fulfilled
    }

    /// Clear the persisted session and drop all cached domain state.
    pub fn logout(&self) -> Result<()> {
        self.api.gateway().tokens().clear()?;
        *self.state.write() = AppState::default();
        Ok(())
    }

    pub fn fetch_user(&self) -> Settled {
        self.dispatch(
            |s| &mut s.user,
            "Failed to load profile",
            |api| api.user().map(UserEvent::Loaded),
        )
    }

    // -- Accounts -----------------------------------------------------------

    pub fn fetch_accounts(&self) -> Settled {
        self.dispatch(
            |s| &mut s.accounts,
            "Failed to load accounts",
            |api| api.accounts().map(AccountEvent::Fetched),
        )
    }

    pub fn create_account(&self, account: &NewAccount) -> Settled {
        self.dispatch(
            |s| &mut s.accounts,
            "Failed to create account",
            |api| api.create_account(account).map(AccountEvent::Created),
        )
    }

    pub fn edit_account(&self, update: &AccountUpdate) -> Settled {
        self.writes.with(std::slice::from_ref(&update.id), || {
            self.dispatch(
                |s| &mut s.accounts,
                "Failed to update account",
                |api| {
                    let updated = api.edit_account(update)?;
                    self.note_missing("account", &update.id, updated.as_ref().map(|a| &a.id));
                    Ok(AccountEvent::Edited(updated))
                },
            )
        })
    }

    pub fn delete_account(&self, id: &Id) -> Settled {
        self.writes.with(std::slice::from_ref(id), || {
            self.dispatch(
                |s| &mut s.accounts,
                "Failed to delete account",
                |api| {
                    api.delete_account(id)?;
                    Ok(AccountEvent::Deleted(vec![id.clone()]))
                },
            )
        })
    }

    /// Local selection change; no request. Returns false for an unknown id.
    pub fn select_account(&self, id: &Id) -> bool {
        self.apply(|s| &mut s.accounts, AccountEvent::Selected(id.clone()));
        self.state.read().accounts.current_account_id.as_ref() == Some(id)
    }

    pub fn fetch_currencies(&self) -> Settled {
        self.dispatch(
            |s| &mut s.lookups,
            "Failed to load currencies",
            |api| api.currencies().map(LookupEvent::CurrenciesFetched),
        )
    }

    // -- Transactions -------------------------------------------------------

    pub fn fetch_transactions(&self) -> Settled {
        let filter = ListFilter {
            page_size: Some(DEFAULT_PAGE_SIZE),
            ..ListFilter::default()
        };
        self.dispatch(
            |s| &mut s.transactions,
            "Failed to load transactions",
            |api| api.transactions(&filter).map(TransactionEvent::Loaded),
        )
    }

    /// Re-query the server with `filter`; the result replaces the collection.
    pub fn filter_transactions(&self, filter: &ListFilter) -> Settled {
        self.dispatch(
            |s| &mut s.transactions,
            "Failed to filter transactions",
            |api| api.transactions(filter).map(TransactionEvent::Loaded),
        )
    }

    pub fn create_transaction(&self, tx: &NewTransaction) -> Settled {
        self.dispatch(
            |s| &mut s.transactions,
            "Failed to create transaction",
            |api| api.create_transaction(tx).map(TransactionEvent::Created),
        )
    }

    pub fn edit_transaction(&self, update: &TransactionUpdate) -> Settled {
        self.writes.with(std::slice::from_ref(&update.id), || {
            self.dispatch(
                |s| &mut s.transactions,
                "Failed to update transaction",
                |api| {
                    let updated = api.edit_transaction(update)?;
                    self.note_missing("transaction", &update.id, updated.as_ref().map(|t| &t.id));
                    Ok(TransactionEvent::Edited(updated))
                },
            )
        })
    }

    pub fn delete_transactions(&self, ids: &[Id]) -> Settled {
        self.writes.with(ids, || {
            self.dispatch(
                |s| &mut s.transactions,
                "Failed to delete transactions",
                |api| {
                    api.delete_transactions(ids)?;
                    Ok(TransactionEvent::Deleted(ids.to_vec()))
                },
            )
        })
    }

    pub fn import_template(&self, format: DocumentExtension) -> Result<Vec<u8>> {
        self.side_effect(|api| api.import_template(format))
    }

    /// Upload a file for server-side import. Call
    /// [`fetch_transactions`](Self::fetch_transactions) afterwards to resync.
    pub fn import_transactions(&self, file_name: &str, bytes: Vec<u8>) -> Result<()> {
        self.side_effect(|api| api.import_transactions(file_name, bytes))
    }

    pub fn export_transactions(&self, query: &ExportQuery) -> Result<Vec<u8>> {
        self.side_effect(|api| api.export_transactions(query))
    }

    // -- Recurring rules ----------------------------------------------------

    pub fn fetch_recurring_rules(&self) -> Settled {
        let filter = ListFilter {
            page_size: Some(DEFAULT_PAGE_SIZE),
            ..ListFilter::default()
        };
        self.filter_recurring_rules(&filter)
    }

    pub fn filter_recurring_rules(&self, filter: &ListFilter) -> Settled {
        self.dispatch(
            |s| &mut s.recurring,
            "Failed to load recurring rules",
            |api| api.recurring_rules(filter).map(RecurringEvent::Loaded),
        )
    }

    pub fn create_recurring_rule(&self, rule: &NewRecurringRule) -> Settled {
        self.dispatch(
            |s| &mut s.recurring,
            "Failed to create recurring rule",
            |api| api.create_recurring_rule(rule).map(RecurringEvent::Created),
        )
    }

    pub fn edit_recurring_rule(&self, update: &RecurringRuleUpdate) -> Settled {
        self.writes.with(std::slice::from_ref(&update.id), || {
            self.dispatch(
                |s| &mut s.recurring,
                "Failed to update recurring rule",
                |api| {
                    let updated = api.edit_recurring_rule(update)?;
                    self.note_missing("recurring rule", &update.id, updated.as_ref().map(|r| &r.id));
                    Ok(RecurringEvent::Edited(updated))
                },
            )
        })
    }

    pub fn delete_recurring_rules(&self, ids: &[Id]) -> Settled {
        self.writes.with(ids, || {
            self.dispatch(
                |s| &mut s.recurring,
                "Failed to delete recurring rules",
                |api| {
                    api.delete_recurring_rules(ids)?;
                    Ok(RecurringEvent::Deleted(ids.to_vec()))
                },
            )
        })
    }

    pub fn fetch_frequencies(&self) -> Settled {
        self.dispatch(
            |s| &mut s.lookups,
            "Failed to load frequencies",
            |api| api.frequencies().map(LookupEvent::FrequenciesFetched),
        )
    }

    // -- Reports ------------------------------------------------------------

    pub fn fetch_monthly_reports(&self) -> Settled {
        self.dispatch(
            |s| &mut s.reports,
            "Failed to load income/expense report",
            |api| api.monthly_reports().map(ReportEvent::MonthlyLoaded),
        )
    }

    pub fn fetch_monthly_savings(&self) -> Settled {
        self.dispatch(
            |s| &mut s.reports,
            "Failed to load savings report",
            |api| api.monthly_savings().map(ReportEvent::SavingsLoaded),
        )
    }

    /// Load both reports; the two requests run concurrently.
    pub fn fetch_reports(&self) -> Settled {
        self.dispatch(
            |s| &mut s.reports,
            "Failed to load reports",
            |api| {
                let (monthly, savings) = std::thread::scope(|scope| {
                    let savings = scope.spawn(|| api.monthly_savings());
                    let monthly = api.monthly_reports();
                    let savings = savings.join().unwrap_or_else(|_| {
                        Err(ClientError::Network("savings request panicked".into()))
                    });
                    (monthly, savings)
                });
                Ok(ReportEvent::Loaded {
                    monthly: monthly?,
                    savings: savings?,
                })
            },
        )
    }

    fn note_missing(&self, kind: &str, requested: &Id, returned: Option<&Id>) {
        let Some(id) = returned else {
            debug!(kind, id = %requested, "server returned no row for edit");
            return;
        };
        let state = self.state.read();
        let cached = match kind {
            "account" => state.accounts.accounts.iter().any(|a| &a.id == id),
            "transaction" => state.transactions.transactions.iter().any(|t| &t.id == id),
            _ => state.recurring.rules.iter().any(|r| &r.id == id),
        };
        if !cached {
            debug!(kind, %id, "edited entity not cached, update dropped");
        }
    }
}
