// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use chrono::{Duration, Utc};
use common::{
    FakeServer, account, ok, rule, signed_in, status, store, stored, token_pair, transaction,
    unauthorized, user,
};
use fintrack::api::{
    ACCOUNTS, CREATE_ACCOUNT, CREATE_RECURRING_RULE, CREATE_TRANSACTION, DELETE_ACCOUNT,
    DELETE_TRANSACTIONS, EDIT_TRANSACTION, LOGIN, MONTHLY_REPORTS, MONTHLY_SAVINGS, TRANSACTIONS,
    USER,
};
use fintrack::models::{Id, NewAccount, NewRecurringRule, NewTransaction, TransactionUpdate};
use fintrack::refresh::REFRESH_PATH;
use fintrack::store::{AccountState, EntityLocks, Reducer, Status, UserState};
use fintrack::transport::RequestBody;
use fintrack::{MemoryTokenStorage, Settled};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::{Arc, mpsc};
use std::thread;

fn new_tx(name: &str, amount: i64) -> NewTransaction {
    NewTransaction {
        name: name.into(),
        amount: Decimal::new(amount, 0),
        description: None,
        transaction_type_id: 2,
        date: Utc::now(),
        category_id: None,
    }
}

#[test]
fn fetch_accounts_replaces_collection_and_selects_first() {
    let server = FakeServer::new(|req| match req.path.as_str() {
        ACCOUNTS => ok(json!([[account("a1", "Main"), account("a2", "Savings")]])),
        _ => unauthorized(),
    });
    let store = store(&server, signed_in("a", "r"));

    assert_eq!(store.fetch_accounts(), Settled::Fulfilled);
    let state = store.state().accounts;
    assert_eq!(state.accounts.len(), 2);
    assert_eq!(state.current_account_id, Some(Id::from("a1")));
    assert_eq!(state.status, Status::idle());
}

#[test]
fn deleting_current_account_falls_back_to_first_remaining() {
    let server = FakeServer::new(|req| match req.path.as_str() {
        ACCOUNTS => ok(json!([[account("a1", "Main"), account("a2", "Savings")]])),
        DELETE_ACCOUNT => ok(json!(null)),
        _ => unauthorized(),
    });
    let store = store(&server, signed_in("a", "r"));
    assert!(store.fetch_accounts().is_fulfilled());

    assert!(store.delete_account(&Id::from("a1")).is_fulfilled());
    let state = store.state().accounts;
    assert_eq!(state.accounts.len(), 1);
    assert_eq!(state.current_account_id, Some(Id::from("a2")));

    let sent = server.last(DELETE_ACCOUNT).unwrap();
    assert_eq!(sent.body, RequestBody::Json(json!({ "id": "a1" })));

    assert!(store.delete_account(&Id::from("a2")).is_fulfilled());
    assert_eq!(store.state().accounts.current_account_id, None);
}

#[test]
fn select_account_ignores_unknown_id() {
    let server = FakeServer::new(|_| ok(json!([[account("a1", "Main"), account("a2", "Two")]])));
    let store = store(&server, signed_in("a", "r"));
    assert!(store.fetch_accounts().is_fulfilled());

    assert!(store.select_account(&Id::from("a2")));
    assert!(!store.select_account(&Id::from("zz")));
    assert_eq!(
        store.state().accounts.current_account_id,
        Some(Id::from("a2"))
    );
}

#[test]
fn created_transaction_is_listed_first() {
    let server = FakeServer::new(|req| match req.path.as_str() {
        TRANSACTIONS => ok(json!([{ "items": [transaction("t1", "Rent")] }])),
        CREATE_TRANSACTION => ok(transaction("t2", "Coffee")),
        _ => unauthorized(),
    });
    let store = store(&server, signed_in("a", "r"));
    assert!(store.fetch_transactions().is_fulfilled());
    assert_eq!(
        server.last(TRANSACTIONS).unwrap().query_value("PageSize"),
        Some("1000")
    );

    assert!(store.create_transaction(&new_tx("Coffee", 3)).is_fulfilled());
    let ids: Vec<String> = store
        .state()
        .transactions
        .transactions
        .iter()
        .map(|t| t.id.to_string())
        .collect();
    assert_eq!(ids, vec!["t2", "t1"]);
}

#[test]
fn non_positive_amount_is_rejected_before_sending() {
    let server = FakeServer::new(|_| ok(transaction("t1", "x")));
    let store = store(&server, signed_in("a", "r"));

    let outcome = store.create_transaction(&new_tx("Zero", 0));
    assert!(matches!(outcome, Settled::Rejected(_)));
    assert_eq!(server.calls(CREATE_TRANSACTION), 0);
    assert!(store.state().transactions.status.error.is_some());
}

#[test]
fn edit_of_unknown_transaction_leaves_state_untouched() {
    let server = FakeServer::new(|req| match req.path.as_str() {
        TRANSACTIONS => ok(json!([{ "items": [transaction("t1", "Rent")] }])),
        EDIT_TRANSACTION => ok(json!([[transaction("t9", "Ghost")]])),
        _ => unauthorized(),
    });
    let store = store(&server, signed_in("a", "r"));
    assert!(store.fetch_transactions().is_fulfilled());
    let before = store.state().transactions.transactions;

    let update = TransactionUpdate {
        id: Id::from("t9"),
        name: "Ghost".into(),
        description: None,
        category_id: None,
    };
    assert!(store.edit_transaction(&update).is_fulfilled());
    assert_eq!(store.state().transactions.transactions, before);
}

#[test]
fn edit_replaces_matching_transaction_in_place() {
    let server = FakeServer::new(|req| match req.path.as_str() {
        TRANSACTIONS => ok(json!([{ "items": [transaction("t1", "Rent"), transaction("t2", "Food")] }])),
        EDIT_TRANSACTION => ok(json!([[transaction("t2", "Groceries")]])),
        _ => unauthorized(),
    });
    let store = store(&server, signed_in("a", "r"));
    assert!(store.fetch_transactions().is_fulfilled());

    let update = TransactionUpdate {
        id: Id::from("t2"),
        name: "Groceries".into(),
        description: None,
        category_id: None,
    };
    assert!(store.edit_transaction(&update).is_fulfilled());
    let names: Vec<String> = store
        .state()
        .transactions
        .transactions
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["Rent", "Groceries"]);
}

#[test]
fn delete_transactions_removes_every_id() {
    let server = FakeServer::new(|req| match req.path.as_str() {
        TRANSACTIONS => ok(json!([{ "items": [
            transaction("t1", "a"), transaction("t2", "b"), transaction("t3", "c")
        ] }])),
        DELETE_TRANSACTIONS => ok(json!(null)),
        _ => unauthorized(),
    });
    let store = store(&server, signed_in("a", "r"));
    assert!(store.fetch_transactions().is_fulfilled());

    let ids = vec![Id::from("t1"), Id::from("t3")];
    assert!(store.delete_transactions(&ids).is_fulfilled());
    let left = store.state().transactions.transactions;
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, Id::from("t2"));
    assert_eq!(
        server.last(DELETE_TRANSACTIONS).unwrap().body,
        RequestBody::Json(json!({ "ids": ["t1", "t3"] }))
    );
}

#[test]
fn failed_fetch_keeps_previous_collection() {
    let fail = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let flag = fail.clone();
    let server = FakeServer::new(move |req| {
        if flag.load(std::sync::atomic::Ordering::SeqCst) {
            return status(500, json!({ "message": "Database unavailable" }));
        }
        match req.path.as_str() {
            TRANSACTIONS => ok(json!([{ "items": [transaction("t1", "Rent")] }])),
            _ => unauthorized(),
        }
    });
    let store = store(&server, signed_in("a", "r"));
    assert!(store.fetch_transactions().is_fulfilled());

    fail.store(true, std::sync::atomic::Ordering::SeqCst);
    let outcome = store.fetch_transactions();
    assert_eq!(outcome, Settled::Rejected("Database unavailable".into()));
    let state = store.state().transactions;
    assert_eq!(state.transactions.len(), 1);
    assert!(!state.status.loading);
    assert_eq!(state.status.error.as_deref(), Some("Database unavailable"));
}

#[test]
fn malformed_payload_is_rejected_not_emptied() {
    let server = FakeServer::new(|_| ok(json!({ "unexpected": true })));
    let store = store(&server, signed_in("a", "r"));

    assert!(matches!(store.fetch_accounts(), Settled::Rejected(_)));
    assert!(store.state().accounts.status.error.is_some());
}

#[test]
fn unrecoverable_session_logs_out() {
    let server = FakeServer::new(|req| match req.path.as_str() {
        REFRESH_PATH => status(400, json!({ "message": "refresh token revoked" })),
        _ => unauthorized(),
    });
    let storage = signed_in("old", "r1");
    let store = store(&server, storage.clone());

    let outcome = store.fetch_accounts();
    assert!(matches!(outcome, Settled::SessionEnded(_)), "{outcome:?}");
    assert!(!store.session().is_authenticated());
    assert_eq!(stored(&storage), (None, None));
    assert_eq!(store.state().accounts, AccountState::default());
}

#[test]
fn recurring_rule_start_must_be_in_the_future() {
    let server = FakeServer::new(|_| ok(rule("r1", "Gym")));
    let store = store(&server, signed_in("a", "r"));

    let mut draft = NewRecurringRule {
        name: "Gym".into(),
        amount: Decimal::new(30, 0),
        category_id: None,
        transaction_type_id: 2,
        recurring_frequency_id: 3,
        start_date: Utc::now(),
    };
    assert!(matches!(
        store.create_recurring_rule(&draft),
        Settled::Rejected(_)
    ));
    assert_eq!(server.calls(CREATE_RECURRING_RULE), 0);

    draft.start_date = Utc::now() + Duration::days(2);
    assert!(store.create_recurring_rule(&draft).is_fulfilled());
    assert_eq!(store.state().recurring.rules[0].name, "Gym");
}

#[test]
fn fetch_reports_loads_both_series() {
    let server = FakeServer::new(|req| match req.path.as_str() {
        MONTHLY_REPORTS => ok(json!([[{
            "month": "2025-01-01T00:00:00",
            "totalIncomeAmount": 2000,
            "totalExpenseAmount": 1500.25,
            "totalIncomeTransactionCount": 2,
            "totalExpenseTransactionCount": 10,
            "totalTransactionCount": 12
        }]])),
        MONTHLY_SAVINGS => ok(json!([
            { "month": "2025-01-01", "income": 2000, "expense": 1500.25, "savings": 499.75 }
        ])),
        _ => unauthorized(),
    });
    let store = store(&server, signed_in("a", "r"));

    assert!(store.fetch_reports().is_fulfilled());
    let reports = store.state().reports;
    assert_eq!(reports.monthly.len(), 1);
    assert_eq!(reports.monthly[0].total_transaction_count, 12);
    assert_eq!(reports.savings[0].savings, Decimal::new(49975, 2));
    assert_eq!(server.calls(MONTHLY_REPORTS), 1);
    assert_eq!(server.calls(MONTHLY_SAVINGS), 1);
}

#[test]
fn login_then_accounts_selects_first_account() {
    let server = FakeServer::new(|req| match (req.path.as_str(), req.authorization.as_deref()) {
        (LOGIN, _) => ok(token_pair("T", "R")),
        (ACCOUNTS, Some("T")) => ok(json!([[account("a1", "Main")]])),
        _ => unauthorized(),
    });
    let storage = Arc::new(MemoryTokenStorage::new());
    let store = store(&server, storage.clone());
    assert!(!store.session().is_authenticated());

    assert!(store.login("ada@example.com", "secret").is_fulfilled());
    assert_eq!(stored(&storage), (Some("T".into()), Some("R".into())));

    assert!(store.fetch_accounts().is_fulfilled());
    let accounts = store.state().accounts;
    assert_eq!(accounts.accounts.len(), 1);
    assert_eq!(accounts.current_account_id, Some(Id::from("a1")));
    assert_eq!(accounts.current().map(|a| a.name.as_str()), Some("Main"));
}

#[test]
fn reducer_does_not_mutate_input_state() {
    let before = AccountState::default();
    let after = before.reduce(AccountState::pending());
    assert!(after.status.loading);
    assert!(!before.status.loading);

    let failed = after.reduce(AccountState::rejected("boom".into()));
    assert_eq!(failed.status, Status::failed("boom".into()));
}

#[test]
fn created_account_is_appended_and_selected() {
    let server = FakeServer::new(|req| match req.path.as_str() {
        ACCOUNTS => ok(json!([[account("a", "Main"), account("b", "Savings")]])),
        CREATE_ACCOUNT => ok(json!([[account("u", "Holiday")]])),
        _ => unauthorized(),
    });
    let store = store(&server, signed_in("a", "r"));
    assert!(store.fetch_accounts().is_fulfilled());

    let draft = NewAccount {
        name: "Holiday".into(),
        balance: Decimal::new(250, 0),
        currency_id: 1,
        is_default: false,
    };
    assert!(store.create_account(&draft).is_fulfilled());

    let state = store.state().accounts;
    let ids: Vec<String> = state.accounts.iter().map(|a| a.id.to_string()).collect();
    assert_eq!(ids, vec!["a", "b", "u"]);
    assert_eq!(state.current_account_id, Some(Id::from("u")));
    let RequestBody::Json(body) = server.last(CREATE_ACCOUNT).unwrap().body else {
        panic!("expected a JSON body");
    };
    assert_eq!(body["currencyId"], 1);
}

/// The refresh call parks until the test releases it. Login always succeeds.
fn parked_refresh() -> (Arc<FakeServer>, mpsc::Receiver<()>, mpsc::Sender<()>) {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let entered = Mutex::new(entered_tx);
    let release = Mutex::new(release_rx);
    let server = FakeServer::new(move |req| {
        match (req.path.as_str(), req.authorization.as_deref()) {
            (REFRESH_PATH, _) => {
                entered.lock().send(()).unwrap();
                release.lock().recv().unwrap();
                ok(token_pair("fresh", "r2"))
            }
            (LOGIN, _) => ok(token_pair("T2", "R2")),
            (USER, Some("fresh")) => ok(user()),
            _ => unauthorized(),
        }
    });
    (server, entered_rx, release_tx)
}

#[test]
fn logout_while_refreshing_stays_logged_out() {
    let (server, entered, release) = parked_refresh();
    let storage = signed_in("stale", "r1");
    let store = store(&server, storage.clone());

    let outcome = thread::scope(|scope| {
        let pending = scope.spawn(|| store.fetch_user());
        entered.recv().unwrap();
        store.logout().unwrap();
        release.send(()).unwrap();
        pending.join().unwrap()
    });

    assert!(matches!(outcome, Settled::SessionEnded(_)), "{outcome:?}");
    assert_eq!(stored(&storage), (None, None));
    assert!(!store.session().is_authenticated());
    assert_eq!(store.state().user, UserState::default());
    assert_eq!(server.calls(USER), 1);
}

#[test]
fn login_while_refreshing_keeps_new_session() {
    let (server, entered, release) = parked_refresh();
    let storage = signed_in("stale", "r1");
    let store = store(&server, storage.clone());

    let outcome = thread::scope(|scope| {
        let pending = scope.spawn(|| store.fetch_user());
        entered.recv().unwrap();
        assert!(store.login("ada@example.com", "secret").is_fulfilled());
        release.send(()).unwrap();
        pending.join().unwrap()
    });

    assert!(matches!(outcome, Settled::SessionEnded(_)), "{outcome:?}");
    assert_eq!(stored(&storage), (Some("T2".into()), Some("R2".into())));
    assert_eq!(store.session().access_token.as_deref(), Some("T2"));
    assert_eq!(store.state().user, UserState::default());
}

#[test]
fn login_drops_previous_users_data() {
    let server = FakeServer::new(|req| match req.path.as_str() {
        LOGIN => ok(token_pair("T2", "R2")),
        ACCOUNTS => ok(json!([[account("a1", "Main")]])),
        _ => unauthorized(),
    });
    let store = store(&server, signed_in("a", "r"));
    assert!(store.fetch_accounts().is_fulfilled());
    assert_eq!(store.state().accounts.accounts.len(), 1);

    assert!(store.login("grace@example.com", "secret").is_fulfilled());
    assert_eq!(store.state().accounts, AccountState::default());
}

#[test]
fn failed_lookup_leaves_collection_status_alone() {
    let server = FakeServer::new(|req| match req.path.as_str() {
        ACCOUNTS => ok(json!([[account("a1", "Main")]])),
        _ => status(500, json!({ "message": "Enum service down" })),
    });
    let store = store(&server, signed_in("a", "r"));
    assert!(store.fetch_accounts().is_fulfilled());

    assert!(matches!(store.fetch_currencies(), Settled::Rejected(_)));
    let state = store.state();
    assert_eq!(state.accounts.status, Status::idle());
    assert_eq!(
        state.lookups.status.error.as_deref(),
        Some("Enum service down")
    );
    assert_eq!(state.accounts.accounts.len(), 1);
}

#[test]
fn entity_locks_forget_released_ids() {
    let locks = EntityLocks::default();
    let ids = vec![Id::from("t1"), Id::from("t2"), Id::from("t1")];

    let seen = locks.with(&ids, || locks.len());
    assert_eq!(seen, 2);
    assert!(locks.is_empty());

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..50 {
                    locks.with(&[Id::from("shared")], || ());
                }
            });
        }
    });
    assert!(locks.is_empty());
}
