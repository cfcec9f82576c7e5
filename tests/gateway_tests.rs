// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{FakeServer, ok, signed_in, status, stored, token_pair, unauthorized, user};
use fintrack::api::USER;
use fintrack::config::ACCESS_TOKEN_KEY;
use fintrack::refresh::REFRESH_PATH;
use fintrack::transport::RequestBody;
use fintrack::{
    Api, AuthScheme, ClientError, Gateway, MemoryTokenStorage, TokenStorage, TokenStore,
};
use serde_json::json;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

fn api(
    server: &Arc<FakeServer>,
    storage: Arc<MemoryTokenStorage>,
    scheme: AuthScheme,
) -> Api<Arc<FakeServer>> {
    let tokens = TokenStore::new(storage);
    tokens.restore().unwrap();
    Api::new(Gateway::new(server.clone(), Arc::new(tokens), scheme))
}

/// Answers the profile call only for `valid`; refresh rotates to `next`.
fn rotating_server(valid: &'static str, next: (&'static str, &'static str)) -> Arc<FakeServer> {
    FakeServer::new(move |req| {
        if req.path == REFRESH_PATH {
            return ok(token_pair(next.0, next.1));
        }
        match req.authorization.as_deref() {
            Some(t) if t == valid => ok(user()),
            _ => unauthorized(),
        }
    })
}

#[test]
fn raw_scheme_sends_token_verbatim() {
    let server = FakeServer::new(|_| ok(user()));
    let api = api(&server, signed_in("tok", "r"), AuthScheme::Raw);
    api.user().unwrap();
    assert_eq!(server.requests()[0].authorization.as_deref(), Some("tok"));
}

#[test]
fn bearer_scheme_prefixes_token() {
    let server = FakeServer::new(|_| ok(user()));
    let api = api(&server, signed_in("tok", "r"), AuthScheme::Bearer);
    api.user().unwrap();
    assert_eq!(
        server.requests()[0].authorization.as_deref(),
        Some("Bearer tok")
    );
}

#[test]
fn expired_token_is_refreshed_and_request_replayed_once() {
    let server = rotating_server("fresh", ("fresh", "r2"));
    let storage = signed_in("stale", "r1");
    let api = api(&server, storage.clone(), AuthScheme::Raw);

    let profile = api.user().unwrap();
    assert_eq!(profile.first_name, "Ada");

    assert_eq!(server.refreshes(), 1);
    assert_eq!(server.calls(USER), 2);
    let replay = server.last(USER).unwrap();
    assert!(replay.retried);
    assert_eq!(replay.authorization.as_deref(), Some("fresh"));

    let refresh = server.last(REFRESH_PATH).unwrap();
    match refresh.body {
        RequestBody::Json(body) => assert_eq!(body, json!("r1")),
        other => panic!("unexpected refresh body {other:?}"),
    }

    assert_eq!(stored(&storage), (Some("fresh".into()), Some("r2".into())));
    let session = api.gateway().tokens().session();
    assert_eq!(session.access_token.as_deref(), Some("fresh"));
    assert!(!session.is_refreshing);

    api.user().unwrap();
    let follow_up = server.last(USER).unwrap();
    assert_eq!(follow_up.authorization.as_deref(), Some("fresh"));
    assert!(!follow_up.retried);
    assert_eq!(server.calls(USER), 3);
    assert_eq!(server.refreshes(), 1);
}

#[test]
fn second_unauthorized_is_not_retried_again() {
    let server = FakeServer::new(|req| {
        if req.path == REFRESH_PATH {
            ok(token_pair("new", "r2"))
        } else {
            unauthorized()
        }
    });
    let api = api(&server, signed_in("old", "r1"), AuthScheme::Raw);

    let err = api.user().unwrap_err();
    assert!(matches!(err, ClientError::AuthExpired), "{err:?}");
    assert_eq!(server.calls(USER), 2);
    assert_eq!(server.refreshes(), 1);
}

#[test]
fn missing_refresh_token_ends_session_without_refresh_call() {
    let server = FakeServer::new(|_| unauthorized());
    let storage = Arc::new(MemoryTokenStorage::new());
    storage.save(ACCESS_TOKEN_KEY, "orphan").unwrap();
    let api = api(&server, storage, AuthScheme::Raw);

    let err = api.user().unwrap_err();
    assert!(matches!(err, ClientError::SessionExpired(_)), "{err:?}");
    assert!(err.ends_session());
    assert_eq!(server.refreshes(), 0);
    assert_eq!(server.calls(USER), 1);
}

#[test]
fn network_failure_is_not_retried() {
    let server = FakeServer::new(|_| Err(ClientError::Network("connection reset".into())));
    let api = api(&server, signed_in("a", "r"), AuthScheme::Raw);

    let err = api.user().unwrap_err();
    assert!(matches!(err, ClientError::Network(_)), "{err:?}");
    assert_eq!(server.requests().len(), 1);
}

#[test]
fn non_auth_failure_keeps_server_message() {
    let server = FakeServer::new(|_| {
        status(
            400,
            json!({ "statusCode": 400, "message": "Bad request", "errors": ["Name is required"] }),
        )
    });
    let api = api(&server, signed_in("a", "r"), AuthScheme::Raw);

    let err = api.user().unwrap_err();
    assert_eq!(err.server_message(), Some("Name is required"));
    assert!(matches!(
        err,
        ClientError::Validation {
            status: Some(400),
            ..
        }
    ));
    assert_eq!(server.refreshes(), 0);
}

#[test]
fn rejected_refresh_clears_session() {
    let server = FakeServer::new(|req| {
        if req.path == REFRESH_PATH {
            status(400, json!({ "message": "invalid refresh token" }))
        } else {
            unauthorized()
        }
    });
    let storage = signed_in("old", "r1");
    let api = api(&server, storage.clone(), AuthScheme::Raw);

    let err = api.user().unwrap_err();
    assert!(matches!(err, ClientError::RefreshFailed(_)), "{err:?}");
    assert_eq!(server.calls(USER), 1);
    assert_eq!(stored(&storage), (None, None));
    assert!(!api.gateway().tokens().session().is_authenticated());
}

#[test]
fn refresh_without_token_pair_clears_session() {
    let server = FakeServer::new(|req| {
        if req.path == REFRESH_PATH {
            ok(json!([]))
        } else {
            unauthorized()
        }
    });
    let storage = signed_in("old", "r1");
    let api = api(&server, storage.clone(), AuthScheme::Raw);

    assert!(matches!(
        api.user().unwrap_err(),
        ClientError::RefreshFailed(_)
    ));
    assert_eq!(stored(&storage), (None, None));
}

#[test]
fn refresh_network_failure_keeps_tokens() {
    let server = FakeServer::new(|req| {
        if req.path == REFRESH_PATH {
            Err(ClientError::Network("timed out".into()))
        } else {
            unauthorized()
        }
    });
    let storage = signed_in("old", "r1");
    let api = api(&server, storage.clone(), AuthScheme::Raw);

    assert!(matches!(
        api.user().unwrap_err(),
        ClientError::RefreshFailed(_)
    ));
    assert_eq!(stored(&storage), (Some("old".into()), Some("r1".into())));
}

#[test]
fn concurrent_unauthorized_requests_share_one_refresh() {
    const CALLERS: usize = 8;
    let server = FakeServer::new(|req| {
        if req.path == REFRESH_PATH {
            thread::sleep(Duration::from_millis(50));
            return ok(token_pair("fresh", "r2"));
        }
        match req.authorization.as_deref() {
            Some("fresh") => ok(user()),
            _ => unauthorized(),
        }
    });
    let storage = signed_in("stale", "r1");
    let api = Arc::new(api(&server, storage.clone(), AuthScheme::Raw));
    let barrier = Arc::new(Barrier::new(CALLERS));

    let handles: Vec<_> = (0..CALLERS)
        .map(|_| {
            let api = api.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                api.user()
            })
        })
        .collect();

    for h in handles {
        assert!(h.join().unwrap().is_ok());
    }
    assert_eq!(server.refreshes(), 1);
    for replay in server.requests().iter().filter(|r| r.retried) {
        assert_eq!(replay.authorization.as_deref(), Some("fresh"));
    }
    assert_eq!(stored(&storage), (Some("fresh".into()), Some("r2".into())));
}

#[test]
fn login_with_bad_credentials_is_a_rejection() {
    let server = FakeServer::new(|_| {
        status(401, json!({ "message": "Invalid email or password" }))
    });
    let api = api(&server, Arc::new(MemoryTokenStorage::new()), AuthScheme::Raw);

    let err = api
        .login(&fintrack::models::Credentials {
            email: "ada@example.com".into(),
            password: "wrong".into(),
        })
        .unwrap_err();
    assert_eq!(err.server_message(), Some("Invalid email or password"));
    assert!(!err.ends_session());
    assert_eq!(server.refreshes(), 0);
}
