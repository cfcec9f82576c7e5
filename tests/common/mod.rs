// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use fintrack::config::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use fintrack::refresh::REFRESH_PATH;
use fintrack::{
    ApiRequest, ApiResponse, ClientError, MemoryTokenStorage, Store, TokenStorage, TrackerBuilder,
    Transport,
};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;

type Handler = dyn Fn(&ApiRequest) -> Result<ApiResponse, ClientError> + Send + Sync;

/// In-process server: every request is recorded, then answered by `handler`.
pub struct FakeServer {
    handler: Box<Handler>,
    log: Mutex<Vec<ApiRequest>>,
}

impl FakeServer {
    pub fn new<F>(handler: F) -> Arc<Self>
    where
        F: Fn(&ApiRequest) -> Result<ApiResponse, ClientError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            handler: Box::new(handler),
            log: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().clone()
    }

    pub fn calls(&self, path: &str) -> usize {
        self.log.lock().iter().filter(|r| r.path == path).count()
    }

    pub fn last(&self, path: &str) -> Option<ApiRequest> {
        self.log.lock().iter().rev().find(|r| r.path == path).cloned()
    }

    pub fn refreshes(&self) -> usize {
        self.calls(REFRESH_PATH)
    }
}

impl Transport for FakeServer {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError> {
        self.log.lock().push(request.clone());
        (self.handler)(request)
    }
}

pub fn ok(data: Value) -> Result<ApiResponse, ClientError> {
    let body = json!({ "statusCode": 200, "message": "", "data": data });
    Ok(ApiResponse::new(200, body.to_string()))
}

pub fn status(code: u16, body: Value) -> Result<ApiResponse, ClientError> {
    Ok(ApiResponse::new(code, body.to_string()))
}

pub fn unauthorized() -> Result<ApiResponse, ClientError> {
    Ok(ApiResponse::new(401, Vec::new()))
}

pub fn token_pair(access: &str, refresh: &str) -> Value {
    json!([{ "accessToken": access, "refreshToken": refresh }])
}

pub fn account(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "balance": 100.5,
        "currency": { "id": 1, "name": "EUR" },
        "isDefault": false
    })
}

pub fn transaction(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "amount": 12.5,
        "currency": { "id": 1, "name": "EUR" },
        "description": null,
        "date": "2025-03-01T00:00:00",
        "type": { "id": 2, "name": "Expense" },
        "categoryId": null
    })
}

pub fn rule(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "amount": 30,
        "type": { "id": 2, "name": "Expense" },
        "recurringFrequencyId": 3,
        "nextRunAt": "2030-01-01T00:00:00Z",
        "isActive": true
    })
}

pub fn user() -> Value {
    json!([{
        "id": "u1",
        "firstName": "Ada",
        "lastName": "Byron",
        "email": { "address": "ada@example.com", "isConfirmed": true },
        "role": { "id": 1, "name": "User" }
    }])
}

/// Storage pre-seeded with a token pair.
pub fn signed_in(access: &str, refresh: &str) -> Arc<MemoryTokenStorage> {
    Arc::new(MemoryTokenStorage::with_tokens(access, refresh))
}

pub fn stored(storage: &MemoryTokenStorage) -> (Option<String>, Option<String>) {
    (
        storage.load(ACCESS_TOKEN_KEY).unwrap(),
        storage.load(REFRESH_TOKEN_KEY).unwrap(),
    )
}

pub fn store(server: &Arc<FakeServer>, storage: Arc<MemoryTokenStorage>) -> Store<Arc<FakeServer>> {
    TrackerBuilder::new()
        .storage(storage)
        .build_with(server.clone())
        .unwrap()
}
