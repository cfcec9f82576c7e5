// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Response envelope `{ statusCode, message, data, errors }` and the typed
//! decoders for each payload shape the API uses.
//!
//! Nesting depth differs between endpoints, so every endpoint names the shape
//! it expects. A body that does not match fails with
//! [`ClientError::MalformedResponse`] instead of decoding to an empty value.

use crate::error::{ClientError, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Rows<T> {
    Nested(Vec<Vec<T>>),
    Flat(Vec<T>),
}

fn envelope<T: DeserializeOwned>(endpoint: &str, body: &[u8]) -> Result<Option<T>> {
    let env: Envelope<T> = serde_json::from_slice(body)
        .map_err(|e| ClientError::malformed(endpoint, e.to_string()))?;
    Ok(env.data)
}

fn required<T: DeserializeOwned>(endpoint: &str, body: &[u8]) -> Result<T> {
    envelope(endpoint, body)?.ok_or_else(|| ClientError::malformed(endpoint, "missing data"))
}

/// `data: T`
pub fn single<T: DeserializeOwned>(endpoint: &str, body: &[u8]) -> Result<T> {
    required(endpoint, body)
}

/// `data: [T]`, first element.
pub fn first<T: DeserializeOwned>(endpoint: &str, body: &[u8]) -> Result<T> {
    let rows: Vec<T> = required(endpoint, body)?;
    rows.into_iter()
        .next()
        .ok_or_else(|| ClientError::malformed(endpoint, "empty data list"))
}

/// `data: [[T]]`, the inner list.
pub fn nested_list<T: DeserializeOwned>(endpoint: &str, body: &[u8]) -> Result<Vec<T>> {
    let outer: Vec<Vec<T>> = required(endpoint, body)?;
    outer
        .into_iter()
        .next()
        .ok_or_else(|| ClientError::malformed(endpoint, "empty outer list"))
}

/// `data: [[T]]`, first inner element.
pub fn nested_first<T: DeserializeOwned>(endpoint: &str, body: &[u8]) -> Result<T> {
    nested_optional(endpoint, body)?
        .ok_or_else(|| ClientError::malformed(endpoint, "no row returned"))
}

/// `data: [[T]]` where the server may legitimately return no row.
pub fn nested_optional<T: DeserializeOwned>(endpoint: &str, body: &[u8]) -> Result<Option<T>> {
    let outer: Option<Vec<Vec<T>>> = envelope(endpoint, body)?;
    Ok(outer
        .and_then(|o| o.into_iter().next())
        .and_then(|inner| inner.into_iter().next()))
}

/// `data: [{ items: [T] }]`
pub fn page<T: DeserializeOwned>(endpoint: &str, body: &[u8]) -> Result<Vec<T>> {
    let pages: Vec<Page<T>> = required(endpoint, body)?;
    pages
        .into_iter()
        .next()
        .map(|p| p.items)
        .ok_or_else(|| ClientError::malformed(endpoint, "no page returned"))
}

/// `data: [[T]]` or `data: [T]`, flattened.
pub fn rows<T: DeserializeOwned>(endpoint: &str, body: &[u8]) -> Result<Vec<T>> {
    match required(endpoint, body)? {
        Rows::Nested(outer) => Ok(outer.into_iter().flatten().collect()),
        Rows::Flat(rows) => Ok(rows),
    }
}

/// Map a non-success response to a validation failure, keeping the server's
/// explanation when the body carries one.
pub fn rejection(status: u16, body: &[u8]) -> ClientError {
    let message = serde_json::from_slice::<Envelope<Value>>(body)
        .ok()
        .and_then(|env| {
            env.errors
                .as_ref()
                .and_then(first_error)
                .or(env.message.filter(|m| !m.trim().is_empty()))
        });
    ClientError::Validation {
        status: Some(status),
        message,
    }
}

fn first_error(errors: &Value) -> Option<String> {
    match errors {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_error),
        Value::Object(map) => map.values().find_map(first_error),
        _ => None,
    }
}
