// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The HTTP seam. Requests are plain descriptors so they can be re-sent after
//! a token refresh and so tests can swap in a scripted transport.

use crate::error::Result;
use reqwest::blocking::Client;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    /// Multipart upload with a single `file` part.
    File { file_name: String, bytes: Vec<u8> },
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub authorization: Option<String>,
    /// Set once the gateway has spent this request's single auth retry.
    pub retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            body: RequestBody::Empty,
            authorization: None,
            retried: false,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: &str) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: &str) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    pub fn json<B: serde::Serialize>(mut self, body: &B) -> Result<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn file(mut self, file_name: &str, bytes: Vec<u8>) -> Self {
        self.body = RequestBody::File {
            file_name: file_name.to_string(),
            bytes,
        };
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

/// Sends one request and returns whatever the server answered.
///
/// `Err` means no response was obtained at all; HTTP error statuses are
/// returned as `Ok` and interpreted by the gateway.
pub trait Transport: Send + Sync {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        (**self).send(request)
    }
}

pub struct HttpTransport {
    base_url: String,
    client: Client,
}

impl HttpTransport {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.url(&request.path);
        debug!(method = ?request.method, %url, retried = request.retried, "sending request");

        let mut builder = self
            .client
            .request(request.method.as_reqwest(), &url)
            .query(&request.query);
        if let Some(auth) = &request.authorization {
            builder = builder.header(AUTHORIZATION, auth);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(v) => builder.json(v),
            RequestBody::File { file_name, bytes } => {
                let part = Part::bytes(bytes.clone()).file_name(file_name.clone());
                builder.multipart(Form::new().part("file", part))
            }
        };

        let resp = builder.send()?;
        let status = resp.status().as_u16();
        let body = resp.bytes()?.to_vec();
        debug!(%url, status, bytes = body.len(), "response received");
        Ok(ApiResponse { status, body })
    }
}
