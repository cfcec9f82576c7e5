// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error taxonomy shared by the transport, gateway, refresh coordinator and
//! domain stores.

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response (DNS, timeout, connection reset).
    #[error("network failure: {0}")]
    Network(String),

    /// The server rejected the access token and no retry was possible.
    #[error("authorization expired")]
    AuthExpired,

    /// No refresh token is available; the user has to log in again.
    #[error("session expired: {0}")]
    SessionExpired(String),

    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("request rejected: {}", .message.as_deref().unwrap_or("no details"))]
    Validation {
        status: Option<u16>,
        message: Option<String>,
    },

    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Client-side precondition failure, reported like a server rejection.
    pub fn invalid(message: impl Into<String>) -> Self {
        ClientError::Validation {
            status: None,
            message: Some(message.into()),
        }
    }

    pub fn malformed(endpoint: &str, reason: impl Into<String>) -> Self {
        ClientError::MalformedResponse {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }

    /// True when the failure cannot be recovered in place and the user must
    /// be logged out.
    pub fn ends_session(&self) -> bool {
        matches!(
            self,
            ClientError::SessionExpired(_) | ClientError::RefreshFailed(_)
        )
    }

    /// Message supplied by the server or by client-side validation, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Validation {
                message: Some(m), ..
            } if !m.trim().is_empty() => Some(m.as_str()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
