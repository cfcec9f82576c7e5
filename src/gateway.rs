// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Authenticated request gateway.

use crate::config::AuthScheme;
use crate::envelope;
use crate::error::{ClientError, Result};
use crate::refresh::RefreshCoordinator;
use crate::session::TokenStore;
use crate::transport::{ApiRequest, ApiResponse, Transport};
use std::sync::Arc;
use tracing::debug;

/// Attaches the access token to every request and recovers from a 401 by
/// refreshing the session and re-sending the request once.
pub struct Gateway<T: Transport> {
    transport: T,
    tokens: Arc<TokenStore>,
    refresher: RefreshCoordinator,
    scheme: AuthScheme,
}

impl<T: Transport> Gateway<T> {
    pub fn new(transport: T, tokens: Arc<TokenStore>, scheme: AuthScheme) -> Self {
        Self {
            transport,
            tokens,
            refresher: RefreshCoordinator::new(),
            scheme,
        }
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send without credentials and without the refresh path. Used by the
    /// login and registration calls.
    pub fn send_anonymous(&self, request: ApiRequest) -> Result<ApiResponse> {
        let response = self.transport.send(&request)?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(envelope::rejection(response.status, &response.body))
        }
    }

    /// Send an authenticated request. Only 2xx responses are returned as `Ok`.
    pub fn send(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        let used = self.tokens.access_token();
        request.authorization = used.as_deref().map(|t| self.scheme.header_value(t));

        let response = self.transport.send(&request)?;
        if !response.is_unauthorized() {
            return success(response);
        }
        if request.retried {
            return Err(ClientError::AuthExpired);
        }
        request.retried = true;

        if self.tokens.stored_refresh_token()?.is_none() {
            return Err(ClientError::SessionExpired("no refresh token stored".into()));
        }

        debug!(path = %request.path, "access token rejected, refreshing");
        let pair = self
            .refresher
            .refresh(&self.transport, &self.tokens, used.as_deref())?;
        request.authorization = Some(self.scheme.header_value(&pair.access_token));

        let retry = self.transport.send(&request)?;
        if retry.is_unauthorized() {
            debug!(path = %request.path, "retry rejected as well");
            return Err(ClientError::AuthExpired);
        }
        success(retry)
    }
}

fn success(response: ApiResponse) -> Result<ApiResponse> {
    if response.is_success() {
        Ok(response)
    } else if response.is_unauthorized() {
        Err(ClientError::AuthExpired)
    } else {
        Err(envelope::rejection(response.status, &response.body))
    }
}
