// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Single-flight token refresh.
//!
//! The first caller that needs a new token performs the refresh call; callers
//! arriving while it is in flight block on a condvar and share its outcome.
//! Refresh tokens rotate on every use: at most one refresh call is in flight.

use crate::envelope;
use crate::error::{ClientError, Result};
use crate::models::TokenPair;
use crate::session::TokenStore;
use crate::transport::{ApiRequest, Transport};
use parking_lot::{Condvar, Mutex};
use serde_json::Value;
use tracing::{debug, info, warn};

pub const REFRESH_PATH: &str = "/Auth/refresh-token";

#[derive(Default)]
struct Flight {
    in_flight: bool,
    epoch: u64,
    outcome: Option<std::result::Result<TokenPair, String>>,
}

#[derive(Default)]
pub struct RefreshCoordinator {
    flight: Mutex<Flight>,
    landed: Condvar,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Obtain a fresh token pair.
    ///
    /// `stale` is the access token the failed request carried. If the session
    /// already holds a different token, another caller refreshed in the
    /// meantime and that token is returned without a network call.
    pub fn refresh<T: Transport + ?Sized>(
        &self,
        transport: &T,
        tokens: &TokenStore,
        stale: Option<&str>,
    ) -> Result<TokenPair> {
        let mut flight = self.flight.lock();

        if flight.in_flight {
            let epoch = flight.epoch;
            debug!("refresh already in flight, waiting");
            while flight.in_flight && flight.epoch == epoch {
                self.landed.wait(&mut flight);
            }
            return match &flight.outcome {
                Some(Ok(pair)) => Ok(pair.clone()),
                Some(Err(reason)) => Err(ClientError::RefreshFailed(reason.clone())),
                None => Err(ClientError::RefreshFailed("refresh outcome unavailable".into())),
            };
        }

        let session = tokens.session();
        if let (Some(access), Some(refresh)) = (session.access_token, session.refresh_token) {
            if stale != Some(access.as_str()) {
                debug!("token already rotated by an earlier refresh");
                return Ok(TokenPair {
                    access_token: access,
                    refresh_token: refresh,
                });
            }
        }

        flight.in_flight = true;
        tokens.set_refreshing(true);
        drop(flight);

        let outcome = perform(transport, tokens);

        let mut flight = self.flight.lock();
        flight.in_flight = false;
        flight.epoch += 1;
        flight.outcome = Some(match &outcome {
            Ok(pair) => Ok(pair.clone()),
            Err(e) => Err(e.to_string()),
        });
        tokens.set_refreshing(false);
        self.landed.notify_all();
        outcome
    }
}

fn perform<T: Transport + ?Sized>(transport: &T, tokens: &TokenStore) -> Result<TokenPair> {
    let generation = tokens.generation();
    let refresh_token = tokens
        .stored_refresh_token()?
        .ok_or_else(|| ClientError::SessionExpired("no refresh token stored".into()))?;

    let request = ApiRequest::post(REFRESH_PATH).json(&Value::String(refresh_token))?;
    let response = transport.send(&request).map_err(|e| {
        warn!(error = %e, "refresh call did not complete");
        ClientError::RefreshFailed(e.to_string())
    })?;

    if !response.is_success() {
        warn!(status = response.status, "refresh rejected by server");
        tokens.clear_if_current(generation)?;
        return Err(ClientError::RefreshFailed(format!(
            "server rejected refresh with status {}",
            response.status
        )));
    }

    let pair = match envelope::first::<TokenPair>(REFRESH_PATH, &response.body) {
        Ok(pair) if !pair.access_token.is_empty() => pair,
        _ => {
            warn!("refresh response carried no usable token pair");
            tokens.clear_if_current(generation)?;
            return Err(ClientError::RefreshFailed(
                "response carried no usable token pair".into(),
            ));
        }
    };

    // A logout or login while the call was out owns the session now.
    if !tokens.set_if_current(generation, &pair)? {
        return Err(ClientError::SessionExpired(
            "session ended while refreshing".into(),
        ));
    }
    info!("access token refreshed");
    Ok(pair)
}
