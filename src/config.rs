// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://tracker-api.ddns.net/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Page size sent with unfiltered listings.
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

pub const API_URL_ENV: &str = "FINTRACK_API_URL";
pub const AUTH_SCHEME_ENV: &str = "FINTRACK_AUTH_SCHEME";
pub const LOG_ENV: &str = "FINTRACK_LOG";

/// Durable storage keys for the token pair.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// How the access token is rendered into the `Authorization` header.
///
/// Deployments disagree on whether a scheme prefix is expected, so this is a
/// setting rather than a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthScheme {
    /// Send the raw token value.
    #[default]
    Raw,
    /// Send `Bearer <token>`.
    Bearer,
}

impl AuthScheme {
    pub fn header_value(&self, token: &str) -> String {
        match self {
            AuthScheme::Raw => token.to_string(),
            AuthScheme::Bearer => format!("Bearer {token}"),
        }
    }
}

impl FromStr for AuthScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" | "none" => Ok(AuthScheme::Raw),
            "bearer" => Ok(AuthScheme::Bearer),
            other => Err(format!("Unknown auth scheme '{other}' (use raw|bearer)")),
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthScheme::Raw => f.write_str("raw"),
            AuthScheme::Bearer => f.write_str("bearer"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub auth_scheme: AuthScheme,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            auth_scheme: AuthScheme::Raw,
        }
    }
}
