// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Client-side state and session management for a personal finance
//! tracking service.
//!
//! Construct a [`Store`] with [`TrackerBuilder`], then drive it with intents
//! (`fetch_accounts`, `create_transaction`, ...). Expired access tokens are
//! refreshed transparently; concurrent requests share a single refresh.

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod models;
pub mod refresh;
pub mod session;
pub mod store;
pub mod transport;
pub mod utils;

pub use api::Api;
pub use config::{AuthScheme, ClientConfig};
pub use error::{ClientError, Result};
pub use gateway::Gateway;
pub use session::{MemoryTokenStorage, Session, TokenStorage, TokenStore};
pub use store::{AppState, Settled, Store};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

enum StorageChoice {
    Default,
    Path(PathBuf),
    Custom(Arc<dyn TokenStorage>),
}

/// Builder for a [`Store`] talking to the remote API.
pub struct TrackerBuilder {
    config: ClientConfig,
    storage: StorageChoice,
}

impl Default for TrackerBuilder {
    fn default() -> Self {
        Self {
            config: ClientConfig::default(),
            storage: StorageChoice::Default,
        }
    }
}

impl TrackerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// API root, e.g. `https://host/api`. A trailing slash is ignored.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Per-request timeout. Defaults to 15 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn auth_scheme(mut self, scheme: AuthScheme) -> Self {
        self.config.auth_scheme = scheme;
        self
    }

    /// Persist tokens in a SQLite file at `path` instead of the platform
    /// data directory.
    pub fn database<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.storage = StorageChoice::Path(path.as_ref().to_path_buf());
        self
    }

    pub fn storage(mut self, storage: impl TokenStorage + 'static) -> Self {
        self.storage = StorageChoice::Custom(Arc::new(storage));
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build with the reqwest-backed transport.
    pub fn build(self) -> anyhow::Result<Store<HttpTransport>> {
        let client = utils::http_client(self.config.timeout)?;
        let transport = HttpTransport::new(&self.config.base_url, client);
        self.build_with(transport)
    }

    /// Build on top of any transport. The persisted session is restored
    /// before this returns.
    pub fn build_with<T: Transport>(self, transport: T) -> anyhow::Result<Store<T>> {
        let tokens = match self.storage {
            StorageChoice::Default => TokenStore::new(db::SqliteTokenStorage::open_default()?),
            StorageChoice::Path(path) => {
                TokenStore::new(db::SqliteTokenStorage::new(db::open_at(&path)?)?)
            }
            StorageChoice::Custom(storage) => TokenStore::new(storage),
        };
        let gateway = Gateway::new(transport, Arc::new(tokens), self.config.auth_scheme);
        Ok(Store::new(Api::new(gateway))?)
    }
}
