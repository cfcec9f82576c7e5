// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Token store: the in-memory session plus its durable backing.

use crate::config::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use crate::error::Result;
use crate::models::TokenPair;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Snapshot of the authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub is_refreshing: bool,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

/// Durable key/value storage for the token pair.
pub trait TokenStorage: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Process-local storage, for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryTokenStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(access: &str, refresh: &str) -> Self {
        let storage = Self::default();
        {
            let mut values = storage.values.lock();
            values.insert(ACCESS_TOKEN_KEY.to_string(), access.to_string());
            values.insert(REFRESH_TOKEN_KEY.to_string(), refresh.to_string());
        }
        storage
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.lock().remove(key);
        Ok(())
    }
}

impl<S: TokenStorage + ?Sized> TokenStorage for std::sync::Arc<S> {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Owns the [`Session`]. Only this type and the refresh coordinator write it.
///
/// `generation` moves whenever the session is replaced by a login or ended by
/// a clear. It is only written while the session write lock is held.
pub struct TokenStore {
    storage: Box<dyn TokenStorage>,
    session: RwLock<Session>,
    generation: AtomicU64,
}

impl TokenStore {
    /// Create an empty store. Call [`restore`](Self::restore) to load
    /// persisted tokens.
    pub fn new(storage: impl TokenStorage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
            session: RwLock::new(Session::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Populate the session from durable storage. Tokens are only adopted when
    /// both halves of the pair are present. Never touches the network.
    pub fn restore(&self) -> Result<Session> {
        let access = self.storage.load(ACCESS_TOKEN_KEY)?;
        let refresh = self.storage.load(REFRESH_TOKEN_KEY)?;
        let mut session = self.session.write();
        if let (Some(access), Some(refresh)) = (access, refresh) {
            debug!("restored persisted session");
            session.access_token = Some(access);
            session.refresh_token = Some(refresh);
        }
        Ok(session.clone())
    }

    /// Persist a new pair, then publish it to the session. Starts a new
    /// generation.
    pub fn set(&self, pair: &TokenPair) -> Result<()> {
        let mut session = self.session.write();
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.write_pair(&mut session, pair)
    }

    /// Publish a refreshed pair, unless the session was cleared or replaced
    /// since `generation` was read. Returns whether the pair was adopted.
    pub fn set_if_current(&self, generation: u64, pair: &TokenPair) -> Result<bool> {
        let mut session = self.session.write();
        if self.generation() != generation {
            debug!("session moved on, refreshed pair discarded");
            return Ok(false);
        }
        self.write_pair(&mut session, pair)?;
        Ok(true)
    }

    /// Erase both tokens from storage and from the session.
    pub fn clear(&self) -> Result<()> {
        let mut session = self.session.write();
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.erase(&mut session)
    }

    /// Clear only if nothing replaced the session since `generation` was read.
    pub fn clear_if_current(&self, generation: u64) -> Result<bool> {
        let mut session = self.session.write();
        if self.generation() != generation {
            return Ok(false);
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.erase(&mut session)?;
        Ok(true)
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn write_pair(&self, session: &mut Session, pair: &TokenPair) -> Result<()> {
        self.storage.save(ACCESS_TOKEN_KEY, &pair.access_token)?;
        self.storage.save(REFRESH_TOKEN_KEY, &pair.refresh_token)?;
        session.access_token = Some(pair.access_token.clone());
        session.refresh_token = Some(pair.refresh_token.clone());
        Ok(())
    }

    fn erase(&self, session: &mut Session) -> Result<()> {
        self.storage.remove(ACCESS_TOKEN_KEY)?;
        self.storage.remove(REFRESH_TOKEN_KEY)?;
        *session = Session::default();
        debug!("session cleared");
        Ok(())
    }

    pub fn session(&self) -> Session {
        self.session.read().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.session.read().access_token.clone()
    }

    /// Read the refresh token straight from durable storage.
    pub fn stored_refresh_token(&self) -> Result<Option<String>> {
        self.storage.load(REFRESH_TOKEN_KEY)
    }

    pub(crate) fn set_refreshing(&self, refreshing: bool) {
        self.session.write().is_refreshing = refreshing;
    }
}
