//! Session-scoped preloader gate.
//!
//! Decides whether the first-load warm-up screen must be shown. One JSON
//! record lives under a well-known key in an injected session store; the
//! record suppresses the preloader only while younger than the TTL. Every
//! failure mode fails open toward showing the warm-up screen, never toward
//! skipping it silently.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SessionStoreError;

/// Well-known key of the persisted preloader record.
pub const PRELOADER_CACHE_KEY: &str = "chasha_preloader_cache";

/// How long a record suppresses the preloader. Fixed.
pub const PRELOADER_TTL_MS: i64 = 30 * 60 * 1000;

/// A session-scoped key-value store.
///
/// One string value per key, atomic at the granularity of one record. The
/// embedding UI backs this with whatever session storage it has; tests use
/// [`MemorySessionStore`].
pub trait SessionStore {
    /// Read the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` if the store is unreadable.
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError>;

    /// Write `value` under `key`, overwriting any prior value.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` if the store is unwritable.
    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError>;

    /// Remove the value under `key` if present.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` if the store is unwritable.
    fn remove(&self, key: &str) -> Result<(), SessionStoreError>;
}

/// In-memory [`SessionStore`].
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionStoreError> {
        self.lock().remove(key);
        Ok(())
    }
}

/// The persisted record.
#[derive(Debug, Serialize, Deserialize)]
struct PreloaderRecord {
    /// Epoch milliseconds of the last time the preloader was shown.
    timestamp: i64,
    /// Always true once written; kept for parity with the stored shape.
    shown: bool,
}

/// TTL-gated decision over the persisted preloader record.
#[derive(Debug)]
pub struct PreloaderGate<S: SessionStore> {
    store: S,
}

impl<S: SessionStore> PreloaderGate<S> {
    /// Gate over an injected session store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Whether the warm-up screen must be shown now.
    ///
    /// True when the record is absent, unreadable, unparsable, or expired.
    #[must_use]
    pub fn should_show(&self) -> bool {
        self.should_show_at(Utc::now().timestamp_millis())
    }

    /// [`should_show`](Self::should_show) against an explicit clock.
    #[must_use]
    pub fn should_show_at(&self, now_ms: i64) -> bool {
        let raw = match self.store.get(PRELOADER_CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return true,
            Err(err) => {
                warn!(error = %err, "Failed to read preloader cache");
                return true;
            }
        };

        match serde_json::from_str::<PreloaderRecord>(&raw) {
            Ok(record) => now_ms - record.timestamp >= PRELOADER_TTL_MS,
            Err(err) => {
                warn!(error = %err, "Corrupt preloader cache record");
                true
            }
        }
    }

    /// Record that the preloader was shown just now.
    pub fn mark_shown(&self) {
        self.mark_shown_at(Utc::now().timestamp_millis());
    }

    /// [`mark_shown`](Self::mark_shown) against an explicit clock.
    pub fn mark_shown_at(&self, now_ms: i64) {
        let record = PreloaderRecord {
            timestamp: now_ms,
            shown: true,
        };
        // Serialization of a two-field struct cannot fail.
        let Ok(raw) = serde_json::to_string(&record) else {
            return;
        };
        if let Err(err) = self.store.set(PRELOADER_CACHE_KEY, &raw) {
            warn!(error = %err, "Failed to write preloader cache");
        }
    }

    /// Remove the persisted record.
    pub fn clear(&self) {
        if let Err(err) = self.store.remove(PRELOADER_CACHE_KEY) {
            warn!(error = %err, "Failed to clear preloader cache");
        }
    }
}
