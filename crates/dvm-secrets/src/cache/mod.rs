//! Short-lived cache of resolved secret values
//!
//! One cache belongs to one resolution session. Entries expire lazily on
//! read after the TTL; callers bound residency further by calling
//! `clear()` once the enclosing command finishes. Values are held in
//! `Zeroizing` buffers so evicted secrets are wiped from memory.

mod clock;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use zeroize::Zeroizing;

pub use clock::{Clock, ManualClock, SystemClock};

/// Default time-to-live for cached secrets
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Composite cache key: provider, secret name and optional field key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub provider: String,
    pub name: String,
    pub key: Option<String>,
}

impl CacheKey {
    pub fn new(provider: &str, name: &str, key: Option<&str>) -> Self {
        Self {
            provider: provider.to_string(),
            name: name.to_string(),
            key: key.map(str::to_string),
        }
    }
}

struct CacheEntry {
    value: Zeroizing<String>,
    /// `None` when the TTL reaches past what `Instant` can represent
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// TTL cache keyed by `(provider, name, key)`
///
/// Safe for concurrent use: lookups share a read lock, mutations take the
/// write lock.
pub struct SecretCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl SecretCache {
    /// Create a cache with the given TTL and the system clock
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create a cache with an injected clock
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fetch a value if present and not expired
    pub fn get(&self, provider: &str, name: &str, key: Option<&str>) -> Option<String> {
        let now = self.clock.now();
        let entries = self.entries.read();
        entries
            .get(&CacheKey::new(provider, name, key))
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.as_str().to_string())
    }

    /// Store a value that expires one TTL from now
    ///
    /// A TTL too large to add to the current instant never expires.
    pub fn set(&self, provider: &str, name: &str, key: Option<&str>, value: impl Into<String>) {
        let entry = CacheEntry {
            value: Zeroizing::new(value.into()),
            expires_at: self.clock.now().checked_add(self.ttl),
        };
        self.entries
            .write()
            .insert(CacheKey::new(provider, name, key), entry);
    }

    /// Remove one entry
    pub fn delete(&self, provider: &str, name: &str, key: Option<&str>) {
        self.entries.write().remove(&CacheKey::new(provider, name, key));
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Remove expired entries, returning how many were dropped
    pub fn prune(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }

    /// Number of stored entries, including expired ones not yet pruned
    pub fn size(&self) -> usize {
        self.entries.read().len()
    }
}

impl Default for SecretCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl std::fmt::Debug for SecretCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretCache")
            .field("ttl", &self.ttl)
            .field("size", &self.size())
            .finish()
    }
}
