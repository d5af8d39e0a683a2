//! In-memory TTL cache for scraper results.
//!
//! Thread-safe via `DashMap`. Freshness is checked lazily on `get()`; stale
//! entries stay in the map until a refresh overwrites them or `clear()` runs.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::descriptor::CacheKey;
use crate::types::RawItem;

/// How long a stored result is served without going upstream.
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Source of "now" for freshness checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub items: Vec<RawItem>,
    pub stored_at: DateTime<Utc>,
}

pub struct ResponseCache {
    entries: DashMap<CacheKey, CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::with_clock(CACHE_TTL, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Items stored under `key`, if present and younger than the TTL.
    pub fn get(&self, key: &CacheKey) -> Option<Vec<RawItem>> {
        let entry = self.entries.get(key)?;
        if self.is_fresh(&entry) {
            Some(entry.items.clone())
        } else {
            None
        }
    }

    /// Store `items` under `key`, replacing whatever was there.
    pub fn insert(&self, key: CacheKey, items: Vec<RawItem>) {
        let entry = CacheEntry {
            items,
            stored_at: self.clock.now(),
        };
        self.entries.insert(key, entry);
    }

    /// Drop every entry. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, _| {
            removed += 1;
            false
        });
        removed
    }

    /// Number of entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        let age = self.clock.now() - entry.stored_at;
        // A clock that went backwards yields a negative age; treat it as fresh.
        match age.to_std() {
            Ok(age) => age < self.ttl,
            Err(_) => true,
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}
