// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Short-lived cache for lookup lists (grades, attendance statuses).
//!
//! Entries are stored serialized inside a `{data, timestamp, ttl}` envelope
//! and expiry is checked on read, so a store that only keeps strings can
//! back the cache.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use time::OffsetDateTime;
use tracing::debug;

/// Cache key of the grade lookup list.
pub const GRADES_CACHE_KEY: &str = "attendance_grades_cache";

/// Cache key of the attendance status lookup list.
pub const STATUSES_CACHE_KEY: &str = "attendance_statuses_cache";

/// Source of the current time in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now_millis(&self) -> u64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        let nanos: i128 = OffsetDateTime::now_utc().unix_timestamp_nanos();
        u64::try_from(nanos / 1_000_000).unwrap_or(0)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Creates a clock reading `start` milliseconds.
    #[must_use]
    pub const fn new(start: u64) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let millis: u64 = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// The stored form of a cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEnvelope {
    /// The cached value.
    pub data: serde_json::Value,
    /// When the value was stored, in epoch milliseconds.
    pub timestamp: u64,
    /// How long the value stays fresh, in milliseconds.
    pub ttl: u64,
}

impl CacheEnvelope {
    /// Returns whether the entry is stale at `now`.
    #[must_use]
    pub const fn is_expired(&self, now: u64) -> bool {
        now.saturating_sub(self.timestamp) > self.ttl
    }
}

/// A key-value cache with per-entry expiry.
pub trait LookupCache: Send + Sync {
    /// Returns the value stored under `key`, unless it is missing, expired,
    /// or unreadable. Expired and unreadable entries are evicted.
    fn get(&self, key: &str) -> Option<serde_json::Value>;

    /// Stores a value for `ttl`.
    fn set(&self, key: &str, value: serde_json::Value, ttl: Duration);

    /// Removes a value.
    fn clear(&self, key: &str);
}

/// In-memory [`LookupCache`] holding serialized envelopes.
#[derive(Debug, Default)]
pub struct MemoryCache<C: Clock = SystemClock> {
    entries: Mutex<HashMap<String, String>>,
    clock: C,
}

impl MemoryCache<SystemClock> {
    /// Creates an empty cache on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> MemoryCache<C> {
    /// Creates an empty cache on the given clock.
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// The clock this cache reads.
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Stores a raw string under `key`, bypassing the envelope.
    pub fn set_raw(&self, key: &str, raw: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), raw.to_string());
    }

    /// Returns whether anything is stored under `key`, fresh or not.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }
}

impl<C: Clock> LookupCache for MemoryCache<C> {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let raw: &String = entries.get(key)?;
        let Ok(envelope) = serde_json::from_str::<CacheEnvelope>(raw) else {
            debug!(key, "Evicting unreadable cache entry");
            entries.remove(key);
            return None;
        };
        if envelope.is_expired(self.clock.now_millis()) {
            debug!(key, "Evicting expired cache entry");
            entries.remove(key);
            return None;
        }
        Some(envelope.data)
    }

    fn set(&self, key: &str, value: serde_json::Value, ttl: Duration) {
        let envelope: CacheEnvelope = CacheEnvelope {
            data: value,
            timestamp: self.clock.now_millis(),
            ttl: u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX),
        };
        match serde_json::to_string(&envelope) {
            Ok(raw) => {
                self.entries
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(key.to_string(), raw);
            }
            Err(e) => debug!(key, error = %e, "Skipping unserializable cache entry"),
        }
    }

    fn clear(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}
