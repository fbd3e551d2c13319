// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory response cache with per-entry expiry.

use crate::clock::{Clock, SystemClock};
use crate::key::ResourceKey;
use crate::outcome::Outcome;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Shortest interval accepted by [`ResponseCache::spawn_sweeper`].
pub const MIN_SWEEP_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct StoredEntry {
    outcome: Outcome,
    /// `None` when `now + ttl` overflows; such entries never expire.
    expires_at: Option<Instant>,
}

impl StoredEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that found nothing live.
    pub misses: u64,
    /// Entries currently held, including expired ones not yet swept.
    pub keys: usize,
}

/// Process-wide store of resolved outcomes keyed by [`ResourceKey`].
///
/// Every entry carries its own TTL. Expired entries are invisible to
/// [`get`](Self::get) immediately and are physically removed either on that
/// lookup or by the sweeper started with [`spawn_sweeper`](Self::spawn_sweeper).
#[derive(Debug)]
pub struct ResponseCache {
    entries: RwLock<HashMap<ResourceKey, StoredEntry>>,
    clock: Arc<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResponseCache {
    /// Create an empty cache reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn with_system_clock() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// Look up a live entry.
    pub fn get(&self, key: &ResourceKey) -> Option<Outcome> {
        let now = self.clock.now();

        let expired = {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            let lookup = entries.get(key);
            if let Some(entry) = lookup.filter(|entry| entry.is_live(now)) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.outcome.clone());
            }
            lookup.is_some()
        };

        if expired {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            // Re-check: a fresh write may have landed between the two locks.
            if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
                entries.remove(key);
                tracing::debug!(key = %key, "Evicted expired entry on lookup");
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store or overwrite the entry for `key`, expiring after `ttl`.
    ///
    /// A zero TTL stores an entry that is already expired.
    pub fn set(&self, key: ResourceKey, outcome: Outcome, ttl: Duration) {
        let expires_at = self.clock.now().checked_add(ttl);
        tracing::debug!(key = %key, ttl_secs = ttl.as_secs(), success = outcome.is_success(), "Cached outcome");

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key, StoredEntry { outcome, expires_at });
    }

    /// Remove a single entry, returning it if it was present.
    pub fn remove(&self, key: &ResourceKey) -> Option<Outcome> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key).map(|entry| entry.outcome)
    }

    /// Remove every entry. Returns how many were dropped.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let removed = entries.len();
        entries.clear();
        removed
    }

    /// Drop every expired entry. Returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            keys: self.len(),
        }
    }

    /// Purge expired entries every `period` on the current tokio runtime.
    ///
    /// The task holds only a weak handle and stops once the cache is dropped.
    /// Periods shorter than [`MIN_SWEEP_PERIOD`] are raised to it.
    pub fn spawn_sweeper(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let period = period.max(MIN_SWEEP_PERIOD);
        let cache: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else {
                    break;
                };
                let purged = cache.purge_expired();
                if purged > 0 {
                    tracing::debug!(purged, remaining = cache.len(), "Swept expired cache entries");
                }
            }
        })
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::with_system_clock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use serde_json::json;

    const HOUR: Duration = Duration::from_secs(3600);

    fn create_test_cache() -> (ResponseCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = ResponseCache::new(clock.clone());
        (cache, clock)
    }

    fn key(id: &str) -> ResourceKey {
        ResourceKey::from_video_id(id)
    }

    #[test]
    fn test_get_returns_none_for_missing_key() {
        let (cache, _clock) = create_test_cache();
        assert!(cache.get(&key("missing")).is_none());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_get_returns_stored_outcome_within_ttl() {
        let (cache, clock) = create_test_cache();
        let outcome = Outcome::Success(json!({ "title": "T" }));
        cache.set(key("a"), outcome.clone(), 4 * HOUR);

        clock.advance(4 * HOUR - Duration::from_secs(1));
        assert_eq!(cache.get(&key("a")), Some(outcome));
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_get_drops_expired_entry() {
        let (cache, clock) = create_test_cache();
        cache.set(key("a"), Outcome::Failure(json!({ "statusCode": 410 })), HOUR);

        clock.advance(HOUR);
        assert!(cache.get(&key("a")).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_overwrites_existing_entry() {
        let (cache, _clock) = create_test_cache();
        cache.set(key("a"), Outcome::Failure(json!({ "statusCode": 500 })), HOUR);
        cache.set(key("a"), Outcome::Success(json!({ "title": "second" })), HOUR);

        assert_eq!(cache.get(&key("a")), Some(Outcome::Success(json!({ "title": "second" }))));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_overwrite_resets_expiry() {
        let (cache, clock) = create_test_cache();
        cache.set(key("a"), Outcome::Failure(json!({ "statusCode": 500 })), HOUR);
        clock.advance(HOUR / 2);
        cache.set(key("a"), Outcome::Success(json!({ "title": "T" })), 4 * HOUR);
        clock.advance(HOUR);

        assert!(cache.get(&key("a")).is_some());
    }

    #[test]
    fn test_zero_ttl_is_immediately_expired() {
        let (cache, _clock) = create_test_cache();
        cache.set(key("a"), Outcome::Success(json!({ "title": "T" })), Duration::ZERO);
        assert!(cache.get(&key("a")).is_none());
    }

    #[test]
    fn test_clear_removes_everything() {
        let (cache, _clock) = create_test_cache();
        cache.set(key("a"), Outcome::Success(json!({ "title": "A" })), HOUR);
        cache.set(key("b"), Outcome::Success(json!({ "title": "B" })), HOUR);

        assert_eq!(cache.clear(), 2);
        assert!(cache.is_empty());
        assert!(cache.get(&key("a")).is_none());
    }

    #[test]
    fn test_remove_returns_entry() {
        let (cache, _clock) = create_test_cache();
        cache.set(key("a"), Outcome::Success(json!({ "title": "A" })), HOUR);

        assert_eq!(cache.remove(&key("a")), Some(Outcome::Success(json!({ "title": "A" }))));
        assert_eq!(cache.remove(&key("a")), None);
    }

    #[test]
    fn test_purge_expired_keeps_live_entries() {
        let (cache, clock) = create_test_cache();
        cache.set(key("short"), Outcome::Failure(json!({ "statusCode": 410 })), HOUR);
        cache.set(key("long"), Outcome::Success(json!({ "title": "T" })), 4 * HOUR);

        clock.advance(2 * HOUR);
        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&key("long")).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_purges_in_background() {
        let clock = Arc::new(ManualClock::new());
        let cache = Arc::new(ResponseCache::new(clock.clone()));
        cache.set(key("a"), Outcome::Success(json!({ "title": "T" })), HOUR);
        clock.advance(2 * HOUR);

        let handle = cache.spawn_sweeper(Duration::from_secs(600));
        tokio::time::sleep(Duration::from_secs(601)).await;

        assert!(cache.is_empty());
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_with_zero_period_keeps_running() {
        let clock = Arc::new(ManualClock::new());
        let cache = Arc::new(ResponseCache::new(clock.clone()));
        cache.set(key("a"), Outcome::Success(json!({ "title": "T" })), HOUR);
        clock.advance(2 * HOUR);

        let handle = cache.spawn_sweeper(Duration::ZERO);
        tokio::time::sleep(MIN_SWEEP_PERIOD * 2).await;

        assert!(!handle.is_finished());
        assert!(cache.is_empty());

        drop(cache);
        tokio::time::sleep(MIN_SWEEP_PERIOD * 2).await;
        assert!(handle.await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_stops_when_cache_dropped() {
        let cache = Arc::new(ResponseCache::new(Arc::new(ManualClock::new())));
        let handle = cache.spawn_sweeper(Duration::from_secs(1));
        drop(cache);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(handle.await.is_ok());
    }
}
