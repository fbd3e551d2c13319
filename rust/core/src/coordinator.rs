// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cache-first resolution of metadata requests.

use crate::cache::ResponseCache;
use crate::error::Error;
use crate::fetcher::MetadataFetcher;
use crate::key::{ResourceKey, ResourceRequest};
use crate::outcome::Outcome;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// How long successful lookups stay cached (4 hours).
pub const SUCCESS_CACHE_TTL: Duration = Duration::from_secs(14_400);

/// How long failed lookups stay cached (1 hour).
pub const ERROR_CACHE_TTL: Duration = Duration::from_secs(3_600);

/// Expiry applied to each kind of outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub success: Duration,
    pub failure: Duration,
}

impl TtlPolicy {
    pub fn for_outcome(&self, outcome: &Outcome) -> Duration {
        if outcome.is_success() {
            self.success
        } else {
            self.failure
        }
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            success: SUCCESS_CACHE_TTL,
            failure: ERROR_CACHE_TTL,
        }
    }
}

/// Resolves requests against the cache, fetching on miss.
///
/// Concurrent misses for one key are not coalesced: each runs its own fetch
/// and the last one to finish owns the cache entry.
#[derive(Clone)]
pub struct FetchCoordinator {
    cache: Arc<ResponseCache>,
    fetcher: Arc<dyn MetadataFetcher>,
    ttl: TtlPolicy,
}

impl FetchCoordinator {
    pub fn new(cache: Arc<ResponseCache>, fetcher: Arc<dyn MetadataFetcher>, ttl: TtlPolicy) -> Self {
        Self {
            cache,
            fetcher,
            ttl,
        }
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn ttl(&self) -> TtlPolicy {
        self.ttl
    }

    /// Resolve a request into an outcome. Never fails: an invalid request
    /// becomes an uncached failure carrying the missing-parameter message.
    pub async fn resolve(&self, request: &ResourceRequest) -> Outcome {
        match ResourceKey::from_request(request) {
            Ok(key) => self.resolve_key(&key).await,
            Err(err @ Error::InvalidRequest) => {
                tracing::debug!(error = %err, "Rejected request without a resource");
                Outcome::Failure(Value::String(err.to_string()))
            }
        }
    }

    /// Resolve an already-canonical key.
    ///
    /// A fetched value that [`classify`](crate::outcome::classify) marks as a
    /// failure (such as `{}`) is returned as a failure on this first call too
    /// and cached with the failure TTL.
    pub async fn resolve_key(&self, key: &ResourceKey) -> Outcome {
        if let Some(cached) = self.cache.get(key) {
            tracing::info!(key = %key, success = cached.is_success(), "Cache HIT");
            return cached;
        }

        tracing::info!(key = %key, "Cache MISS - fetching");

        let outcome = match self.fetcher.fetch(key).await {
            Ok(metadata) => Outcome::from_fetched(metadata),
            Err(err) => {
                tracing::warn!(key = %key, status_code = ?err.status_code, error = %err, "Metadata fetch failed");
                Outcome::Failure(err.to_payload())
            }
        };

        self.cache
            .set(key.clone(), outcome.clone(), self.ttl.for_outcome(&outcome));
        outcome
    }
}
