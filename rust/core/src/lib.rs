// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # ytinfo Core
//!
//! Outcome-aware response cache sitting between an HTTP endpoint and an
//! external video metadata lookup.
//!
//! ## Overview
//!
//! - **Resource keys**: a short video id or a raw URL becomes one canonical
//!   cache key
//! - **Outcomes**: every lookup ends as a tagged `Success` or `Failure`
//! - **Response cache**: in-memory store with a per-entry TTL, an injected
//!   clock and a background expiry sweep
//! - **Fetch coordinator**: cache lookup, external fetch on miss, commit of
//!   the outcome with the TTL matching its kind
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ytinfo_core::{FetchCoordinator, ResourceRequest, ResponseCache, TtlPolicy};
//!
//! let cache = Arc::new(ResponseCache::with_system_clock());
//! let coordinator = FetchCoordinator::new(cache, Arc::new(fetcher), TtlPolicy::default());
//!
//! let outcome = coordinator.resolve(&ResourceRequest::from_id("dQw4w9WgXcQ")).await;
//! println!("{}", serde_json::to_string(&outcome.into_envelope())?);
//! ```

pub mod cache;
pub mod clock;
pub mod coordinator;
pub mod error;
pub mod fetcher;
pub mod key;
pub mod outcome;

pub use cache::{CacheStats, ResponseCache, MIN_SWEEP_PERIOD};
pub use clock::{Clock, ManualClock, SystemClock};
pub use coordinator::{FetchCoordinator, TtlPolicy, ERROR_CACHE_TTL, SUCCESS_CACHE_TTL};
pub use error::{Error, Result, MISSING_PARAMETER_MESSAGE};
pub use fetcher::{FetchError, MetadataFetcher};
pub use key::{ResourceKey, ResourceRequest, WATCH_URL_PREFIX};
pub use outcome::{classify, Envelope, Outcome, OutcomeKind};
