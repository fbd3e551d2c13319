// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server configuration loaded from environment variables.

use std::str::FromStr;
use std::time::Duration;
use ytinfo_core::TtlPolicy;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Interface to bind.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Drop every cached entry before serving.
    pub clear_cache: bool,
    /// Lifetime of cached successful lookups in seconds.
    pub success_ttl_secs: u64,
    /// Lifetime of cached failed lookups in seconds.
    pub error_ttl_secs: u64,
    /// Interval of the expired-entry sweep in seconds.
    pub cache_check_period_secs: u64,
    /// oEmbed endpoint queried for metadata.
    pub oembed_endpoint: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |name: &str, default: u64| -> u64 { parse_or(lookup(name), default) };

        Self {
            host: lookup("HOST")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(lookup("PORT"), 43634),
            // Any non-empty value turns it on, "0" included.
            clear_cache: lookup("CLEAR_CACHE").is_some_and(|s| !s.is_empty()),
            success_ttl_secs: parsed("SUCCESS_CACHE_TTL_SECS", 14_400),
            error_ttl_secs: parsed("ERROR_CACHE_TTL_SECS", 3_600),
            cache_check_period_secs: parsed("CACHE_CHECK_PERIOD_SECS", 600).max(1),
            oembed_endpoint: lookup("YOUTUBE_OEMBED_ENDPOINT")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "https://www.youtube.com/oembed".into()),
        }
    }

    pub fn ttl_policy(&self) -> TtlPolicy {
        TtlPolicy {
            success: Duration::from_secs(self.success_ttl_secs),
            failure: Duration::from_secs(self.error_ttl_secs),
        }
    }

    pub fn cache_check_period(&self) -> Duration {
        Duration::from_secs(self.cache_check_period_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
