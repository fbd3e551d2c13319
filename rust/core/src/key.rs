// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Canonical cache keys for requested videos.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix a bare video id is expanded with.
pub const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// Query parameters naming the requested video.
///
/// Empty strings count as absent, so `?id=&url=x` resolves through `url`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceRequest {
    /// Short video id.
    pub id: Option<String>,
    /// Full video URL.
    pub url: Option<String>,
}

impl ResourceRequest {
    /// Request by video id.
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            url: None,
        }
    }

    /// Request by URL.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            id: None,
            url: Some(url.into()),
        }
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|s| !s.is_empty())
    }

    fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|s| !s.is_empty())
    }
}

/// Canonical URL used as the cache lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceKey(String);

impl ResourceKey {
    /// Expand a video id into its watch URL.
    pub fn from_video_id(id: &str) -> Self {
        Self(format!("{WATCH_URL_PREFIX}{id}"))
    }

    /// Use a URL as-is.
    pub fn from_url(url: &str) -> Self {
        Self(url.to_string())
    }

    /// Derive the key for a request. The id wins when both are present.
    pub fn from_request(request: &ResourceRequest) -> Result<Self> {
        match (request.id(), request.url()) {
            (Some(id), _) => Ok(Self::from_video_id(id)),
            (None, Some(url)) => Ok(Self::from_url(url)),
            (None, None) => Err(Error::InvalidRequest),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
