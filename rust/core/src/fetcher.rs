// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The external metadata lookup seam.

use crate::key::ResourceKey;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Structured failure reported by a [`MetadataFetcher`].
///
/// Serializes as `{ "statusCode": 410, "message": "..." }`, omitting
/// whichever field is unset.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
#[serde(rename_all = "camelCase")]
pub struct FetchError {
    /// Upstream HTTP status, when the failure came from a response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl FetchError {
    /// Failure carrying an upstream status code.
    pub fn status(status_code: u16) -> Self {
        Self {
            status_code: Some(status_code),
            message: String::new(),
        }
    }

    /// Failure without a status code (transport, decoding, validation).
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status_code: None,
            message: message.into(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Payload stored in the cache and returned as response `data`.
    pub fn to_payload(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::String(self.message.clone()))
    }
}

/// Retrieves metadata for a video.
///
/// Implementations must not cache; the coordinator owns caching.
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    async fn fetch(&self, key: &ResourceKey) -> Result<Value, FetchError>;
}
