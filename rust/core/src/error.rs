// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for request resolution.

use thiserror::Error;

/// Literal message returned when a request names no resource.
pub const MISSING_PARAMETER_MESSAGE: &str = "Missing `url` or `id` parameter.";

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised before any cache or fetch work happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Neither a video id nor a URL was supplied.
    #[error("Missing `url` or `id` parameter.")]
    InvalidRequest,
}
