// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tagged lookup outcomes and the classifier for untyped fetch values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of resolving a request: metadata or an error payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Metadata returned by the fetcher.
    Success(Value),
    /// Error payload, or the missing-parameter message.
    Failure(Value),
}

/// Which side of an [`Outcome`] a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    Failure,
}

/// Classify an untyped value.
///
/// A value is a failure when it is an object with no attributes, or when it
/// carries a truthy `statusCode` attribute. Everything else is a success.
/// An empty metadata object is therefore reported as a failure.
pub fn classify(value: &Value) -> OutcomeKind {
    let Value::Object(map) = value else {
        return OutcomeKind::Success;
    };

    if map.is_empty() || map.get("statusCode").is_some_and(is_truthy) {
        OutcomeKind::Failure
    } else {
        OutcomeKind::Success
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl Outcome {
    /// Wrap a value the fetcher reported as successful, demoting it to a
    /// failure when [`classify`] says so.
    pub fn from_fetched(value: Value) -> Self {
        match classify(&value) {
            OutcomeKind::Success => Outcome::Success(value),
            OutcomeKind::Failure => Outcome::Failure(value),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Convert into the `{ success, data }` response body.
    pub fn into_envelope(self) -> Envelope {
        Envelope::from(self)
    }
}

/// Response body returned for every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    pub data: Value,
}

impl From<Outcome> for Envelope {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success(data) => Envelope {
                success: true,
                data,
            },
            Outcome::Failure(data) => Envelope {
                success: false,
                data,
            },
        }
    }
}
