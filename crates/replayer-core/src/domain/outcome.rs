//! Outcome model: classification of one replayed envelope.
//!
//! This module is architecture-agnostic: it does not know about gates, rounds
//! or counters. It only turns "what happened" into one of the outcome kinds.

use serde::{Deserialize, Serialize};

use super::errors::{TransportError, UnsupportedKind};
use super::request::TransportResponse;

/// Classification of a unit of work.
///
/// Serialized as SCREAMING_SNAKE_CASE to match the report field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    /// Success indicator from the transport.
    Completed,
    /// The call returned, but with a non-2xx status or a reported error.
    Failed,
    /// The transport call itself faulted.
    Exceptioned,
    /// The builder had no request shape for the envelope's kind.
    Unsupported,
    /// The round was cancelled before or during execution.
    Cancelled,
}

/// Classified result with an optional human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub reason: Option<String>,
}

impl Outcome {
    pub fn completed() -> Self {
        Self {
            kind: OutcomeKind::Completed,
            reason: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Failed,
            reason: Some(reason.into()),
        }
    }

    pub fn exceptioned(reason: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Exceptioned,
            reason: Some(reason.into()),
        }
    }

    pub fn unsupported(err: &UnsupportedKind) -> Self {
        Self {
            kind: OutcomeKind::Unsupported,
            reason: Some(err.0.to_string()),
        }
    }

    pub fn cancelled() -> Self {
        Self {
            kind: OutcomeKind::Cancelled,
            reason: None,
        }
    }

    /// Classify a transport result.
    ///
    /// Priority: fault (exceptioned) before non-success (failed) before success.
    /// Unsupported kinds never reach the transport and are classified by the
    /// caller via [`Outcome::unsupported`].
    pub fn classify(result: &Result<TransportResponse, TransportError>) -> Self {
        match result {
            Err(err) => Outcome::exceptioned(err.to_string()),
            Ok(response) if response.is_success() => Outcome::completed(),
            Ok(response) => Outcome::failed(failure_reason(response)),
        }
    }
}

fn failure_reason(response: &TransportResponse) -> String {
    match (&response.error, response.status) {
        (Some(error), _) => error.clone(),
        (None, Some(status)) => format!("http status {status}"),
        (None, None) => "no status".to_string(),
    }
}
