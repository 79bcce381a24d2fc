use std::time::Duration;

use thiserror::Error;

use crate::{schema::SchemaViolation, validator::ValidationReport};

/// A single failed check against a weather response.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssertionError {
    #[error("unexpected HTTP status: expected {expected}, got {actual}")]
    UnexpectedStatus { expected: u16, actual: u16 },

    #[error("response took {elapsed:?}, limit is {limit:?}")]
    LatencyExceeded { elapsed: Duration, limit: Duration },

    #[error("response body does not match the current-weather schema ({} violation(s))", .violations.len())]
    SchemaValidation { violations: Vec<SchemaViolation> },

    #[error("field `{field}` mismatch: expected {expected}, got {actual}")]
    FieldMismatch {
        field: &'static str,
        expected: String,
        actual: String,
    },

    #[error("field `{field}` is missing or null")]
    MissingField { field: &'static str },
}

/// Failures below the assertion layer: the response never arrived.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("could not connect to weather API: {0}")]
    Connect(#[source] reqwest::Error),

    #[error("weather API request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("weather API request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("failed to read weather API response body: {0}")]
    Body(#[source] reqwest::Error),
}

impl TransportError {
    /// Classify a reqwest send error. The URL is dropped because it carries the API key.
    pub(crate) fn from_send(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            Self::Timeout(err)
        } else if err.is_connect() {
            Self::Connect(err)
        } else {
            Self::Request(err)
        }
    }

    pub(crate) fn from_body(err: reqwest::Error) -> Self {
        Self::Body(err.without_url())
    }
}

/// Outcome of a probe run that did not pass.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Network(#[from] TransportError),

    #[error("{} of {} checks failed", .0.failures().count(), .0.outcomes().len())]
    Assertions(ValidationReport),
}

impl ProbeError {
    /// True when the weather API was reached but the response failed validation.
    pub fn is_assertion_failure(&self) -> bool {
        matches!(self, ProbeError::Assertions(_))
    }
}
