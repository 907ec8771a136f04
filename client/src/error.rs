//! Unified error types for the Tarmeez client
//!
//! This module defines error types for each layer:
//! - `ApiError`: HTTP adapter errors (transport, status mapping, decoding)
//! - `FeedError`: feed loader errors, split by whether the first page or a
//!   later page failed (callers surface the two differently)
//! - `ClientError`: application layer errors returned by the services

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

/// Tarmeez API client errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Unauthorized - missing or expired token")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Feed loader errors
///
/// A failed first page leaves the caller with nothing to show; a failed
/// later page leaves the already-rendered posts intact. Either way the
/// cursor is unchanged and the same page is retried on the next trigger.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Initial load failed: {source}")]
    InitialLoad {
        #[source]
        source: ApiError,
    },

    #[error("Loading page {page} failed: {source}")]
    SubsequentLoad {
        page: u32,
        #[source]
        source: ApiError,
    },
}

impl FeedError {
    /// True when the failure left the feed completely empty.
    pub fn is_initial(&self) -> bool {
        matches!(self, FeedError::InitialLoad { .. })
    }
}

/// Application layer errors - returned by the services
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Body shape of a 422 response: a top-level message plus per-field error
/// lists. BTreeMap keeps the field order stable for display.
#[derive(Debug, Deserialize)]
pub(crate) struct ValidationBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationBody {
    /// Flatten to a single line: the first message per field, falling back
    /// to the top-level message when no field errors were sent.
    pub fn flatten(&self) -> String {
        let field_messages: Vec<&str> = self
            .errors
            .values()
            .filter_map(|messages| messages.first())
            .map(String::as_str)
            .collect();

        if field_messages.is_empty() {
            self.message
                .clone()
                .unwrap_or_else(|| "unprocessable entity".to_string())
        } else {
            field_messages.join("; ")
        }
    }
}
