//! Error types for the jobs screen core.
//!
//! # Design
//! Transport failures and non-2xx statuses get separate variants even
//! though the screen handles both the same way: the task keeps the
//! variant, so hosts and logs can tell "no network" from "server said no".
//! Decode failures carry the index of the array element being read when
//! parsing stopped, which is also the number of records a partial ingest
//! kept.

use serde_json::error::Category;

/// Errors produced while fetching and ingesting the job list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The host could not complete the round-trip (DNS, connect, timeout).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The body is not syntactically valid JSON, or its top level is not
    /// an array.
    #[error("malformed response body at element {index}: {message}")]
    MalformedBody { index: usize, message: String },

    /// The body is JSON but element `index` is not a job object, e.g. a
    /// required key is missing or a value is not a string.
    #[error("invalid job at element {index}: {message}")]
    InvalidRecord { index: usize, message: String },
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        FetchError::Transport(message.into())
    }

    /// Classify a serde_json failure raised while reading element `index`.
    pub(crate) fn from_json(err: serde_json::Error, index: usize) -> Self {
        let message = err.to_string();
        match err.classify() {
            Category::Data => FetchError::InvalidRecord { index, message },
            Category::Syntax | Category::Eof | Category::Io => {
                FetchError::MalformedBody { index, message }
            }
        }
    }

    /// The body failed before its top-level array was entered: bad syntax,
    /// or JSON of some other shape.
    pub(crate) fn malformed_top_level(err: serde_json::Error) -> Self {
        FetchError::MalformedBody {
            index: 0,
            message: err.to_string(),
        }
    }
}

/// Errors produced while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown ingest policy `{0}` (expected `partial` or `atomic`)")]
    UnknownIngestPolicy(String),
}
