//! Backend error taxonomy
//!
//! Every failure a transport client can raise carries the backend it came
//! from, so providers can tell the user which service misbehaved.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two remote search services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Exact/trigram keyword engine
    Keyword,
    /// Natural-language embedding engine
    Semantic,
}

impl BackendKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Semantic => "semantic",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised by backend transport clients
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The backend answered with a non-success HTTP status
    #[error("{backend} backend returned HTTP {status} {status_text}")]
    Request {
        backend: BackendKind,
        status: u16,
        status_text: String,
    },

    /// The backend could not be reached
    #[error("{backend} backend is unavailable: {source}")]
    NetworkUnavailable {
        backend: BackendKind,
        #[source]
        source: reqwest::Error,
    },

    /// The request was aborted through its cancellation signal
    #[error("request cancelled")]
    Cancelled,

    /// The response body did not match the expected shape
    #[error("{backend} backend sent a malformed response: {source}")]
    MalformedResponse {
        backend: BackendKind,
        #[source]
        source: serde_json::Error,
    },
}

impl BackendError {
    /// Whether this is a cooperative abort rather than a real failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// HTTP status, for `Request` errors
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type BackendResult<T> = std::result::Result<T, BackendError>;
