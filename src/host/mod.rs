//! Host boundary
//!
//! The editor side of the bridge: what a search request looks like, where
//! matches are reported, how the user is told about failures, and the two
//! capability contracts providers implement.

mod sink;

pub use sink::{CollectingSink, RecordingNotifier};

use crate::error::BackendKind;
use crate::results::HostMatch;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Resource scheme providers register against by default
pub const FILE_SCHEME: &str = "file";

/// What the user typed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSearchQuery {
    pub pattern: String,
    pub is_regex: bool,
}

impl TextSearchQuery {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            is_regex: false,
        }
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            is_regex: true,
        }
    }
}

/// Per-request options bag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSearchOptions {
    /// Workspace folder backend paths are relative to
    pub folder: Url,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub max_results: Option<usize>,
}

impl TextSearchOptions {
    pub fn new(folder: Url) -> Self {
        Self {
            folder,
            includes: Vec::new(),
            excludes: Vec::new(),
            max_results: None,
        }
    }
}

/// Receives matches one at a time
pub trait ProgressSink: Send + Sync {
    fn report(&self, result: HostMatch);
}

/// User-visible notifications
pub trait Notifier: Send + Sync {
    fn show_error(&self, message: String);
}

/// How a provider invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOutcome {
    Completed,
    Cancelled,
    /// The named backend failed; the user has been notified
    Failed(BackendKind),
}

/// Completion summary handed back to the host
///
/// Always a normal completion: backend failures and cancellation are folded
/// into `outcome` rather than raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSearchComplete {
    /// The backend stopped at the requested cap
    pub limit_hit: bool,
    /// Matches reported to the sink
    pub emitted: usize,
    pub outcome: SearchOutcome,
}

impl TextSearchComplete {
    pub fn empty(outcome: SearchOutcome) -> Self {
        Self {
            limit_hit: false,
            emitted: 0,
            outcome,
        }
    }
}

/// Standard text search capability
#[async_trait]
pub trait TextSearchProvider: Send + Sync {
    async fn provide_text_search_results(
        &self,
        query: &TextSearchQuery,
        options: &TextSearchOptions,
        progress: &dyn ProgressSink,
        token: &CancellationToken,
    ) -> TextSearchComplete;
}

/// AI/semantic results capability, shown as a separate section by the host
#[async_trait]
pub trait AiTextSearchProvider: Send + Sync {
    async fn provide_ai_text_search_results(
        &self,
        query: &str,
        options: &TextSearchOptions,
        progress: &dyn ProgressSink,
        token: &CancellationToken,
    ) -> TextSearchComplete;
}
