//! dualsearch: serve an editor's search from two remote code search backends
//!
//! A fast keyword (trigram) engine backs the standard text search results and
//! a slower semantic (embedding) engine backs a separate AI results section.
//! This crate dispatches each host query to the backends over HTTP, maps
//! their 1-based results onto the host's 0-based ranges, streams matches back
//! one at a time, and keeps each backend's failures and cancellation away
//! from the other.

pub mod backends;
pub mod config;
pub mod error;
pub mod host;
pub mod network;
pub mod providers;
pub mod results;
pub mod search;
pub mod state;

pub use config::{Settings, SettingsHandle};
pub use error::{BackendError, BackendKind, BackendResult};
pub use host::{TextSearchComplete, TextSearchOptions, TextSearchQuery};
pub use results::HostMatch;
pub use search::{DualSearch, SearchRequest};
pub use state::AppState;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
