//! Search request models

use crate::config::Settings;
use crate::host::{TextSearchOptions, TextSearchQuery};
use serde::{Deserialize, Serialize};

/// One host-issued query, as sent to a backend
///
/// Built per invocation from the host query, the host options and a settings
/// snapshot taken at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub pattern: String,
    pub is_regex: bool,
    /// Include globs, order preserved
    pub include_globs: Vec<String>,
    /// Exclude globs, order preserved
    pub exclude_globs: Vec<String>,
    /// Zero means "backend default"
    pub max_results: usize,
    pub symbols_only: bool,
}

impl SearchRequest {
    /// Create a plain text request with no limits
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            is_regex: false,
            include_globs: Vec::new(),
            exclude_globs: Vec::new(),
            max_results: 0,
            symbols_only: false,
        }
    }

    /// Derive a request from what the host asked for and the live settings
    ///
    /// The host's own result cap can only lower the configured one.
    pub fn from_host(
        query: &TextSearchQuery,
        options: &TextSearchOptions,
        settings: &Settings,
    ) -> Self {
        let configured = settings.search.max_results;
        let max_results = match options.max_results {
            Some(host_max) if configured == 0 => host_max,
            Some(host_max) => host_max.min(configured),
            None => configured,
        };

        Self {
            pattern: query.pattern.clone(),
            is_regex: query.is_regex,
            include_globs: options.includes.clone(),
            exclude_globs: options.excludes.clone(),
            max_results,
            symbols_only: settings.search.symbols_only,
        }
    }

    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    pub fn include(mut self, glob: impl Into<String>) -> Self {
        self.include_globs.push(glob.into());
        self
    }

    pub fn exclude(mut self, glob: impl Into<String>) -> Self {
        self.exclude_globs.push(glob.into());
        self
    }

    pub fn regex(mut self, is_regex: bool) -> Self {
        self.is_regex = is_regex;
        self
    }

    pub fn symbols_only(mut self, symbols_only: bool) -> Self {
        self.symbols_only = symbols_only;
        self
    }

    /// Check if the pattern has anything to search for
    pub fn is_empty(&self) -> bool {
        self.pattern.trim().is_empty()
    }
}
