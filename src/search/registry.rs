//! Provider registry keyed by resource scheme

use crate::host::{AiTextSearchProvider, TextSearchProvider};
use std::collections::HashMap;
use std::sync::Arc;

/// Registered providers, one of each capability per scheme
#[derive(Default)]
pub struct ProviderRegistry {
    text: HashMap<String, Arc<dyn TextSearchProvider>>,
    ai: HashMap<String, Arc<dyn AiTextSearchProvider>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the standard text search provider for a scheme,
    /// replacing any previous one
    pub fn register_text_search_provider(
        &mut self,
        scheme: impl Into<String>,
        provider: Arc<dyn TextSearchProvider>,
    ) {
        self.text.insert(scheme.into(), provider);
    }

    /// Register the AI results provider for a scheme
    pub fn register_ai_text_search_provider(
        &mut self,
        scheme: impl Into<String>,
        provider: Arc<dyn AiTextSearchProvider>,
    ) {
        self.ai.insert(scheme.into(), provider);
    }

    pub fn text_provider(&self, scheme: &str) -> Option<Arc<dyn TextSearchProvider>> {
        self.text.get(scheme).cloned()
    }

    pub fn ai_provider(&self, scheme: &str) -> Option<Arc<dyn AiTextSearchProvider>> {
        self.ai.get(scheme).cloned()
    }
}
