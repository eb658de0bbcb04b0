//! Dual-provider search execution

use super::registry::ProviderRegistry;
use crate::config::SettingsHandle;
use crate::host::{CollectingSink, TextSearchComplete, TextSearchOptions, TextSearchQuery};
use crate::results::HostMatch;
use futures::join;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Which result section a provider feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Keyword matches
    Standard,
    /// Semantic matches
    Ai,
}

impl SectionKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Standard => "Text results",
            Self::Ai => "AI results",
        }
    }
}

/// Matches from one provider, in the order it reported them
#[derive(Debug, Clone)]
pub struct SearchSection {
    pub kind: SectionKind,
    pub matches: Vec<HostMatch>,
    /// `None` when no provider is registered for the scheme
    pub complete: Option<TextSearchComplete>,
}

/// Both sections of one search
#[derive(Debug, Clone)]
pub struct DualSearchResults {
    pub sections: Vec<SearchSection>,
}

impl DualSearchResults {
    pub fn section(&self, kind: SectionKind) -> Option<&SearchSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn total_matches(&self) -> usize {
        self.sections.iter().map(|s| s.matches.len()).sum()
    }
}

/// Runs the standard and AI providers for one query side by side
pub struct DualSearch {
    registry: Arc<ProviderRegistry>,
    settings: SettingsHandle,
}

impl DualSearch {
    pub fn new(registry: Arc<ProviderRegistry>, settings: SettingsHandle) -> Self {
        Self { registry, settings }
    }

    /// Execute a query against every provider registered for `scheme`
    ///
    /// Each provider reports into its own section, so a failure or a slow
    /// backend on one side never holds back the other.
    pub async fn execute(
        &self,
        scheme: &str,
        query: &TextSearchQuery,
        options: &TextSearchOptions,
        token: &CancellationToken,
    ) -> DualSearchResults {
        let standard = self.registry.text_provider(scheme);
        let ai = self.registry.ai_provider(scheme);

        let standard_sink = CollectingSink::new();
        let ai_sink = CollectingSink::new();

        info!("Executing search '{}' for scheme {}", query.pattern, scheme);

        let standard_search = async {
            match &standard {
                Some(provider) => Some(
                    provider
                        .provide_text_search_results(query, options, &standard_sink, token)
                        .await,
                ),
                None => None,
            }
        };
        let ai_search = async {
            match &ai {
                Some(provider) => Some(
                    provider
                        .provide_ai_text_search_results(&query.pattern, options, &ai_sink, token)
                        .await,
                ),
                None => None,
            }
        };

        let (standard_complete, ai_complete) = join!(standard_search, ai_search);

        let mut sections = vec![
            SearchSection {
                kind: SectionKind::Standard,
                matches: standard_sink.take(),
                complete: standard_complete,
            },
            SearchSection {
                kind: SectionKind::Ai,
                matches: ai_sink.take(),
                complete: ai_complete,
            },
        ];

        if self.settings.snapshot().search.prefer_semantic {
            sections.reverse();
        }

        DualSearchResults { sections }
    }
}
