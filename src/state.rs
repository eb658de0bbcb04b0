//! Application state shared by the host and the providers

use crate::backends::{HealthResponse, KeywordClient, KeywordStats, SemanticClient, SemanticStats};
use crate::config::{Settings, SettingsHandle};
use crate::error::{BackendKind, BackendResult};
use crate::host::{Notifier, FILE_SCHEME};
use crate::network::{BackendAddress, HttpClient};
use crate::providers::{SemanticSearchProvider, StandardSearchProvider};
use crate::search::{DualSearch, ProviderRegistry};
use futures::join;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Live settings
    pub settings: SettingsHandle,
    /// Keyword backend client
    pub keyword: KeywordClient,
    /// Semantic backend client
    pub semantic: SemanticClient,
    /// Providers registered for the `file` scheme
    pub registry: Arc<ProviderRegistry>,
    /// Dual-provider executor
    pub search: Arc<DualSearch>,
}

impl AppState {
    /// Create clients and providers from the given settings
    pub fn new(settings: Settings, notifier: Arc<dyn Notifier>) -> anyhow::Result<Self> {
        let keyword = KeywordClient::new(HttpClient::with_settings(
            BackendKind::Keyword,
            BackendAddress::new(
                settings.keyword_server.scheme.clone(),
                settings.keyword_server.host.clone(),
                settings.keyword_server.port,
            ),
            &settings.outgoing,
        )?);
        let semantic = SemanticClient::new(HttpClient::with_settings(
            BackendKind::Semantic,
            BackendAddress::new(
                settings.semantic_server.scheme.clone(),
                settings.semantic_server.host.clone(),
                settings.semantic_server.port,
            ),
            &settings.outgoing,
        )?);

        let settings = SettingsHandle::new(settings);

        let mut registry = ProviderRegistry::new();
        registry.register_text_search_provider(
            FILE_SCHEME,
            Arc::new(StandardSearchProvider::new(
                keyword.clone(),
                settings.clone(),
                notifier.clone(),
            )),
        );
        registry.register_ai_text_search_provider(
            FILE_SCHEME,
            Arc::new(SemanticSearchProvider::new(
                semantic.clone(),
                settings.clone(),
                notifier,
            )),
        );

        let registry = Arc::new(registry);
        let search = Arc::new(DualSearch::new(registry.clone(), settings.clone()));

        info!(
            "Keyword backend at {}, semantic backend at {}",
            keyword.http().address(),
            semantic.http().address()
        );

        Ok(Self {
            settings,
            keyword,
            semantic,
            registry,
            search,
        })
    }

    /// Apply new settings between searches
    ///
    /// Backend addresses are swapped in place; searches already running keep
    /// the address and settings they started with.
    pub fn reconfigure(&self, settings: Settings) {
        for (client, server) in [
            (self.keyword.http(), &settings.keyword_server.scheme),
            (self.semantic.http(), &settings.semantic_server.scheme),
        ] {
            if client.address().scheme != *server {
                warn!(
                    "Scheme change for {} backend to {} ignored until restart",
                    client.backend(),
                    server
                );
            }
        }

        self.keyword.update_address(
            settings.keyword_server.host.clone(),
            settings.keyword_server.port,
        );
        self.semantic.update_address(
            settings.semantic_server.host.clone(),
            settings.semantic_server.port,
        );
        self.settings.replace(settings);
        info!("Settings reloaded");
    }

    /// Query both health endpoints concurrently
    pub async fn health(
        &self,
        token: &CancellationToken,
    ) -> (BackendResult<HealthResponse>, BackendResult<HealthResponse>) {
        join!(self.keyword.health(token), self.semantic.health(token))
    }

    /// Query both stats endpoints concurrently
    pub async fn stats(
        &self,
        token: &CancellationToken,
    ) -> (BackendResult<KeywordStats>, BackendResult<SemanticStats>) {
        join!(self.keyword.stats(token), self.semantic.stats(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingNotifier;

    #[test]
    fn test_state_registers_both_providers() {
        let state = AppState::new(Settings::default(), Arc::new(RecordingNotifier::new())).unwrap();
        assert!(state.registry.text_provider(FILE_SCHEME).is_some());
        assert!(state.registry.ai_provider(FILE_SCHEME).is_some());
        assert_eq!(state.keyword.http().address(), BackendAddress::http("127.0.0.1", 3000));
    }

    #[test]
    fn test_reconfigure_updates_addresses() {
        let state = AppState::new(Settings::default(), Arc::new(RecordingNotifier::new())).unwrap();

        let mut settings = Settings::default();
        settings.keyword_server.host = "10.0.0.5".to_string();
        settings.semantic_server.port = 7000;
        settings.semantic_server.enabled = true;
        state.reconfigure(settings);

        assert_eq!(state.keyword.http().address(), BackendAddress::http("10.0.0.5", 3000));
        assert_eq!(state.semantic.http().address().port, 7000);
        assert!(state.settings.snapshot().semantic_server.enabled);
    }
}
