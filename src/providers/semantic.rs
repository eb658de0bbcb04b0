//! AI results provider backed by the semantic engine

use super::{complete_with_error, reached_limit, stream_matches, CancellationBridge, Lifecycle, ProviderState};
use crate::backends::SemanticClient;
use crate::config::SettingsHandle;
use crate::error::BackendKind;
use crate::host::{
    AiTextSearchProvider, Notifier, ProgressSink, SearchOutcome, TextSearchComplete,
    TextSearchOptions, TextSearchQuery,
};
use crate::results::adapt_semantic;
use crate::search::SearchRequest;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Serves the host's AI results section from the semantic backend
pub struct SemanticSearchProvider {
    client: SemanticClient,
    settings: SettingsHandle,
    notifier: Arc<dyn Notifier>,
}

impl SemanticSearchProvider {
    pub fn new(client: SemanticClient, settings: SettingsHandle, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            settings,
            notifier,
        }
    }
}

#[async_trait]
impl AiTextSearchProvider for SemanticSearchProvider {
    async fn provide_ai_text_search_results(
        &self,
        query: &str,
        options: &TextSearchOptions,
        progress: &dyn ProgressSink,
        token: &CancellationToken,
    ) -> TextSearchComplete {
        let mut lifecycle = Lifecycle::new(BackendKind::Semantic);
        let settings = self.settings.snapshot();

        if !settings.semantic_server.enabled {
            debug!("Semantic search disabled, skipping");
            lifecycle.advance(ProviderState::Completed);
            return TextSearchComplete::empty(SearchOutcome::Completed);
        }

        let request = SearchRequest::from_host(&TextSearchQuery::new(query), options, &settings);
        if request.is_empty() {
            lifecycle.advance(ProviderState::Completed);
            return TextSearchComplete::empty(SearchOutcome::Completed);
        }

        let bridge = CancellationBridge::new(token);
        if bridge.is_cancelled() {
            lifecycle.advance(ProviderState::Cancelled);
            return TextSearchComplete::empty(SearchOutcome::Cancelled);
        }

        lifecycle.advance(ProviderState::Dispatched);
        let response = match self.client.search(&request, bridge.abort_signal()).await {
            Ok(response) => response,
            Err(e) => {
                return complete_with_error(&mut lifecycle, BackendKind::Semantic, e, &*self.notifier)
            }
        };

        let limit_hit = reached_limit(response.results.len(), request.max_results);
        let folder = &options.folder;
        let complete = stream_matches(
            &mut lifecycle,
            &bridge,
            progress,
            response.results.iter().map(|r| adapt_semantic(r, folder)),
            limit_hit,
        );

        info!(
            "Semantic search '{}' emitted {} of {} chunks",
            request.pattern, complete.emitted, response.total_results
        );
        complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::host::{CollectingSink, RecordingNotifier};
    use crate::network::{BackendAddress, HttpClient};
    use crate::results::REST_OF_LINE;
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer, enabled: bool) -> (SemanticSearchProvider, Arc<RecordingNotifier>) {
        let address = BackendAddress::parse(&server.uri()).unwrap();
        let client = SemanticClient::new(HttpClient::new(BackendKind::Semantic, address).unwrap());
        let mut settings = Settings::default();
        settings.semantic_server.enabled = enabled;
        settings.search.max_results = 20;
        let notifier = Arc::new(RecordingNotifier::new());
        let provider = SemanticSearchProvider::new(client, SettingsHandle::new(settings), notifier.clone());
        (provider, notifier)
    }

    fn options() -> TextSearchOptions {
        TextSearchOptions::new(Url::parse("file:///workspace/").unwrap())
    }

    #[tokio::test]
    async fn test_streams_chunks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .and(query_param("q", "where do we hash passwords"))
            .and(query_param("max", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {
                        "file_path": "src/auth.rs",
                        "content": "fn hash(p: &str) -> String {\n    argon(p)\n}",
                        "start_line": 40,
                        "end_line": 42,
                        "score": 0.91,
                        "chunk_type": "FUNCTION",
                        "symbol_name": "hash"
                    },
                    {
                        "file_path": "src/legacy.rs",
                        "content": "md5(p)",
                        "start_line": 7,
                        "end_line": 3,
                        "score": 0.55,
                        "chunk_type": "FIXED"
                    }
                ],
                "query": "where do we hash passwords",
                "total_results": 2,
                "elapsed_ms": 12.0
            })))
            .mount(&server)
            .await;

        let (provider, notifier) = provider(&server, true);
        let sink = CollectingSink::new();
        let complete = provider
            .provide_ai_text_search_results(
                "where do we hash passwords",
                &options(),
                &sink,
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(complete.outcome, SearchOutcome::Completed);
        assert_eq!(complete.emitted, 2);
        assert!(notifier.messages().is_empty());

        let matches = sink.take();
        assert_eq!(matches[0].uri.path(), "/workspace/src/auth.rs");
        assert_eq!(matches[0].range.start.line, 39);
        assert_eq!(matches[0].range.end.line, 41);
        assert_eq!(matches[0].range.end.character, REST_OF_LINE);
        assert_eq!(matches[1].range.start.line, 6);
        assert_eq!(matches[1].range.end.line, 6);
    }

    #[tokio::test]
    async fn test_disabled_never_calls_backend() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (provider, notifier) = provider(&server, false);
        let sink = CollectingSink::new();
        let complete = provider
            .provide_ai_text_search_results("anything", &options(), &sink, &CancellationToken::new())
            .await;

        assert_eq!(complete, TextSearchComplete::empty(SearchOutcome::Completed));
        assert!(sink.is_empty());
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_enabled_flag_is_live() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [],
                "query": "q",
                "total_results": 0,
                "elapsed_ms": 0.0
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (provider, _) = provider(&server, false);
        provider.settings.update(|s| s.semantic_server.enabled = true);

        let complete = provider
            .provide_ai_text_search_results("q", &options(), &CollectingSink::new(), &CancellationToken::new())
            .await;
        assert_eq!(complete.outcome, SearchOutcome::Completed);
    }

    #[tokio::test]
    async fn test_malformed_response_notifies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
            .mount(&server)
            .await;

        let (provider, notifier) = provider(&server, true);
        let complete = provider
            .provide_ai_text_search_results("q", &options(), &CollectingSink::new(), &CancellationToken::new())
            .await;

        assert_eq!(complete.outcome, SearchOutcome::Failed(BackendKind::Semantic));
        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("semantic search failed"));
    }
}
