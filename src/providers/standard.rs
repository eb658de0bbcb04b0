//! Standard text search provider backed by the keyword engine

use super::{complete_with_error, reached_limit, stream_matches, CancellationBridge, Lifecycle, ProviderState};
use crate::backends::KeywordClient;
use crate::config::SettingsHandle;
use crate::error::BackendKind;
use crate::host::{
    Notifier, ProgressSink, SearchOutcome, TextSearchComplete, TextSearchOptions,
    TextSearchProvider, TextSearchQuery,
};
use crate::results::adapt_keyword;
use crate::search::SearchRequest;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Serves the host's text search from the keyword backend
pub struct StandardSearchProvider {
    client: KeywordClient,
    settings: SettingsHandle,
    notifier: Arc<dyn Notifier>,
}

impl StandardSearchProvider {
    pub fn new(client: KeywordClient, settings: SettingsHandle, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            settings,
            notifier,
        }
    }
}

#[async_trait]
impl TextSearchProvider for StandardSearchProvider {
    async fn provide_text_search_results(
        &self,
        query: &TextSearchQuery,
        options: &TextSearchOptions,
        progress: &dyn ProgressSink,
        token: &CancellationToken,
    ) -> TextSearchComplete {
        let mut lifecycle = Lifecycle::new(BackendKind::Keyword);

        // Settings are read per search so edits apply to the next one only
        let settings = self.settings.snapshot();
        let request = SearchRequest::from_host(query, options, &settings);

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
        debug!(
            "Keyword search '{}' (max {}, symbols only {})",
            request.pattern, request.max_results, request.symbols_only
        );

        let response = match self.client.search(&request, bridge.abort_signal()).await {
            Ok(response) => response,
            Err(e) => {
                return complete_with_error(&mut lifecycle, BackendKind::Keyword, e, &*self.notifier)
            }
        };

        let limit_hit = reached_limit(response.results.len(), request.max_results);
        let folder = &options.folder;
        let complete = stream_matches(
            &mut lifecycle,
            &bridge,
            progress,
            response.results.iter().map(|r| adapt_keyword(r, folder)),
            limit_hit,
        );

        info!(
            "Keyword search '{}' emitted {} of {} results",
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
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer, settings: Settings) -> (StandardSearchProvider, Arc<RecordingNotifier>) {
        let address = BackendAddress::parse(&server.uri()).unwrap();
        let client = KeywordClient::new(HttpClient::new(BackendKind::Keyword, address).unwrap());
        let notifier = Arc::new(RecordingNotifier::new());
        let provider = StandardSearchProvider::new(client, SettingsHandle::new(settings), notifier.clone());
        (provider, notifier)
    }

    fn options() -> TextSearchOptions {
        TextSearchOptions::new(Url::parse("file:///workspace/").unwrap())
    }

    fn hit(file: &str, line: i64) -> serde_json::Value {
        json!({
            "file_path": file,
            "content": "let needle = 1;",
            "line_number": line,
            "match_start": 4,
            "match_end": 10,
            "match_type": "TEXT",
            "score": 1.0,
            "dependency_count": 0
        })
    }

    #[tokio::test]
    async fn test_preserves_backend_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [hit("z.rs", 9), hit("a.rs", 1), hit("m.rs", 5)],
                "query": "needle",
                "total_results": 3,
                "elapsed_ms": 0.4
            })))
            .mount(&server)
            .await;

        let (provider, notifier) = provider(&server, Settings::default());
        let sink = CollectingSink::new();
        let complete = provider
            .provide_text_search_results(
                &TextSearchQuery::new("needle"),
                &options(),
                &sink,
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(complete.outcome, SearchOutcome::Completed);
        assert_eq!(complete.emitted, 3);
        let files: Vec<String> = sink
            .take()
            .iter()
            .map(|m| m.uri.path().to_string())
            .collect();
        assert_eq!(files, vec!["/workspace/z.rs", "/workspace/a.rs", "/workspace/m.rs"]);
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_settings_read_at_dispatch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .and(query_param("symbols", "true"))
            .and(query_param("max", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [],
                "query": "foo",
                "total_results": 0,
                "elapsed_ms": 0.1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (provider, notifier) = provider(&server, Settings::default());
        provider.settings.update(|s| {
            s.search.symbols_only = true;
            s.search.max_results = 5;
        });

        let complete = provider
            .provide_text_search_results(
                &TextSearchQuery::new("foo"),
                &options(),
                &CollectingSink::new(),
                &CancellationToken::new(),
            )
            .await;
        assert_eq!(complete.outcome, SearchOutcome::Completed);
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_empty_pattern_skips_backend() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (provider, _) = provider(&server, Settings::default());
        let complete = provider
            .provide_text_search_results(
                &TextSearchQuery::new("   "),
                &options(),
                &CollectingSink::new(),
                &CancellationToken::new(),
            )
            .await;
        assert_eq!(complete, TextSearchComplete::empty(SearchOutcome::Completed));
    }

    #[tokio::test]
    async fn test_limit_hit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [hit("a.rs", 1), hit("b.rs", 2)],
                "query": "needle",
                "total_results": 40,
                "elapsed_ms": 0.4
            })))
            .mount(&server)
            .await;

        let mut settings = Settings::default();
        settings.search.max_results = 2;
        let (provider, _) = provider(&server, settings);
        let complete = provider
            .provide_text_search_results(
                &TextSearchQuery::new("needle"),
                &options(),
                &CollectingSink::new(),
                &CancellationToken::new(),
            )
            .await;
        assert!(complete.limit_hit);
        assert_eq!(complete.emitted, 2);
    }

    #[tokio::test]
    async fn test_cancelled_before_dispatch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (provider, notifier) = provider(&server, Settings::default());
        let token = CancellationToken::new();
        token.cancel();

        let complete = provider
            .provide_text_search_results(&TextSearchQuery::new("x"), &options(), &CollectingSink::new(), &token)
            .await;
        assert_eq!(complete.outcome, SearchOutcome::Cancelled);
        assert!(notifier.messages().is_empty());
    }
}
