//! Keyword (trigram) backend client
//!
//! Talks to the exact-match engine's REST surface: `/api/search`,
//! `/api/health` and `/api/stats`.

use super::traits::{join_globs, lenient, lenient_i64, lenient_line, HealthResponse};
use crate::error::{BackendKind, BackendResult};
use crate::network::HttpClient;
use crate::search::SearchRequest;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Kind of keyword hit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum MatchType {
    #[default]
    Text,
    SymbolDefinition,
    SymbolReference,
}

impl From<String> for MatchType {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "SYMBOL_DEFINITION" => Self::SymbolDefinition,
            "SYMBOL_REFERENCE" => Self::SymbolReference,
            _ => Self::Text,
        }
    }
}

/// One match from the keyword backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordResult {
    pub file_path: String,
    /// Preview line text
    #[serde(default, deserialize_with = "lenient")]
    pub content: String,
    /// 1-based line number
    #[serde(default, deserialize_with = "lenient_line")]
    pub line_number: i64,
    /// Character offset of the match start within `content`
    #[serde(default, deserialize_with = "lenient_i64")]
    pub match_start: Option<i64>,
    /// Character offset just past the match within `content`
    #[serde(default, deserialize_with = "lenient_i64")]
    pub match_end: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub match_type: MatchType,
    #[serde(default, rename = "score", alias = "relevance_score", deserialize_with = "lenient")]
    pub relevance_score: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub dependency_count: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub content_truncated: bool,
}

/// Response of `GET /api/search` on the keyword backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSearchResponse {
    pub results: Vec<KeywordResult>,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub total_results: usize,
    #[serde(default)]
    pub elapsed_ms: f64,
    #[serde(default)]
    pub rank_mode: Option<String>,
    #[serde(default)]
    pub total_candidates: Option<u64>,
    #[serde(default)]
    pub candidates_searched: Option<u64>,
}

/// Response of `GET /api/stats` on the keyword backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordStats {
    pub num_files: u64,
    pub total_size: u64,
    pub num_trigrams: u64,
    pub dependency_edges: u64,
    pub total_content_bytes: u64,
}

/// Client for the keyword backend
#[derive(Debug, Clone)]
pub struct KeywordClient {
    http: HttpClient,
}

impl KeywordClient {
    pub fn new(http: HttpClient) -> Self {
        debug_assert_eq!(http.backend(), BackendKind::Keyword);
        Self { http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Build the `/api/search` query string
    pub fn query_params(request: &SearchRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![("q", request.pattern.clone())];

        if request.max_results > 0 {
            params.push(("max", request.max_results.to_string()));
        }
        if let Some(include) = join_globs(&request.include_globs) {
            params.push(("include", include));
        }
        if let Some(exclude) = join_globs(&request.exclude_globs) {
            params.push(("exclude", exclude));
        }
        if request.is_regex {
            params.push(("regex", "true".to_string()));
        }
        if request.symbols_only {
            params.push(("symbols", "true".to_string()));
        }

        params
    }

    /// Run a search
    pub async fn search(
        &self,
        request: &SearchRequest,
        abort: &CancellationToken,
    ) -> BackendResult<KeywordSearchResponse> {
        let params = Self::query_params(request);
        let response: KeywordSearchResponse =
            self.http.get_json("/api/search", &params, abort).await?;

        debug!(
            "Keyword backend returned {} of {} results in {:.1}ms",
            response.results.len(),
            response.total_results,
            response.elapsed_ms
        );
        Ok(response)
    }

    pub async fn health(&self, abort: &CancellationToken) -> BackendResult<HealthResponse> {
        self.http.get_json("/api/health", &[], abort).await
    }

    pub async fn stats(&self, abort: &CancellationToken) -> BackendResult<KeywordStats> {
        self.http.get_json("/api/stats", &[], abort).await
    }

    pub fn update_address(&self, host: impl Into<String>, port: u16) {
        self.http.update_address(host, port);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;
    use crate::network::BackendAddress;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> KeywordClient {
        let address = BackendAddress::parse(&server.uri()).unwrap();
        KeywordClient::new(HttpClient::new(BackendKind::Keyword, address).unwrap())
    }

    #[test]
    fn test_query_params() {
        let request = SearchRequest::new("foo")
            .with_max_results(10)
            .include("**/*.rs")
            .exclude("**/target/**")
            .regex(true)
            .symbols_only(true);

        let params = KeywordClient::query_params(&request);
        assert_eq!(
            params,
            vec![
                ("q", "foo".to_string()),
                ("max", "10".to_string()),
                ("include", "**/*.rs".to_string()),
                ("exclude", "**/target/**".to_string()),
                ("regex", "true".to_string()),
                ("symbols", "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_params_minimal() {
        let params = KeywordClient::query_params(&SearchRequest::new("bar"));
        assert_eq!(params, vec![("q", "bar".to_string())]);
    }

    #[test]
    fn test_result_decoding_is_lenient() {
        let result: KeywordResult = serde_json::from_value(json!({
            "file_path": "src/lib.rs",
            "content": "pub mod x;",
            "line_number": 4,
            "match_start": "oops",
            "match_type": "SOMETHING_NEW",
            "relevance_score": 0.5
        }))
        .unwrap();

        assert_eq!(result.line_number, 4);
        assert_eq!(result.match_start, None);
        assert_eq!(result.match_end, None);
        assert_eq!(result.match_type, MatchType::Text);
        assert_eq!(result.relevance_score, 0.5);
        assert_eq!(result.dependency_count, 0);
    }

    #[test]
    fn test_null_fields_fall_back_to_defaults() {
        let results: Vec<KeywordResult> = serde_json::from_value(json!([
            {
                "file_path": "src/a.rs",
                "content": null,
                "line_number": 7,
                "match_type": null,
                "score": null,
                "dependency_count": null,
                "content_truncated": null
            },
            {
                "file_path": "src/b.rs",
                "content": "let b = 1;",
                "line_number": 2,
                "score": 0.4
            }
        ]))
        .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].content, "");
        assert_eq!(results[0].line_number, 7);
        assert_eq!(results[0].match_type, MatchType::Text);
        assert_eq!(results[0].relevance_score, 0.0);
        assert_eq!(results[0].dependency_count, 0);
        assert!(!results[0].content_truncated);
        assert_eq!(results[1].relevance_score, 0.4);
    }

    #[test]
    fn test_match_type_decoding() {
        let t: MatchType = serde_json::from_str("\"SYMBOL_DEFINITION\"").unwrap();
        assert_eq!(t, MatchType::SymbolDefinition);
        let t: MatchType = serde_json::from_str("\"symbol_reference\"").unwrap();
        assert_eq!(t, MatchType::SymbolReference);
    }

    #[tokio::test]
    async fn test_search_decodes_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .and(query_param("q", "foo"))
            .and(query_param("max", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{
                    "file_path": "a.rs",
                    "content": "fn foo() {}",
                    "line_number": 3,
                    "match_start": 3,
                    "match_end": 6,
                    "match_type": "SYMBOL_DEFINITION",
                    "score": 0.9,
                    "dependency_count": 0,
                    "content_truncated": false
                }],
                "query": "foo",
                "total_results": 1,
                "elapsed_ms": 1.5,
                "rank_mode": "relevance"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = SearchRequest::new("foo").with_max_results(10);
        let response = client
            .search(&request, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.total_results, 1);
        assert_eq!(response.rank_mode.as_deref(), Some("relevance"));
        assert_eq!(response.results[0].match_type, MatchType::SymbolDefinition);
        assert_eq!(response.results[0].relevance_score, 0.9);
    }

    #[tokio::test]
    async fn test_stats_and_health() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "num_files": 12,
                "total_size": 2048,
                "num_trigrams": 900,
                "dependency_edges": 4,
                "total_content_bytes": 2000
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "version": "0.4.0"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let token = CancellationToken::new();
        let stats = client.stats(&token).await.unwrap();
        assert_eq!(stats.num_files, 12);
        assert_eq!(stats.num_trigrams, 900);

        let health = client.health(&token).await.unwrap();
        assert_eq!(health.version, "0.4.0");
    }

    #[tokio::test]
    async fn test_search_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .search(&SearchRequest::new("x"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BackendError::Request {
                backend: BackendKind::Keyword,
                status: 500,
                ..
            }
        ));
    }
}
