//! Semantic (embedding) backend client

use super::traits::{lenient, lenient_line, HealthResponse};
use crate::error::{BackendKind, BackendResult};
use crate::network::HttpClient;
use crate::search::SearchRequest;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// How the semantic backend carved a chunk out of its file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum ChunkType {
    #[default]
    Fixed,
    Function,
    Class,
    Module,
}

impl From<String> for ChunkType {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "FUNCTION" => Self::Function,
            "CLASS" => Self::Class,
            "MODULE" => Self::Module,
            _ => Self::Fixed,
        }
    }
}

/// One retrieved chunk from the semantic backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticResult {
    pub file_path: String,
    /// Preview block, possibly several lines
    #[serde(default, deserialize_with = "lenient")]
    pub content: String,
    /// 1-based, inclusive
    #[serde(default, deserialize_with = "lenient_line")]
    pub start_line: i64,
    /// 1-based, inclusive
    #[serde(default, deserialize_with = "lenient_line")]
    pub end_line: i64,
    #[serde(default, rename = "score", alias = "similarity_score", deserialize_with = "lenient")]
    pub similarity_score: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub chunk_type: ChunkType,
    #[serde(default, deserialize_with = "lenient")]
    pub symbol_name: Option<String>,
}

/// Response of `GET /api/search` on the semantic backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticSearchResponse {
    pub results: Vec<SemanticResult>,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub total_results: usize,
    #[serde(default)]
    pub elapsed_ms: f64,
}

/// Response of `GET /api/stats` on the semantic backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticStats {
    pub num_files: u64,
    pub num_chunks: u64,
    pub embedding_dim: u64,
    pub cache_size: u64,
}

/// Client for the semantic backend
#[derive(Debug, Clone)]
pub struct SemanticClient {
    http: HttpClient,
}

impl SemanticClient {
    pub fn new(http: HttpClient) -> Self {
        debug_assert_eq!(http.backend(), BackendKind::Semantic);
        Self { http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Build the `/api/search` query string; globs and flags do not apply here
    pub fn query_params(request: &SearchRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![("q", request.pattern.clone())];
        if request.max_results > 0 {
            params.push(("max", request.max_results.to_string()));
        }
        params
    }

    pub async fn search(
        &self,
        request: &SearchRequest,
        abort: &CancellationToken,
    ) -> BackendResult<SemanticSearchResponse> {
        let params = Self::query_params(request);
        let response: SemanticSearchResponse =
            self.http.get_json("/api/search", &params, abort).await?;

        debug!(
            "Semantic backend returned {} chunks in {:.1}ms",
            response.results.len(),
            response.elapsed_ms
        );
        Ok(response)
    }

    pub async fn health(&self, abort: &CancellationToken) -> BackendResult<HealthResponse> {
        self.http.get_json("/api/health", &[], abort).await
    }

    pub async fn stats(&self, abort: &CancellationToken) -> BackendResult<SemanticStats> {
        self.http.get_json("/api/stats", &[], abort).await
    }

    pub fn update_address(&self, host: impl Into<String>, port: u16) {
        self.http.update_address(host, port);
    }
}
