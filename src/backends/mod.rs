//! Search backend clients
//!
//! One typed client per remote service. Both are thin wrappers over
//! [`crate::network::HttpClient`] and never retry.

mod keyword;
mod semantic;
mod traits;

pub use keyword::{KeywordClient, KeywordResult, KeywordSearchResponse, KeywordStats, MatchType};
pub use semantic::{ChunkType, SemanticClient, SemanticResult, SemanticSearchResponse, SemanticStats};
pub use traits::{join_globs, HealthResponse};
