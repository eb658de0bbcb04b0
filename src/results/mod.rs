//! Host result types and the backend coordinate adapter

mod adapter;
mod types;

pub use adapter::{adapt_keyword, adapt_semantic, line_index, resolve_uri, REST_OF_LINE};
pub use types::*;
