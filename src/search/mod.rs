//! Search orchestration module
//!
//! Builds backend requests, keeps the provider registry, and runs both
//! providers for a query concurrently.

mod executor;
mod models;
mod registry;

pub use executor::{DualSearch, DualSearchResults, SearchSection, SectionKind};
pub use models::*;
pub use registry::ProviderRegistry;
