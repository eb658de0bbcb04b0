//! HTTP networking module
//!
//! Provides the HTTP client shared by the keyword and semantic backends.

mod client;

pub use client::{BackendAddress, HttpClient};
