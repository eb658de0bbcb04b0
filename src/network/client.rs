//! HTTP client for making requests to search backends

use crate::config::OutgoingSettings;
use crate::error::{BackendError, BackendKind, BackendResult};
use anyhow::Result;
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// `scheme://host:port` base address of a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendAddress {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl BackendAddress {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            port,
        }
    }

    /// Plain-HTTP address
    pub fn http(host: impl Into<String>, port: u16) -> Self {
        Self::new("http", host, port)
    }

    /// Parse `scheme://host:port`, as handed out by stub servers in tests
    pub fn parse(base: &str) -> Option<Self> {
        let url = url::Url::parse(base).ok()?;
        Some(Self::new(
            url.scheme(),
            url.host_str()?,
            url.port_or_known_default()?,
        ))
    }

    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}

impl fmt::Display for BackendAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url())
    }
}

/// HTTP client wrapper bound to one backend
///
/// Clones share the connection pool and the address.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    backend: BackendKind,
    address: Arc<RwLock<BackendAddress>>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new(backend: BackendKind, address: BackendAddress) -> Result<Self> {
        Self::with_settings(backend, address, &OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(
        backend: BackendKind,
        address: BackendAddress,
        settings: &OutgoingSettings,
    ) -> Result<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(settings.pool_maxsize)
            .user_agent(settings.user_agent.clone())
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            backend,
            address: Arc::new(RwLock::new(address)),
        })
    }

    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    /// Current base address
    pub fn address(&self) -> BackendAddress {
        self.address
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Point subsequent requests at a new host and port
    ///
    /// Requests already in flight keep the address they started with.
    pub fn update_address(&self, host: impl Into<String>, port: u16) {
        let mut address = self.address.write().unwrap_or_else(PoisonError::into_inner);
        address.host = host.into();
        address.port = port;
        debug!(backend = %self.backend, address = %address, "Backend address updated");
    }

    /// Issue one GET and decode the JSON body
    ///
    /// Resolves to `BackendError::Cancelled` as soon as `abort` fires, dropping
    /// the underlying request.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        abort: &CancellationToken,
    ) -> BackendResult<T> {
        if abort.is_cancelled() {
            return Err(BackendError::Cancelled);
        }

        let url = format!("{}{}", self.address().base_url(), path);
        let start = Instant::now();
        debug!(backend = %self.backend, %url, "Dispatching request");

        let request = self
            .client
            .get(&url)
            .query(params)
            .header(ACCEPT, "application/json");

        let exchange = async {
            let response = request.send().await.map_err(|e| self.network_error(e))?;
            self.parse_response(response).await
        };

        let result = tokio::select! {
            biased;
            _ = abort.cancelled() => Err(BackendError::Cancelled),
            result = exchange => result,
        };

        debug!(
            backend = %self.backend,
            ok = result.is_ok(),
            elapsed = ?start.elapsed(),
            "Request finished"
        );
        result
    }

    /// Check the status and decode the body
    async fn parse_response<T: DeserializeOwned>(&self, response: Response) -> BackendResult<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Request {
                backend: self.backend,
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let text = response.text().await.map_err(|e| self.network_error(e))?;

        serde_json::from_str(&text).map_err(|source| BackendError::MalformedResponse {
            backend: self.backend,
            source,
        })
    }

    fn network_error(&self, source: reqwest::Error) -> BackendError {
        BackendError::NetworkUnavailable {
            backend: self.backend,
            source,
        }
    }
}
