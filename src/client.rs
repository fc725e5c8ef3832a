//! Named HTTP client endpoints and their startup registry.
//!
//! Scenarios select endpoints by id from a [`ClientRegistry`] populated at
//! startup; the registry replaces any dynamic lookup with an explicit
//! id → [`ClientConfig`] mapping. A secure target URL swaps an endpoint's
//! transport for one that accepts any certificate, for exercising
//! test-double servers with self-signed certificates. Never point a
//! trust-all endpoint at a production host.

use std::{collections::HashMap, time::Duration};

use serde::Deserialize;
use url::Url;

use crate::error::StepError;

/// Base URL used when a scenario never selects a client.
const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Configuration for one named HTTP client endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL requests are resolved against.
    pub base_url: Url,
    /// Accept any TLS certificate presented by the server.
    #[serde(default)]
    pub trust_all: bool,
    /// Optional request timeout in milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl ClientConfig {
    /// Configuration pointing at a base URL with default transport options.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::InvalidUrl`] when the text is not an absolute
    /// URL.
    pub fn for_base_url(base_url: &str) -> Result<Self, StepError> {
        let base_url = Url::parse(base_url).map_err(|source| StepError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self {
            base_url,
            trust_all: false,
            timeout_ms: None,
        })
    }
}

/// Explicit id → configuration mapping, injected at startup.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: HashMap<String, ClientConfig>,
}

impl ClientRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Register a named client configuration; later writes win.
    pub fn insert(&mut self, id: impl Into<String>, config: ClientConfig) {
        self.clients.insert(id.into(), config);
    }

    /// Resolve a named endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::UnknownClient`] naming the id when no client
    /// was registered under it, or [`StepError::ClientBuild`] when the
    /// transport cannot be constructed.
    pub fn resolve(&self, id: &str) -> Result<HttpEndpoint, StepError> {
        let config = self
            .clients
            .get(id)
            .ok_or_else(|| StepError::UnknownClient(id.to_string()))?;
        HttpEndpoint::from_config(id, config.clone())
    }
}

/// A resolved HTTP client endpoint: name, base URL, and transport.
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    name: String,
    base_url: Url,
    trust_all: bool,
    timeout: Option<Duration>,
    client: reqwest::Client,
}

impl HttpEndpoint {
    /// Build an endpoint from a named configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::ClientBuild`] when the transport cannot be
    /// constructed.
    pub fn from_config(name: &str, config: ClientConfig) -> Result<Self, StepError> {
        let timeout = config.timeout_ms.map(Duration::from_millis);
        let client = build_client(config.trust_all, timeout)?;
        Ok(Self {
            name: name.to_string(),
            base_url: config.base_url,
            trust_all: config.trust_all,
            timeout,
            client,
        })
    }

    /// The endpoint used when no client has been selected.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::ClientBuild`] when the default transport cannot
    /// be constructed.
    pub fn default_local() -> Result<Self, StepError> {
        Self::from_config("default", ClientConfig::for_base_url(DEFAULT_BASE_URL)?)
    }

    /// Swap the transport for one that accepts any certificate.
    ///
    /// Idempotent; an endpoint already trusting all certificates is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::ClientBuild`] when the replacement transport
    /// cannot be constructed.
    pub fn enable_trust_all(&mut self) -> Result<(), StepError> {
        if self.trust_all {
            return Ok(());
        }
        self.client = build_client(true, self.timeout)?;
        self.trust_all = true;
        Ok(())
    }

    /// The id this endpoint was registered under.
    #[must_use]
    pub fn name(&self) -> &str { &self.name }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url { &self.base_url }

    /// Whether certificate validation has been disabled.
    #[must_use]
    pub const fn trusts_all(&self) -> bool { self.trust_all }

    /// The underlying transport client.
    #[must_use]
    pub fn client(&self) -> &reqwest::Client { &self.client }
}

/// Construct the transport client for an endpoint.
fn build_client(
    trust_all: bool,
    timeout: Option<Duration>,
) -> Result<reqwest::Client, StepError> {
    let mut builder = reqwest::Client::builder();
    if trust_all {
        builder = builder.danger_accept_invalid_certs(true);
    }
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(StepError::ClientBuild)
}
