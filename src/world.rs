//! Scenario-scoped worlds binding accumulators, endpoints, and the runner.
//!
//! The cucumber runtime constructs a fresh world per scenario, so every
//! accumulator starts empty and no state is shared between scenarios —
//! even when the host runner executes scenarios concurrently.

use cucumber::World;

use crate::{
    client::{ClientConfig, ClientRegistry, HttpEndpoint},
    error::StepError,
    exchange::{HttpExchange, HttpMethod},
    file::FileProbe,
    raw,
    runner::{ActionRunner, ExchangeRunner},
};

/// World for HTTP exchange scenarios.
#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct HttpWorld {
    registry: ClientRegistry,
    endpoint: HttpEndpoint,
    exchange: HttpExchange,
    runner: Box<dyn ActionRunner>,
}

impl HttpWorld {
    /// Construct a world with an empty registry, the default local
    /// endpoint, and the real exchange runner.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::ClientBuild`] when the default transport cannot
    /// be constructed.
    pub fn new() -> Result<Self, StepError> {
        Ok(Self {
            registry: ClientRegistry::new(),
            endpoint: HttpEndpoint::default_local()?,
            exchange: HttpExchange::default(),
            runner: Box::new(ExchangeRunner::new()),
        })
    }

    /// Replace the dispatch seam, e.g. with a recording runner in tests.
    pub fn set_runner(&mut self, runner: Box<dyn ActionRunner>) { self.runner = runner; }

    /// Register a named client for `http-client "<id>"` steps.
    pub fn register_client(&mut self, id: impl Into<String>, config: ClientConfig) {
        self.registry.insert(id, config);
    }

    /// Select a registered client as this scenario's endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::UnknownClient`] naming the id when it was never
    /// registered.
    pub fn select_client(&mut self, id: &str) -> Result<(), StepError> {
        self.endpoint = self.registry.resolve(id)?;
        Ok(())
    }

    /// Store the absolute target URL for subsequent sends.
    ///
    /// A secure scheme switches the endpoint to a trust-all TLS transport
    /// before the next dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::InvalidUrl`] for unparseable text and
    /// [`StepError::ClientBuild`] when the trust-all transport cannot be
    /// constructed.
    pub fn set_url(&mut self, raw_url: &str) -> Result<(), StepError> {
        let secure = self.exchange.set_url(raw_url)?.scheme() == "https";
        if secure {
            self.endpoint.enable_trust_all()?;
        }
        Ok(())
    }

    /// The accumulators, for the header, body, and expression steps.
    pub fn exchange_mut(&mut self) -> &mut HttpExchange { &mut self.exchange }

    /// The endpoint the next dispatch will use.
    #[must_use]
    pub fn endpoint(&self) -> &HttpEndpoint { &self.endpoint }

    /// Freeze the pending request and dispatch it.
    ///
    /// # Errors
    ///
    /// Propagates dispatch failures from the runner.
    pub async fn send(
        &mut self,
        method: Option<HttpMethod>,
        path: Option<String>,
    ) -> Result<(), StepError> {
        let request = self.exchange.freeze_request(method, path);
        self.runner.send(&self.endpoint, request).await
    }

    /// Parse literal request text and dispatch it.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::MalformedRequest`] for unparseable text and
    /// propagates dispatch failures from the runner.
    pub async fn send_raw(&mut self, text: &str) -> Result<(), StepError> {
        let request = self.exchange.freeze_raw_request(raw::parse_request(text)?);
        self.runner.send(&self.endpoint, request).await
    }

    /// Freeze the pending expectation and dispatch the verification.
    ///
    /// # Errors
    ///
    /// Propagates verification failures from the runner.
    pub async fn receive(&mut self, status: u16) -> Result<(), StepError> {
        let expected = self.exchange.freeze_expectation(status);
        self.runner.receive(&self.endpoint, expected).await
    }

    /// Parse literal response text and dispatch the verification.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::MalformedResponse`] for unparseable text and
    /// propagates verification failures from the runner.
    pub async fn receive_raw(&mut self, text: &str) -> Result<(), StepError> {
        let expected = self
            .exchange
            .freeze_raw_expectation(raw::parse_response(text)?);
        self.runner.receive(&self.endpoint, expected).await
    }
}

/// World for filesystem assertion scenarios.
#[derive(Debug, Default, World)]
pub struct FileWorld {
    probe: FileProbe,
}

impl FileWorld {
    /// The probe, for the declaration step.
    pub fn probe_mut(&mut self) -> &mut FileProbe { &mut self.probe }

    /// The probe, for the verify steps.
    #[must_use]
    pub fn probe(&self) -> &FileProbe { &self.probe }
}
