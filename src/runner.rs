//! The delegated send/receive action seam and its default implementation.
//!
//! The step layer never talks to the network directly: it freezes
//! accumulator state into action descriptions and hands them to an
//! [`ActionRunner`]. The default [`ExchangeRunner`] performs the exchange
//! with the endpoint's client, snapshots the reply, and verifies it when
//! the receive action arrives.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::{
    client::HttpEndpoint,
    error::StepError,
    exchange::{HttpMethod, ReceiveExpectation, SendRequest},
};

/// Declarative send and receive actions dispatched by the step layer.
#[async_trait]
pub trait ActionRunner: std::fmt::Debug + Send + Sync {
    /// Dispatch a frozen request through the endpoint.
    async fn send(
        &mut self,
        endpoint: &HttpEndpoint,
        request: SendRequest,
    ) -> Result<(), StepError>;

    /// Verify the latest exchange against a frozen expectation.
    async fn receive(
        &mut self,
        endpoint: &HttpEndpoint,
        expected: ReceiveExpectation,
    ) -> Result<(), StepError>;
}

/// Snapshot of the last response, held until the receive action verifies it.
#[derive(Debug, Clone)]
struct ExchangeRecord {
    status: u16,
    /// Header names are lower-cased for case-insensitive lookup.
    headers: HashMap<String, String>,
    body: String,
}

/// Default runner performing real exchanges with the endpoint's client.
#[derive(Debug, Default)]
pub struct ExchangeRunner {
    last: Option<ExchangeRecord>,
}

impl ExchangeRunner {
    /// A runner with no exchange in flight.
    #[must_use]
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl ActionRunner for ExchangeRunner {
    async fn send(
        &mut self,
        endpoint: &HttpEndpoint,
        request: SendRequest,
    ) -> Result<(), StepError> {
        let target = resolve_target(
            endpoint.base_url(),
            request.url.as_ref(),
            request.path.as_deref(),
        )?;
        debug!(client = endpoint.name(), method = %request.method, url = %target, "dispatching http request");

        let mut builder = endpoint.client().request(transport_method(request.method), target);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_ascii_lowercase(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await?;
        debug!(status, bytes = body.len(), "recorded http response");

        self.last = Some(ExchangeRecord {
            status,
            headers,
            body,
        });
        Ok(())
    }

    async fn receive(
        &mut self,
        endpoint: &HttpEndpoint,
        expected: ReceiveExpectation,
    ) -> Result<(), StepError> {
        let record = self.last.take().ok_or(StepError::NoExchange)?;
        debug!(client = endpoint.name(), status = expected.status, "verifying http response");
        verify(&expected, &record)
    }
}

/// Map a step method onto the transport's method type.
fn transport_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Head => reqwest::Method::HEAD,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Options => reqwest::Method::OPTIONS,
        HttpMethod::Trace => reqwest::Method::TRACE,
    }
}

/// Resolve the request target: explicit URL when set, endpoint base
/// otherwise, with the step path joined on top.
fn resolve_target(
    base: &Url,
    explicit: Option<&Url>,
    path: Option<&str>,
) -> Result<Url, StepError> {
    let root = explicit.unwrap_or(base).clone();
    match path {
        None => Ok(root),
        Some(path) => root.join(path).map_err(|source| StepError::InvalidUrl {
            url: path.to_string(),
            source,
        }),
    }
}

/// Check a recorded response against a frozen expectation.
fn verify(expected: &ReceiveExpectation, actual: &ExchangeRecord) -> Result<(), StepError> {
    if expected.status != actual.status {
        return Err(StepError::StatusMismatch {
            expected: expected.status,
            actual: actual.status,
        });
    }

    for (name, value) in &expected.headers {
        let received = actual.headers.get(&name.to_ascii_lowercase());
        if received.map(String::as_str) != Some(value.as_str()) {
            return Err(StepError::HeaderMismatch {
                name: name.clone(),
                expected: value.clone(),
                actual: received.cloned(),
            });
        }
    }

    if let Some(body) = &expected.body {
        verify_body(body, &actual.body)?;
    }

    if !expected.expressions.is_empty() {
        let document: Value = serde_json::from_str(&actual.body)
            .map_err(|err| StepError::NonJsonBody(err.to_string()))?;
        for (path, value) in &expected.expressions {
            verify_expression(&document, path, value)?;
        }
    }
    Ok(())
}

/// Compare bodies structurally when both parse as JSON, textually otherwise.
fn verify_body(expected: &str, actual: &str) -> Result<(), StepError> {
    let matches = match (
        serde_json::from_str::<Value>(expected),
        serde_json::from_str::<Value>(actual),
    ) {
        (Ok(left), Ok(right)) => left == right,
        _ => expected == actual,
    };
    if matches {
        Ok(())
    } else {
        Err(StepError::BodyMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

/// Check one JSONPath expression against the structured body.
fn verify_expression(document: &Value, path: &str, expected: &str) -> Result<(), StepError> {
    let selected = jsonpath_lib::select(document, path).map_err(|err| {
        StepError::InvalidExpression {
            path: path.to_string(),
            detail: format!("{err:?}"),
        }
    })?;
    let Some(actual) = selected.first() else {
        return Err(StepError::ExpressionMismatch {
            path: path.to_string(),
            expected: expected.to_string(),
            actual: None,
        });
    };

    // A non-JSON literal like `ok` is compared as a string.
    let expected_value = serde_json::from_str::<Value>(expected)
        .unwrap_or_else(|_| Value::String(expected.to_string()));
    if **actual == expected_value {
        Ok(())
    } else {
        Err(StepError::ExpressionMismatch {
            path: path.to_string(),
            expected: expected.to_string(),
            actual: Some(actual.to_string()),
        })
    }
}
