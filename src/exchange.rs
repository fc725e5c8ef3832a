//! Pending request and response accumulators for HTTP exchange steps.
//!
//! Scenario steps populate an [`HttpExchange`] incrementally. The send and
//! receive steps freeze the accumulated state into a [`SendRequest`] or
//! [`ReceiveExpectation`] and clear it in the same operation, so nothing
//! leaks into the next exchange or the next scenario.

use std::{collections::HashMap, fmt, mem, str::FromStr};

use url::Url;

use crate::{
    error::StepError,
    raw::{RawRequest, RawResponse},
};

/// HTTP request methods understood by the send steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `HEAD`
    Head,
    /// `POST` — the default when a send step names no method.
    #[default]
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
    /// `OPTIONS`
    Options,
    /// `TRACE`
    Trace,
}

impl HttpMethod {
    /// Canonical upper-case token for the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for HttpMethod {
    type Err = StepError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "GET" => Ok(Self::Get),
            "HEAD" => Ok(Self::Head),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "OPTIONS" => Ok(Self::Options),
            "TRACE" => Ok(Self::Trace),
            other => Err(StepError::UnknownMethod(other.to_string())),
        }
    }
}

/// A frozen, ready-to-dispatch request description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    /// Request method; an omitted method resolves to `POST` at freeze time.
    pub method: HttpMethod,
    /// Optional path resolved against the target.
    pub path: Option<String>,
    /// Explicit absolute target, overriding the endpoint base when set.
    pub url: Option<Url>,
    /// Header map, the last-writer-wins merge of all header steps.
    pub headers: HashMap<String, String>,
    /// Request payload, if a body step ran.
    pub body: Option<String>,
}

/// A frozen response expectation handed to the receive action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveExpectation {
    /// Expected status code.
    pub status: u16,
    /// Expected header values, looked up by name case-insensitively.
    pub headers: HashMap<String, String>,
    /// Expected body, if a body step ran.
    pub body: Option<String>,
    /// JSONPath expression → expected literal, for structured bodies.
    pub expressions: HashMap<String, String>,
}

/// Per-scenario accumulator for one HTTP exchange at a time.
///
/// The explicit target URL is scenario-scoped like the client reference and
/// survives dispatch; everything else is cleared by the freezing operation
/// that consumes it.
#[derive(Debug, Default)]
pub struct HttpExchange {
    request_url: Option<Url>,
    request_headers: HashMap<String, String>,
    request_body: Option<String>,
    response_headers: HashMap<String, String>,
    response_body: Option<String>,
    expressions: HashMap<String, String>,
}

impl HttpExchange {
    /// Parse and store the absolute target URL for subsequent sends.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::InvalidUrl`] when the text is not an absolute
    /// URL.
    pub fn set_url(&mut self, raw_url: &str) -> Result<&Url, StepError> {
        let url = Url::parse(raw_url).map_err(|source| StepError::InvalidUrl {
            url: raw_url.to_string(),
            source,
        })?;
        Ok(self.request_url.insert(url))
    }

    /// Merge one header into the pending request; later writes win.
    pub fn add_request_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.request_headers.insert(name.into(), value.into());
    }

    /// Store the pending request body, replacing any earlier one.
    pub fn set_request_body(&mut self, body: impl Into<String>) {
        self.request_body = Some(body.into());
    }

    /// Merge one expected header into the pending expectation.
    pub fn add_response_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.response_headers.insert(name.into(), value.into());
    }

    /// Store the expected response body, replacing any earlier one.
    pub fn set_response_body(&mut self, body: impl Into<String>) {
        self.response_body = Some(body.into());
    }

    /// Add a JSONPath validation expression for the structured body.
    pub fn add_expression(&mut self, path: impl Into<String>, expected: impl Into<String>) {
        self.expressions.insert(path.into(), expected.into());
    }

    /// Freeze the pending request and clear the request accumulators.
    ///
    /// An absent method resolves to `POST`.
    pub fn freeze_request(
        &mut self,
        method: Option<HttpMethod>,
        path: Option<String>,
    ) -> SendRequest {
        SendRequest {
            method: method.unwrap_or_default(),
            path,
            url: self.request_url.clone(),
            headers: mem::take(&mut self.request_headers),
            body: self.request_body.take(),
        }
    }

    /// Freeze a literal request, discarding any step-accumulated state.
    ///
    /// Literal text describes the whole request, so accumulators are reset
    /// rather than merged; the scenario-scoped target URL still applies.
    pub fn freeze_raw_request(&mut self, raw: RawRequest) -> SendRequest {
        self.request_headers.clear();
        self.request_body = None;
        SendRequest {
            method: raw.method,
            path: Some(raw.target),
            url: self.request_url.clone(),
            headers: raw.headers,
            body: raw.body,
        }
    }

    /// Freeze the pending expectation and clear the response accumulators.
    pub fn freeze_expectation(&mut self, status: u16) -> ReceiveExpectation {
        ReceiveExpectation {
            status,
            headers: mem::take(&mut self.response_headers),
            body: self.response_body.take(),
            expressions: mem::take(&mut self.expressions),
        }
    }

    /// Freeze a literal response expectation, discarding accumulated state.
    pub fn freeze_raw_expectation(&mut self, raw: RawResponse) -> ReceiveExpectation {
        self.response_headers.clear();
        self.response_body = None;
        ReceiveExpectation {
            status: raw.status,
            headers: raw.headers,
            body: raw.body,
            expressions: mem::take(&mut self.expressions),
        }
    }
}
