//! Canonical error and result types for the step layer.
//!
//! Every failure a step can raise is a [`StepError`]. Messages name the
//! offending resource (client id, URL, header, file path) so scenario
//! reports point straight at the cause.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised by the step definitions and the default exchange runner.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StepError {
    /// No client with the given id is registered.
    #[error("no http client registered for id: {0}")]
    UnknownClient(String),
    /// The target URL could not be parsed as an absolute URL.
    #[error("invalid request URL {url}: {source}")]
    InvalidUrl {
        /// The text that failed to parse.
        url: String,
        /// Parser diagnostics.
        #[source]
        source: url::ParseError,
    },
    /// Building the transport client failed.
    #[error("failed to construct http client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// The delegated HTTP exchange failed at the transport level.
    #[error("http request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// A receive action was dispatched with no request in flight.
    #[error("no http exchange in flight: send a request before receiving")]
    NoExchange,
    /// Literal HTTP request text could not be parsed.
    #[error("malformed http request data: {0}")]
    MalformedRequest(String),
    /// Literal HTTP response text could not be parsed.
    #[error("malformed http response data: {0}")]
    MalformedResponse(String),
    /// Unknown HTTP method token.
    #[error("unsupported http method: {0}")]
    UnknownMethod(String),
    /// A data table was missing or malformed.
    #[error("malformed data table: {0}")]
    Table(String),
    /// A doc-string payload was required but absent.
    #[error("step requires a doc string payload")]
    MissingDocString,
    /// The response status did not match the expectation.
    #[error("expected HTTP status {expected}, received {actual}")]
    StatusMismatch {
        /// Status the scenario expected.
        expected: u16,
        /// Status the server returned.
        actual: u16,
    },
    /// A response header was absent or carried the wrong value.
    #[error(
        "expected response header {name}=\"{expected}\", received {}",
        .actual.as_deref().unwrap_or("<missing>")
    )]
    HeaderMismatch {
        /// Header name, looked up case-insensitively.
        name: String,
        /// Expected header value.
        expected: String,
        /// Value actually received, if the header was present.
        actual: Option<String>,
    },
    /// The response body did not match the expectation.
    #[error("response body mismatch: expected {expected}, received {actual}")]
    BodyMismatch {
        /// Expected body text.
        expected: String,
        /// Body actually received.
        actual: String,
    },
    /// A body validation expression selected nothing or a different value.
    #[error(
        "expression {path} expected {expected}, selected {}",
        .actual.as_deref().unwrap_or("<nothing>")
    )]
    ExpressionMismatch {
        /// The JSONPath expression.
        path: String,
        /// Expected literal.
        expected: String,
        /// Value the expression selected, if any.
        actual: Option<String>,
    },
    /// A body validation expression was not valid JSONPath.
    #[error("invalid validation expression {path}: {detail}")]
    InvalidExpression {
        /// The offending expression.
        path: String,
        /// Parser diagnostics.
        detail: String,
    },
    /// Validation expressions were supplied but the response body is not JSON.
    #[error("response body is not json: {0}")]
    NonJsonBody(String),
    /// The declared file does not exist.
    #[error("file {} does not exist", .0.display())]
    FileNotFound(PathBuf),
    /// The declared file cannot be opened for reading.
    #[error("file {} cannot be read: {source}", .path.display())]
    FileUnreadable {
        /// The declared path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The declared file cannot be opened for writing.
    #[error("file {} cannot be written: {source}", .path.display())]
    FileUnwritable {
        /// The declared path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Result alias used by world methods, steps, and the runner seam.
pub type StepResult<T = ()> = Result<T, StepError>;
