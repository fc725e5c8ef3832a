//! Literal HTTP message parsing for the raw send and receive steps.
//!
//! A doc-string step may carry a whole request or response as text: a
//! request line or status line, header lines, a blank separator, and an
//! optional body. Both `\r\n` and `\n` line endings are accepted; the
//! HTTP-version token is optional.

use std::collections::HashMap;

use crate::{error::StepError, exchange::HttpMethod};

/// A request parsed from literal HTTP text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRequest {
    /// Method from the request line.
    pub method: HttpMethod,
    /// Request target from the request line.
    pub target: String,
    /// Header lines, name → value.
    pub headers: HashMap<String, String>,
    /// Body text following the blank separator line, if any.
    pub body: Option<String>,
}

/// A response parsed from literal HTTP text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// Status code from the status line.
    pub status: u16,
    /// Header lines, name → value.
    pub headers: HashMap<String, String>,
    /// Body text following the blank separator line, if any.
    pub body: Option<String>,
}

/// Parse a literal HTTP request: `METHOD target [HTTP/version]`, headers,
/// blank line, body.
///
/// # Errors
///
/// Returns [`StepError::MalformedRequest`] when the request line or a
/// header line cannot be parsed, and [`StepError::UnknownMethod`] for an
/// unrecognised method token.
pub fn parse_request(text: &str) -> Result<RawRequest, StepError> {
    let mut lines = text.lines().skip_while(|line| line.trim().is_empty());
    let request_line = lines
        .next()
        .ok_or_else(|| StepError::MalformedRequest("missing request line".to_string()))?;

    let mut parts = request_line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| StepError::MalformedRequest("missing request line".to_string()))?
        .parse::<HttpMethod>()?;
    let target = parts
        .next()
        .ok_or_else(|| {
            StepError::MalformedRequest(format!("request line has no target: {request_line}"))
        })?
        .to_string();

    let (headers, body) = parse_trailer(lines, StepError::MalformedRequest)?;
    Ok(RawRequest {
        method,
        target,
        headers,
        body,
    })
}

/// Parse a literal HTTP response: `[HTTP/version] status [reason]`,
/// headers, blank line, body.
///
/// # Errors
///
/// Returns [`StepError::MalformedResponse`] when the status line or a
/// header line cannot be parsed.
pub fn parse_response(text: &str) -> Result<RawResponse, StepError> {
    let mut lines = text.lines().skip_while(|line| line.trim().is_empty());
    let status_line = lines
        .next()
        .ok_or_else(|| StepError::MalformedResponse("missing status line".to_string()))?;

    let mut parts = status_line.split_whitespace().peekable();
    if parts
        .peek()
        .is_some_and(|token| token.starts_with("HTTP/"))
    {
        parts.next();
    }
    let status = parts
        .next()
        .and_then(|token| token.parse::<u16>().ok())
        .ok_or_else(|| {
            StepError::MalformedResponse(format!("status line has no status code: {status_line}"))
        })?;

    let (headers, body) = parse_trailer(lines, StepError::MalformedResponse)?;
    Ok(RawResponse {
        status,
        headers,
        body,
    })
}

/// Split the lines after the first into header pairs and an optional body.
fn parse_trailer<'a>(
    lines: impl Iterator<Item = &'a str>,
    malformed: fn(String) -> StepError,
) -> Result<(HashMap<String, String>, Option<String>), StepError> {
    let mut headers = HashMap::new();
    let mut body_lines: Vec<&str> = Vec::new();
    let mut in_body = false;

    for line in lines {
        if in_body {
            body_lines.push(line);
        } else if line.trim().is_empty() {
            in_body = true;
        } else {
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| malformed(format!("header line without colon: {line}")))?;
            headers.insert(name.trim().to_string(), value.trim().to_string());
        }
    }

    while body_lines.last().is_some_and(|line| line.trim().is_empty()) {
        body_lines.pop();
    }
    let body = if body_lines.is_empty() {
        None
    } else {
        Some(body_lines.join("\n"))
    };
    Ok((headers, body))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn parses_request_line_headers_and_body() {
        let parsed = parse_request(
            "POST /orders HTTP/1.1\r\nContent-Type: application/json\r\nAccept: */*\r\n\r\n{\"item\":\"book\"}",
        )
        .expect("well-formed request");

        assert_eq!(parsed.method, HttpMethod::Post);
        assert_eq!(parsed.target, "/orders");
        assert_eq!(
            parsed.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(parsed.body.as_deref(), Some("{\"item\":\"book\"}"));
    }

    #[test]
    fn request_version_token_is_optional() {
        let parsed = parse_request("GET /info").expect("version is optional");
        assert_eq!(parsed.method, HttpMethod::Get);
        assert_eq!(parsed.target, "/info");
        assert!(parsed.headers.is_empty());
        assert!(parsed.body.is_none());
    }

    #[test]
    fn body_may_span_multiple_lines() {
        let parsed = parse_request("POST /notes\n\nline one\nline two\n").expect("multiline body");
        assert_eq!(parsed.body.as_deref(), Some("line one\nline two"));
    }

    #[rstest]
    #[case("")]
    #[case("POST")]
    #[case("BREW /coffee HTTP/1.1")]
    #[case("GET /x\nnot-a-header\n")]
    fn malformed_requests_are_rejected(#[case] text: &str) {
        assert!(parse_request(text).is_err());
    }

    #[test]
    fn parses_status_line_with_reason_and_body() {
        let parsed = parse_response(
            "HTTP/1.1 404 Not Found\nContent-Type: text/plain\n\nmissing",
        )
        .expect("well-formed response");

        assert_eq!(parsed.status, 404);
        assert_eq!(
            parsed.headers.get("Content-Type").map(String::as_str),
            Some("text/plain")
        );
        assert_eq!(parsed.body.as_deref(), Some("missing"));
    }

    #[test]
    fn bare_status_code_is_accepted() {
        let parsed = parse_response("204").expect("bare status");
        assert_eq!(parsed.status, 204);
        assert!(parsed.body.is_none());
    }

    #[rstest]
    #[case("")]
    #[case("HTTP/1.1")]
    #[case("HTTP/1.1 OK")]
    fn malformed_responses_are_rejected(#[case] text: &str) {
        assert!(parse_response(text).is_err());
    }
}
