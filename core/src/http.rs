//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The core builds an `HttpRequest`
//! for the jobs endpoint and ingests the `HttpResponse` the host hands
//! back; it never opens a socket. The host runs the round-trip on whatever
//! worker context its platform provides and posts the outcome back to the
//! thread that owns the screen.
//!
//! All fields use owned types (`String`, `Vec`) so values can cross the C
//! boundary in `jobs-ffi` without lifetime concerns.

/// HTTP method for a request. The jobs screen only ever reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `JobsClient::build_list_jobs`. The host executes it and returns
/// the corresponding `HttpResponse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Shorthand for a response with no headers, which is all the
    /// ingestion path looks at.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
