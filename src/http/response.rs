use tokio::fs::File;

use crate::http::date;

/// `Server` header value.
pub const SERVER_NAME: &str = concat!("webroot/", env!("CARGO_PKG_VERSION"));

/// Body of every 405 response. Plain text, not the HTML error template.
pub const METHOD_NOT_ALLOWED_BODY: &str = "Method Not Supported\n";

/// HTTP status codes produced by the server.
///
/// - `Ok` (200): File served
/// - `BadRequest` (400): Request line too long or unreadable
/// - `Forbidden` (403): Target resolves outside the web root
/// - `NotFound` (404): Target missing, unreadable or not a regular file
/// - `MethodNotAllowed` (405): Method other than GET
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use webroot::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::Forbidden.as_u16(), 403);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
        }
    }
}

/// Response payload: an in-memory buffer or an open file streamed in chunks.
#[derive(Debug)]
pub enum Body {
    Bytes(Vec<u8>),
    File { file: File, len: u64 },
}

impl Body {
    /// Exact number of bytes the body will put on the wire.
    pub fn len(&self) -> u64 {
        match self {
            Body::Bytes(bytes) => bytes.len() as u64,
            Body::File { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An outbound HTTP response.
///
/// Headers keep insertion order and keys are unique.
#[derive(Debug)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// HTTP headers in wire order
    pub headers: Vec<(String, String)>,
    /// Response body
    pub body: Body,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// `build` appends Content-Length, Date, Server and `Connection: close`
/// after any headers set by the caller, so a typical response goes out as
/// Content-Type, Content-Length, Date, Server, Connection.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "application/json")
///     .body(b"{}".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Body,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Body::Bytes(Vec::new()),
        }
    }

    /// Adds a header, replacing the value of an existing header with the same name.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        set_header(&mut self.headers, key.into(), value.into());
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Body::Bytes(body);
        self
    }

    /// Streams `len` bytes of `file` as the body.
    pub fn file(mut self, file: File, len: u64) -> Self {
        self.body = Body::File { file, len };
        self
    }

    pub fn build(mut self) -> Response {
        let content_length = self.body.len().to_string();
        set_header(&mut self.headers, "Content-Length".to_string(), content_length);
        set_header(&mut self.headers, "Date".to_string(), date::now());
        set_header(&mut self.headers, "Server".to_string(), SERVER_NAME.to_string());
        set_header(&mut self.headers, "Connection".to_string(), "close".to_string());

        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

fn set_header(headers: &mut Vec<(String, String)>, key: String, value: String) {
    match headers
        .iter_mut()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(&key))
    {
        Some((_, slot)) => *slot = value,
        None => headers.push((key, value)),
    }
}

impl Response {
    /// 200 OK streaming an opened file.
    pub fn file(file: File, len: u64, content_type: &str) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", content_type)
            .file(file, len)
            .build()
    }

    /// Error response with the shared HTML body
    /// `<html><body><h1>{code} {reason}</h1></body></html>`.
    pub fn error(status: StatusCode) -> Self {
        let body = format!(
            "<html><body><h1>{} {}</h1></body></html>",
            status.as_u16(),
            status.reason_phrase()
        );

        ResponseBuilder::new(status)
            .header("Content-Type", "text/html")
            .body(body.into_bytes())
            .build()
    }

    /// 405 Method Not Allowed with the fixed plain-text body.
    pub fn method_not_allowed() -> Self {
        ResponseBuilder::new(StatusCode::MethodNotAllowed)
            .header("Content-Type", "text/plain")
            .body(METHOD_NOT_ALLOWED_BODY.as_bytes().to_vec())
            .build()
    }

    /// Looks up a header value by name, ignoring ASCII case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }
}
