/// HTTP request methods.
///
/// Only `GET` is served. Every other method, including tokens the server does
/// not recognise, is answered with 405 Method Not Allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// PATCH - Partial modification of a resource
    PATCH,
    /// Any other token found in the method position
    Extension(String),
}

impl Method {
    /// Parses an HTTP method token. Matching is case-sensitive.
    ///
    /// # Example
    ///
    /// ```
    /// # use webroot::http::request::Method;
    /// assert_eq!(Method::parse("GET"), Method::GET);
    /// assert_eq!(Method::parse("get"), Method::Extension("get".to_string()));
    /// ```
    pub fn parse(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "HEAD" => Method::HEAD,
            "OPTIONS" => Method::OPTIONS,
            "PATCH" => Method::PATCH,
            other => Method::Extension(other.to_string()),
        }
    }

    /// Whether this method retrieves a resource and is served from disk.
    pub fn is_retrieval(&self) -> bool {
        matches!(self, Method::GET)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
            Method::Extension(token) => token,
        }
    }
}

/// A parsed HTTP request line.
///
/// Only the request line is interpreted; headers and bodies are never read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The raw request target (e.g. "/index.html?v=2"); empty when absent
    pub path: String,
    /// Protocol token (typically "HTTP/1.1"); accepted as-is, may be empty
    pub version: String,
}

impl Request {
    /// The request target with any query string and fragment removed.
    ///
    /// ```
    /// # use webroot::http::request::{Method, Request};
    /// let req = Request {
    ///     method: Method::GET,
    ///     path: "/app.js?v=3#top".to_string(),
    ///     version: "HTTP/1.1".to_string(),
    /// };
    /// assert_eq!(req.target_path(), "/app.js");
    /// ```
    pub fn target_path(&self) -> &str {
        let end = self
            .path
            .find(['?', '#'])
            .unwrap_or(self.path.len());
        &self.path[..end]
    }
}
