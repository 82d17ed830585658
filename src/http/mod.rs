//! HTTP protocol implementation.
//!
//! This module implements the single-exchange HTTP/1.1 side of the server:
//! one request line in, one response out, connection closed.
//!
//! # Architecture
//!
//! - **`connection`**: Per-connection request handler (read, dispatch, respond)
//! - **`parser`**: Splits and parses the request line from a byte buffer
//! - **`request`**: Parsed request line and method representation
//! - **`resolver`**: Maps request targets under the web root with containment checks
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes a response and streams file bodies to the client
//! - **`mime`**: MIME type detection based on file extensions
//! - **`date`**: RFC 1123 timestamps for the `Date` header
//!
//! # Request Pipeline
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Accumulate bytes until the request line ends
//!        └──────┬──────┘
//!               │ Request line parsed (or EOF with nothing sent → close)
//!               ▼
//!        ┌──────────────────┐
//!        │   Resolving      │ ← GET only; canonicalize under web root
//!        └──────┬───────────┘
//!               │ 200 / 400 / 403 / 404 / 405
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Head, then body (file streamed in chunks)
//!        └──────┬───────────┘
//!               ▼
//!             Closed
//! ```

pub mod connection;
pub mod date;
pub mod mime;
pub mod parser;
pub mod request;
pub mod resolver;
pub mod response;
pub mod writer;
