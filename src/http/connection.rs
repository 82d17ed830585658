use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use bytes::BytesMut;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::http::mime;
use crate::http::parser::{parse_request_line, split_request_line, ParseError};
use crate::http::request::Request;
use crate::http::resolver::PathResolver;
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;

/// What the client sent before the request line was complete.
#[derive(Debug)]
pub enum Incoming {
    Request(Request),
    Malformed(ParseError),
    /// Peer closed without sending a byte
    Closed,
}

/// One accepted client: reads a single request line, answers it, closes.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    resolver: Arc<PathResolver>,
    peer: SocketAddr,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, resolver: Arc<PathResolver>, peer: SocketAddr) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(1024),
            resolver,
            peer,
        }
    }

    /// Serves exactly one exchange, then shuts the stream down for writing.
    ///
    /// The shutdown runs on every exit path; the socket itself closes when the
    /// connection is dropped.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let result = self.serve().await;

        if let Err(e) = self.stream.shutdown().await {
            debug!(peer = %self.peer, error = %e, "Shutdown after response failed");
        }

        result
    }

    async fn serve(&mut self) -> anyhow::Result<()> {
        let response = match self.read_request().await? {
            Incoming::Closed => {
                debug!(peer = %self.peer, "Client closed before sending a request");
                return Ok(());
            }
            Incoming::Malformed(e) => {
                warn!(peer = %self.peer, error = ?e, "Malformed request line");
                Response::error(StatusCode::BadRequest)
            }
            Incoming::Request(request) => {
                let response = handle_request(&self.resolver, &request).await;
                info!(
                    peer = %self.peer,
                    method = request.method.as_str(),
                    path = %request.path,
                    status = response.status.as_u16(),
                    "Request handled"
                );
                response
            }
        };

        ResponseWriter::new(response)
            .write_to_stream(&mut self.stream)
            .await
            .context("failed to write response")?;

        Ok(())
    }

    /// Accumulates bytes until a full request line is buffered.
    pub async fn read_request(&mut self) -> anyhow::Result<Incoming> {
        loop {
            match split_request_line(&self.buffer) {
                Ok((line, _)) => return Ok(parsed(parse_request_line(line))),
                Err(ParseError::Incomplete) => {}
                Err(e) => return Ok(Incoming::Malformed(e)),
            }

            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(Incoming::Closed);
                }

                // Peer closed mid-line; take what arrived as the request line.
                let line = self.buffer.strip_suffix(b"\r").unwrap_or(&self.buffer[..]);
                return Ok(parsed(parse_request_line(line)));
            }
        }
    }
}

fn parsed(result: Result<Request, ParseError>) -> Incoming {
    match result {
        Ok(request) => Incoming::Request(request),
        Err(e) => Incoming::Malformed(e),
    }
}

/// Maps a parsed request to its response.
///
/// GET resolves the target under the web root: outside the root is 403,
/// anything that cannot be canonicalized, opened, or is not a regular file
/// is 404. Every other method is 405.
pub async fn handle_request(resolver: &PathResolver, request: &Request) -> Response {
    if !request.method.is_retrieval() {
        return Response::method_not_allowed();
    }

    let target = request.target_path();
    if target.is_empty() {
        return Response::error(StatusCode::BadRequest);
    }

    let resolved = match resolver.resolve(target).await {
        Ok(resolved) => resolved,
        Err(e) => {
            debug!(path = target, error = %e, "Target did not resolve");
            return Response::error(StatusCode::NotFound);
        }
    };

    if !resolved.within_root {
        warn!(
            path = target,
            resolved = %resolved.absolute_path.display(),
            "Rejected path outside web root"
        );
        return Response::error(StatusCode::Forbidden);
    }

    // Opening a FIFO blocks until a writer shows up; reject non-files first.
    match tokio::fs::metadata(&resolved.absolute_path).await {
        Ok(metadata) if metadata.is_file() => {}
        Ok(_) => return Response::error(StatusCode::NotFound),
        Err(e) => {
            debug!(path = target, error = %e, "Failed to stat target");
            return Response::error(StatusCode::NotFound);
        }
    }

    let file = match File::open(&resolved.absolute_path).await {
        Ok(file) => file,
        Err(e) => {
            debug!(path = target, error = %e, "Failed to open target");
            return Response::error(StatusCode::NotFound);
        }
    };

    let metadata = match file.metadata().await {
        Ok(metadata) if metadata.is_file() => metadata,
        Ok(_) => return Response::error(StatusCode::NotFound),
        Err(e) => {
            debug!(path = target, error = %e, "Failed to stat target");
            return Response::error(StatusCode::NotFound);
        }
    };

    let content_type = mime::lookup(&resolved.absolute_path.to_string_lossy());
    Response::file(file, metadata.len(), content_type)
}
