use anyhow::Context;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::http::response::{Body, Response};

const HTTP_VERSION: &str = "HTTP/1.1";

/// Read size used when streaming file bodies.
pub const CHUNK_SIZE: usize = 4096;

fn serialize_head(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    for (k, v) in &resp.headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

/// Writes one response: the serialized head, then the body.
///
/// In-memory bodies go out with the head in a single buffer. File bodies are
/// streamed in `CHUNK_SIZE` reads, limited to the length announced in
/// Content-Length. A failed write is not retried; the caller drops the
/// connection.
pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
    file: Option<(File, u64)>,
}

impl ResponseWriter {
    pub fn new(response: Response) -> Self {
        let mut buffer = serialize_head(&response);

        let file = match response.body {
            Body::Bytes(bytes) => {
                buffer.extend_from_slice(&bytes);
                None
            }
            Body::File { file, len } => Some((file, len)),
        };

        Self {
            buffer,
            written: 0,
            file,
        }
    }

    /// Sends the response. Returns the number of body bytes streamed from disk.
    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        let mut streamed = 0;
        if let Some((file, len)) = self.file.take() {
            let mut reader = BufReader::with_capacity(CHUNK_SIZE, file.take(len));
            streamed = tokio::io::copy_buf(&mut reader, stream)
                .await
                .context("failed to stream file body")?;

            if streamed < len {
                anyhow::bail!("file shrank while streaming: sent {} of {} bytes", streamed, len);
            }
        }

        stream.flush().await?;
        Ok(streamed)
    }
}
