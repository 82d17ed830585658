use crate::http::request::{Method, Request};

/// Longest request line accepted, terminator included.
pub const MAX_REQUEST_LINE: usize = 4096;

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// No request line terminator yet; read more
    Incomplete,
    /// Request line exceeded `MAX_REQUEST_LINE` without a terminator
    TooLong,
    /// Request line is not valid UTF-8
    InvalidEncoding,
    /// Request line holds no method token
    EmptyLine,
}

/// Finds the end of the request line in `buf`.
///
/// Returns the line (without `\r\n` or `\n`) and the number of bytes consumed.
pub fn split_request_line(buf: &[u8]) -> Result<(&[u8], usize), ParseError> {
    match buf.iter().position(|&b| b == b'\n') {
        Some(pos) if pos + 1 > MAX_REQUEST_LINE => Err(ParseError::TooLong),
        Some(pos) => {
            let line = &buf[..pos];
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            Ok((line, pos + 1))
        }
        None if buf.len() >= MAX_REQUEST_LINE => Err(ParseError::TooLong),
        None => Err(ParseError::Incomplete),
    }
}

/// Parses `METHOD TARGET [PROTOCOL]`.
///
/// Tokens are separated by any run of ASCII whitespace. Missing target and
/// protocol tokens come back as empty strings; the caller decides what a
/// missing target means for the method at hand.
pub fn parse_request_line(line: &[u8]) -> Result<Request, ParseError> {
    let line = std::str::from_utf8(line).map_err(|_| ParseError::InvalidEncoding)?;

    let mut parts = line.split_ascii_whitespace();

    let method = parts.next().ok_or(ParseError::EmptyLine)?;
    let path = parts.next().unwrap_or_default();
    let version = parts.next().unwrap_or_default();

    Ok(Request {
        method: Method::parse(method),
        path: path.to_string(),
        version: version.to_string(),
    })
}
