use crate::error::ProtocolError;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    /// Any other well-formed method token (`TRACE`, extension methods)
    Other,
}

impl HttpMethod {
    /// Parse a method token
    ///
    /// Unknown tokens become [`HttpMethod::Other`]; `None` means the string
    /// is not a method token at all.
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() || !s.bytes().all(is_token_char) {
            return None;
        }
        Some(match s {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            "PATCH" => HttpMethod::Patch,
            "OPTIONS" => HttpMethod::Options,
            "HEAD" => HttpMethod::Head,
            _ => HttpMethod::Other,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Other => "OTHER",
        }
    }
}

/// Complete request borrowed from the read buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRequest<'a> {
    pub method: HttpMethod,
    /// Path without the query string
    pub path: &'a str,
    pub query: Option<&'a str>,
    /// Exactly `Content-Length` bytes
    pub body: &'a [u8],
}

impl<'a> RawRequest<'a> {
    /// Build a request from a target that may carry a `?query`
    pub fn new(method: HttpMethod, target: &'a str, body: &'a [u8]) -> Self {
        let (path, query) = split_target(target);
        Self {
            method,
            path,
            query,
            body,
        }
    }

    /// Parse a buffered request
    ///
    /// Returns `Ok(None)` until the head and the whole declared body are
    /// buffered. Bytes past the body are ignored.
    pub fn parse(buf: &'a [u8]) -> Result<Option<Self>, ProtocolError> {
        let Some(head) = RequestHead::parse(buf)? else {
            return Ok(None);
        };
        if buf.len() < head.total_len() {
            return Ok(None);
        }
        Ok(Some(head.request(buf)))
    }
}

/// Parsed request head, stored as offsets into the read buffer
#[derive(Debug, Clone, Copy)]
pub(crate) struct RequestHead {
    method: HttpMethod,
    target_start: usize,
    target_end: usize,
    body_start: usize,
    content_length: usize,
}

impl RequestHead {
    /// Parse the request line and headers
    ///
    /// Returns `Ok(None)` while the blank line ending the head is missing.
    pub(crate) fn parse(buf: &[u8]) -> Result<Option<Self>, ProtocolError> {
        let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            return Ok(None);
        };
        let head = core::str::from_utf8(&buf[..head_end]).map_err(|_| ProtocolError::NotUtf8)?;
        let (line, headers) = head.split_once("\r\n").unwrap_or((head, ""));
        let (method, target_start, target_end) = parse_request_line(line)?;
        let content_length = find_content_length(headers)?;

        Ok(Some(Self {
            method,
            target_start,
            target_end,
            body_start: head_end + 4,
            content_length,
        }))
    }

    /// Length of head plus declared body
    pub(crate) const fn total_len(&self) -> usize {
        self.body_start.saturating_add(self.content_length)
    }

    /// Borrow the request out of `buf`
    ///
    /// `buf` must be the buffer the head was parsed from and hold at least
    /// [`total_len`](Self::total_len) bytes.
    pub(crate) fn request<'a>(&self, buf: &'a [u8]) -> RawRequest<'a> {
        let target = core::str::from_utf8(&buf[self.target_start..self.target_end]).unwrap_or("/");
        RawRequest::new(self.method, target, &buf[self.body_start..self.total_len()])
    }
}

fn split_target(target: &str) -> (&str, Option<&str>) {
    match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    }
}

/// Parse `METHOD /target HTTP/1.x`
///
/// Returns the method and the byte range of the target within the line.
fn parse_request_line(line: &str) -> Result<(HttpMethod, usize, usize), ProtocolError> {
    let mut parts = line.splitn(3, ' ');
    let method = parts.next().ok_or(ProtocolError::BadRequestLine)?;
    let target = parts.next().ok_or(ProtocolError::BadRequestLine)?;
    let version = parts.next().ok_or(ProtocolError::BadRequestLine)?;

    if !target.starts_with('/') || !version.starts_with("HTTP/1.") {
        return Err(ProtocolError::BadRequestLine);
    }
    let method = HttpMethod::parse(method).ok_or(ProtocolError::BadMethod)?;

    let target_start = line.len() - target.len() - version.len() - 1;
    Ok((method, target_start, target_start + target.len()))
}

/// `tchar` of RFC 9110
fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

/// Find the content length in the header lines
///
/// A missing header means an empty body.
fn find_content_length(headers: &str) -> Result<usize, ProtocolError> {
    for line in headers.split("\r\n") {
        if line.is_empty() {
            continue;
        }
        let (name, value) = line.split_once(':').ok_or(ProtocolError::BadHeader)?;
        if name.trim().eq_ignore_ascii_case("content-length") {
            return value
                .trim()
                .parse::<usize>()
                .map_err(|_| ProtocolError::BadContentLength);
        }
    }
    Ok(0)
}
