use core::fmt::Write;

use heapless::Vec;
use serde::Serialize;

use crate::error::{DispatchError, InternalError};

pub type StatusCode = u16;

/// Capacity of a response body
///
/// Sized for a `GET /pixels` readback of about 200 hex pixels.
pub const MAX_RESPONSE_SIZE: usize = 2048;

fn reason_phrase(code: StatusCode) -> &'static str {
    match code {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        413 => "Request Entity Too Large",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// HTTP Content Type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Json,
    TextPlain,
}

impl ContentType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
            ContentType::TextPlain => "text/plain",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

/// Response produced by the dispatcher, written out once and dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEnvelope {
    status: StatusCode,
    content_type: ContentType,
    body: Vec<u8, MAX_RESPONSE_SIZE>,
}

impl ResponseEnvelope {
    /// Response without a body
    pub const fn empty(status: StatusCode) -> Self {
        Self {
            status,
            content_type: ContentType::TextPlain,
            body: Vec::new(),
        }
    }

    /// Serialize `data` as the JSON body
    pub fn json<T: Serialize>(status: StatusCode, data: &T) -> Result<Self, InternalError> {
        let mut body = Vec::new();
        body.resize_default(MAX_RESPONSE_SIZE)
            .map_err(|()| InternalError::ResponseOverflow)?;
        let n = serde_json_core::to_slice(data, &mut body)
            .map_err(|_| InternalError::ResponseOverflow)?;
        body.truncate(n);
        Ok(Self {
            status,
            content_type: ContentType::Json,
            body,
        })
    }

    /// Error response with a `{"error":..,"field":..}` body
    pub fn error(error: DispatchError) -> Self {
        let body = ErrorBody {
            error: error.reason(),
            field: error.field(),
        };
        Self::json(error.status(), &body).unwrap_or_else(|_| Self::empty(error.status()))
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub const fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, if it is valid UTF-8
    pub fn body_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.body).ok()
    }

    /// Write the status line and headers
    pub(crate) fn write_head(&self, writer: &mut impl Write) -> core::fmt::Result {
        write!(
            writer,
            "HTTP/1.1 {} {}\r\n",
            self.status,
            reason_phrase(self.status)
        )?;
        write!(writer, "Content-Type: {}\r\n", self.content_type.as_str())?;
        write!(writer, "Content-Length: {}\r\n", self.body.len())?;
        write!(writer, "Connection: close\r\n")?;
        write!(writer, "\r\n")?;
        Ok(())
    }
}
