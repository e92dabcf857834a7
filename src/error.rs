//! Error taxonomy
//!
//! Every error is resolved inside the tick that produced it. None of them
//! ever reaches the host loop.

/// Malformed or oversized HTTP request.
///
/// The connection is closed without a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// Request does not fit into the request buffer
    TooLarge,
    /// Request line is not `METHOD /target HTTP/1.x`
    BadRequestLine,
    /// Method is not a valid HTTP token
    BadMethod,
    /// Header line without a `:` separator
    BadHeader,
    /// `Content-Length` is not a number
    BadContentLength,
    /// Request head is not valid UTF-8
    NotUtf8,
    /// Peer closed the connection before the request was complete
    ConnectionClosed,
}

impl ProtocolError {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TooLarge => "too large",
            Self::BadRequestLine => "bad request line",
            Self::BadMethod => "bad method",
            Self::BadHeader => "bad header",
            Self::BadContentLength => "bad content length",
            Self::NotUtf8 => "not utf-8",
            Self::ConnectionClosed => "connection closed",
        }
    }
}

/// Well-formed request carrying an invalid value.
///
/// Answered with `400 Bad Request` and a machine-readable reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Body is missing or is not the expected JSON object
    InvalidBody,
    /// Required field is absent
    MissingField(&'static str),
    /// Field value is outside of its allowed range
    OutOfRange(&'static str),
    /// Field is not a `#rrggbb[ww]` / `0xrrggbb[ww]` color
    InvalidColor(&'static str),
    /// Animation name is not in the catalogue
    UnknownAnimation,
    /// Field is not a parameter of the running animation
    InvalidProperty(&'static str),
}

impl ValidationError {
    /// Machine-readable reason code
    pub const fn reason(self) -> &'static str {
        match self {
            Self::InvalidBody => "invalid_body",
            Self::MissingField(_) => "missing_field",
            Self::OutOfRange(_) => "out_of_range",
            Self::InvalidColor(_) => "invalid_color",
            Self::UnknownAnimation => "unknown_animation",
            Self::InvalidProperty(_) => "invalid_property",
        }
    }

    /// Name of the offending field, if any
    pub const fn field(self) -> Option<&'static str> {
        match self {
            Self::MissingField(field)
            | Self::OutOfRange(field)
            | Self::InvalidColor(field)
            | Self::InvalidProperty(field) => Some(field),
            Self::InvalidBody | Self::UnknownAnimation => None,
        }
    }
}

/// Invariant violation inside the dispatcher.
///
/// Answered with `500 Internal Server Error`; device state is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalError {
    /// Response body does not fit into the response buffer
    ResponseOverflow,
}

impl InternalError {
    pub const fn reason(self) -> &'static str {
        match self {
            Self::ResponseOverflow => "response_overflow",
        }
    }
}

/// Outcome of a request that did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    Validation(ValidationError),
    /// No route for the method and path
    NotFound,
    Internal(InternalError),
}

impl DispatchError {
    /// HTTP status code for this error
    pub const fn status(self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound => 404,
            Self::Internal(_) => 500,
        }
    }

    pub const fn reason(self) -> &'static str {
        match self {
            Self::Validation(error) => error.reason(),
            Self::NotFound => "not_found",
            Self::Internal(error) => error.reason(),
        }
    }

    pub const fn field(self) -> Option<&'static str> {
        match self {
            Self::Validation(error) => error.field(),
            Self::NotFound | Self::Internal(_) => None,
        }
    }
}

impl From<ValidationError> for DispatchError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error)
    }
}

impl From<InternalError> for DispatchError {
    fn from(error: InternalError) -> Self {
        Self::Internal(error)
    }
}

/// LED hardware write failure. The frame is dropped and counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// Bus is still busy with the previous frame
    Busy,
    /// Write failed on the bus
    WriteFault,
}

/// Network socket failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketError {
    /// Peer closed the connection
    Closed,
    /// Write could not be completed
    WriteFault,
}

/// Invalid startup configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Pixel count is zero or exceeds the pixel buffer
    PixelCount,
    /// Brightness is outside of `0.0..=1.0`
    Brightness,
    /// Initial animation has invalid parameters
    Animation(ValidationError),
}
