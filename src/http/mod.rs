//! Minimal HTTP/1.1 server plumbing for a single cooperative connection

pub mod reader;
pub mod request;
pub mod response;

pub use reader::{
    ConnectionState, DEFAULT_IDLE_TIMEOUT, MAX_REQUEST_SIZE, READ_CHUNK_SIZE, ReadOutcome,
    ReaderStats, RequestReader,
};
pub use request::{HttpMethod, RawRequest};
pub use response::{ContentType, MAX_RESPONSE_SIZE, ResponseEnvelope, StatusCode};
