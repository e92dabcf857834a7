//! Non-blocking request reader
//!
//! Holds at most one client connection and accumulates its bytes across
//! calls until a whole request is buffered. Every call performs at most one
//! socket read and returns immediately.

use embassy_time::{Duration, Instant};
#[cfg(feature = "esp32-log")]
use esp_println::println;
use heapless::{String, Vec};

use super::request::{RawRequest, RequestHead};
use super::response::ResponseEnvelope;
use crate::SocketLayer;
use crate::error::{ProtocolError, SocketError};

/// Capacity of the request buffer (head and body)
pub const MAX_REQUEST_SIZE: usize = 1024;

/// Largest single socket read
pub const READ_CHUNK_SIZE: usize = 256;

/// Connection without progress for this long is closed
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(5);

const RESPONSE_HEAD_SIZE: usize = 128;

/// Result of one [`RequestReader::try_read`] call
#[derive(Debug, PartialEq, Eq)]
pub enum ReadOutcome<'a> {
    /// No connection, or no new bytes
    Empty,
    /// New bytes buffered, request not complete yet
    Partial,
    /// Whole request buffered; answer it with [`RequestReader::respond`]
    Complete(RawRequest<'a>),
    /// Request rejected and connection closed
    Malformed(ProtocolError),
    /// Connection closed after the idle timeout
    TimedOut,
}

/// Observable connection state
///
/// Accepting a client is not a state of its own: a client is accepted and
/// read in the same [`RequestReader::try_read`] call, so it shows up as
/// `Reading` straight away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No client; the next call may accept one
    Idle,
    /// Client connected, request incomplete
    Reading,
    /// Request complete, response pending
    Complete,
}

/// Counters of discarded connections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStats {
    pub malformed: u32,
    pub refused: u32,
    pub timed_out: u32,
}

struct Session<C> {
    conn: C,
    buffer: Vec<u8, MAX_REQUEST_SIZE>,
    last_progress: Instant,
    complete: bool,
}

/// Progress of the active session after one read
#[derive(Clone, Copy)]
enum Progress {
    Idle,
    Partial,
    Complete(RequestHead),
    Rejected(ProtocolError),
    TimedOut,
}

pub struct RequestReader<S: SocketLayer> {
    socket: S,
    idle_timeout: Duration,
    session: Option<Session<S::Connection>>,
    stats: ReaderStats,
}

impl<S: SocketLayer> RequestReader<S> {
    pub fn new(socket: S) -> Self {
        Self::with_idle_timeout(socket, DEFAULT_IDLE_TIMEOUT)
    }

    pub fn with_idle_timeout(socket: S, idle_timeout: Duration) -> Self {
        Self {
            socket,
            idle_timeout,
            session: None,
            stats: ReaderStats::default(),
        }
    }

    /// Try to make progress on the current request without blocking
    ///
    /// Accepts a client when idle, refuses extra clients while busy, then
    /// performs at most one non-blocking read.
    pub fn try_read(&mut self, now: Instant) -> ReadOutcome<'_> {
        if self.session.as_ref().is_some_and(|session| session.complete) {
            // The previous request was never answered
            self.close_session();
        }

        if self.session.is_none() {
            let Some(conn) = self.socket.accept() else {
                return ReadOutcome::Empty;
            };
            #[cfg(feature = "esp32-log")]
            println!("http: connection accepted");
            self.session = Some(Session {
                conn,
                buffer: Vec::new(),
                last_progress: now,
                complete: false,
            });
        } else {
            self.refuse_pending();
        }

        match self.read_session(now) {
            Progress::Idle => ReadOutcome::Empty,
            Progress::Partial => ReadOutcome::Partial,
            Progress::Rejected(error) => {
                #[cfg(feature = "esp32-log")]
                println!("http: request rejected: {}", error.as_str());
                self.stats.malformed = self.stats.malformed.wrapping_add(1);
                self.close_session();
                ReadOutcome::Malformed(error)
            }
            Progress::TimedOut => {
                #[cfg(feature = "esp32-log")]
                println!("http: connection timed out");
                self.stats.timed_out = self.stats.timed_out.wrapping_add(1);
                self.close_session();
                ReadOutcome::TimedOut
            }
            Progress::Complete(head) => match self.session.as_mut() {
                Some(session) => {
                    session.complete = true;
                    ReadOutcome::Complete(head.request(&session.buffer))
                }
                None => ReadOutcome::Empty,
            },
        }
    }

    /// Write the response for the completed request and close the connection
    ///
    /// Does nothing if no request is waiting for a response.
    pub fn respond(&mut self, envelope: &ResponseEnvelope) -> Result<(), SocketError> {
        if !self.session.as_ref().is_some_and(|session| session.complete) {
            return Ok(());
        }
        let Some(mut session) = self.session.take() else {
            return Ok(());
        };
        let result = write_response(&mut self.socket, &mut session.conn, envelope);
        self.socket.close(session.conn);
        #[cfg(feature = "esp32-log")]
        println!("http: {} sent, connection closed", envelope.status());
        result
    }

    pub fn state(&self) -> ConnectionState {
        match &self.session {
            None => ConnectionState::Idle,
            Some(session) if session.complete => ConnectionState::Complete,
            Some(_) => ConnectionState::Reading,
        }
    }

    /// Bytes buffered for the current request
    pub fn buffered(&self) -> usize {
        self.session
            .as_ref()
            .map(|session| session.buffer.len())
            .unwrap_or(0)
    }

    pub const fn stats(&self) -> ReaderStats {
        self.stats
    }

    pub const fn socket(&self) -> &S {
        &self.socket
    }

    pub fn socket_mut(&mut self) -> &mut S {
        &mut self.socket
    }

    /// Read once from the active session and classify the buffer
    fn read_session(&mut self, now: Instant) -> Progress {
        let Some(session) = self.session.as_mut() else {
            return Progress::Idle;
        };

        let mut chunk = [0u8; READ_CHUNK_SIZE];
        match self.socket.read(&mut session.conn, &mut chunk) {
            Ok(0) => {
                let idle = now
                    .checked_duration_since(session.last_progress)
                    .unwrap_or(Duration::from_millis(0));
                if idle >= self.idle_timeout {
                    return Progress::TimedOut;
                }
                return Progress::Idle;
            }
            Ok(n) => {
                // Bytes past the free capacity are dropped; the head decides
                // whether they were needed.
                let free = session.buffer.capacity() - session.buffer.len();
                let take = n.min(free);
                if session.buffer.extend_from_slice(&chunk[..take]).is_err() {
                    return Progress::Rejected(ProtocolError::TooLarge);
                }
                session.last_progress = now;
            }
            Err(_) => return Progress::Rejected(ProtocolError::ConnectionClosed),
        }

        match RequestHead::parse(&session.buffer) {
            Ok(Some(head)) if head.total_len() > MAX_REQUEST_SIZE => {
                Progress::Rejected(ProtocolError::TooLarge)
            }
            Ok(Some(head)) if session.buffer.len() >= head.total_len() => Progress::Complete(head),
            Ok(Some(_)) => Progress::Partial,
            Ok(None) if session.buffer.is_full() => Progress::Rejected(ProtocolError::TooLarge),
            Ok(None) => Progress::Partial,
            Err(error) => Progress::Rejected(error),
        }
    }

    /// Close a connection that arrived while another one is active
    fn refuse_pending(&mut self) {
        if let Some(extra) = self.socket.accept() {
            #[cfg(feature = "esp32-log")]
            println!("http: connection refused, another client is active");
            self.socket.close(extra);
            self.stats.refused = self.stats.refused.wrapping_add(1);
        }
    }

    fn close_session(&mut self) {
        if let Some(session) = self.session.take() {
            self.socket.close(session.conn);
        }
    }
}

fn write_response<S: SocketLayer>(
    socket: &mut S,
    conn: &mut S::Connection,
    envelope: &ResponseEnvelope,
) -> Result<(), SocketError> {
    let mut head = String::<RESPONSE_HEAD_SIZE>::new();
    envelope
        .write_head(&mut head)
        .map_err(|_| SocketError::WriteFault)?;
    socket.write(conn, head.as_bytes())?;
    if !envelope.body().is_empty() {
        socket.write(conn, envelope.body())?;
    }
    Ok(())
}
