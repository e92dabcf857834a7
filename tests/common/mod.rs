//! Mock collaborators shared by the integration tests
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use rgb_led_httpserver::{DriverError, Frame, OutputDriver, Rgbw, SocketError, SocketLayer};

/// Recording LED driver
///
/// Clones share the same log, so a test keeps one handle while the renderer
/// owns the other.
#[derive(Clone, Default)]
pub struct MockDriver {
    log: Rc<RefCell<DriverLog>>,
}

#[derive(Default)]
struct DriverLog {
    frames: Vec<Vec<Rgbw>>,
    wire: Vec<Vec<u8>>,
    failures: usize,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next `count` writes with [`DriverError::Busy`]
    pub fn fail_next(&self, count: usize) {
        self.log.borrow_mut().failures = count;
    }

    pub fn frame_count(&self) -> usize {
        self.log.borrow().frames.len()
    }

    pub fn frames(&self) -> Vec<Vec<Rgbw>> {
        self.log.borrow().frames.clone()
    }

    pub fn last_frame(&self) -> Option<Vec<Rgbw>> {
        self.log.borrow().frames.last().cloned()
    }

    pub fn last_wire(&self) -> Option<Vec<u8>> {
        self.log.borrow().wire.last().cloned()
    }
}

impl OutputDriver for MockDriver {
    fn write(&mut self, frame: &Frame<'_>) -> Result<(), DriverError> {
        let mut log = self.log.borrow_mut();
        if log.failures > 0 {
            log.failures -= 1;
            return Err(DriverError::Busy);
        }
        log.frames.push(frame.pixels().to_vec());
        log.wire.push(frame.wire_bytes().collect());
        Ok(())
    }
}

/// One step of a scripted client
#[derive(Debug, Clone)]
pub enum Chunk {
    /// Bytes delivered by one read (split if larger than the read buffer)
    Data(Vec<u8>),
    /// One read that finds no data
    Wait,
    /// Peer closes the connection
    Close,
}

impl Chunk {
    pub fn text(text: &str) -> Self {
        Self::Data(text.as_bytes().to_vec())
    }
}

/// Scripted non-blocking network stack
#[derive(Clone, Default)]
pub struct MockNetwork {
    inner: Rc<RefCell<NetworkLog>>,
}

#[derive(Default)]
struct NetworkLog {
    pending: VecDeque<MockConnection>,
    written: HashMap<usize, Vec<u8>>,
    closed: Vec<usize>,
    next_id: usize,
    fail_writes: bool,
}

pub struct MockConnection {
    id: usize,
    script: VecDeque<Chunk>,
}

impl MockNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a client that plays `script`; an exhausted script keeps waiting
    pub fn connect(&self, script: impl IntoIterator<Item = Chunk>) -> usize {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.pending.push_back(MockConnection {
            id,
            script: script.into_iter().collect(),
        });
        id
    }

    /// Queue a client sending the whole request in one piece
    pub fn send(&self, request: &str) -> usize {
        self.connect([Chunk::text(request)])
    }

    pub fn fail_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_writes = fail;
    }

    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Everything written to connection `id`
    pub fn written(&self, id: usize) -> String {
        let inner = self.inner.borrow();
        let bytes = inner.written.get(&id).cloned().unwrap_or_default();
        String::from_utf8(bytes).expect("response is utf-8")
    }

    pub fn is_closed(&self, id: usize) -> bool {
        self.inner.borrow().closed.contains(&id)
    }
}

impl SocketLayer for MockNetwork {
    type Connection = MockConnection;

    fn accept(&mut self) -> Option<MockConnection> {
        self.inner.borrow_mut().pending.pop_front()
    }

    fn read(&mut self, conn: &mut MockConnection, buf: &mut [u8]) -> Result<usize, SocketError> {
        match conn.script.pop_front() {
            None | Some(Chunk::Wait) => Ok(0),
            Some(Chunk::Close) => Err(SocketError::Closed),
            Some(Chunk::Data(bytes)) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                if n < bytes.len() {
                    conn.script.push_front(Chunk::Data(bytes[n..].to_vec()));
                }
                Ok(n)
            }
        }
    }

    fn write(&mut self, conn: &mut MockConnection, bytes: &[u8]) -> Result<(), SocketError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_writes {
            return Err(SocketError::WriteFault);
        }
        inner
            .written
            .entry(conn.id)
            .or_default()
            .extend_from_slice(bytes);
        Ok(())
    }

    fn close(&mut self, conn: MockConnection) {
        self.inner.borrow_mut().closed.push(conn.id);
    }
}

pub fn get(path: &str) -> String {
    format!("GET {path} HTTP/1.1\r\nHost: strip.local\r\n\r\n")
}

pub fn put(path: &str, body: &str) -> String {
    format!(
        "PUT {path} HTTP/1.1\r\nHost: strip.local\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    )
}

/// Status code of a raw HTTP response
pub fn status_of(response: &str) -> Option<u16> {
    response.split(' ').nth(1)?.parse().ok()
}

/// Body of a raw HTTP response
pub fn body_of(response: &str) -> &str {
    response
        .split_once("\r\n\r\n")
        .map(|(_, body)| body)
        .unwrap_or("")
}
