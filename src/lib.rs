#![no_std]

pub mod animation;
pub mod color;
pub mod dispatcher;
pub mod driver;
pub mod error;
pub mod frame;
pub mod http;
pub mod math8;
pub mod renderer;
pub mod run_loop;
pub mod state;
pub mod timer;

pub use animation::{Animate, Animation};
pub use color::{ColorOrder, Hsv, Rgb, Rgbw};
pub use dispatcher::{Command, MAX_PIXEL_WRITES};
pub use driver::SmartLedsOutput;
pub use error::{
    ConfigError, DispatchError, DriverError, InternalError, ProtocolError, SocketError,
    ValidationError,
};
pub use frame::Frame;
pub use http::{
    ConnectionState, HttpMethod, RawRequest, ReadOutcome, RequestReader, ResponseEnvelope,
    StatusCode,
};
pub use renderer::Renderer;
pub use run_loop::{DEFAULT_FRAME_DURATION, RequestActivity, RunLoop, ServerConfig, TickReport};
pub use state::{DeviceConfig, DeviceState, Diagnostics};
pub use timer::AnimationTimer;

pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The renderer is generic over this trait.
pub trait OutputDriver {
    /// Write one frame to the LED strip
    ///
    /// Must not block for longer than one bus transfer.
    fn write(&mut self, frame: &Frame<'_>) -> Result<(), DriverError>;
}

/// Abstract non-blocking network stack
///
/// None of the methods may block: "no data yet" is reported as `Ok(0)` from
/// [`read`](Self::read), "no client" as `None` from [`accept`](Self::accept).
pub trait SocketLayer {
    /// Handle of one accepted client connection
    type Connection;

    /// Accept a pending client connection, if any
    fn accept(&mut self) -> Option<Self::Connection>;

    /// Read available bytes into `buf`
    ///
    /// `Ok(0)` means no data is available right now. A peer that closed the
    /// connection is reported as an error.
    fn read(&mut self, conn: &mut Self::Connection, buf: &mut [u8]) -> Result<usize, SocketError>;

    /// Write all of `bytes`
    fn write(&mut self, conn: &mut Self::Connection, bytes: &[u8]) -> Result<(), SocketError>;

    /// Close the connection and release it
    fn close(&mut self, conn: Self::Connection);
}
