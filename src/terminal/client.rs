use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use serialport::SerialPort;
use tracing::debug;

use crate::core::{Error, Result, SERIAL_READ_TIMEOUT_MS};
use crate::protocol::{Command, FrameCodec, ParsedResponse};

/// Synchronous command/response client for the payment terminal.
///
/// Exactly one exchange is in flight at a time; there is no pipelining and no
/// internal retry. A caller that wants resilience retries at a higher layer.
pub struct TerminalClient<T> {
    /// Byte transport, normally the terminal's serial port
    transport: T,
    /// Frame codec
    codec: FrameCodec,
    /// Receive accumulator
    buf: BytesMut,
}

impl TerminalClient<Box<dyn SerialPort>> {
    /// Opens the terminal's serial port.
    ///
    /// This is the only failure the controller treats as fatal.
    pub fn open(path: &str, baud: u32) -> Result<Self> {
        let port = serialport::new(path, baud)
            .timeout(Duration::from_millis(SERIAL_READ_TIMEOUT_MS))
            .open()
            .map_err(|e| {
                Error::transport(format!("failed to open terminal port {}: {}", path, e))
            })?;
        Ok(TerminalClient::new(port))
    }
}

impl<T: Read + Write> TerminalClient<T> {
    /// Creates a client over an already-open transport
    pub fn new(transport: T) -> Self {
        TerminalClient {
            transport,
            codec: FrameCodec::new(),
            buf: BytesMut::new(),
        }
    }

    /// Sends a command and blocks until its response is decoded.
    pub fn send(&mut self, command: Command, args: &[&str]) -> Result<ParsedResponse> {
        let mut frame = BytesMut::new();
        self.codec.encode(command, args, &mut frame)?;
        debug!(command = command.identifier(), args = ?args, "sending command");

        self.transport.write_all(&frame)?;
        self.transport.flush()?;

        let raw = self.read_frame()?;
        let response = ParsedResponse::decode(&raw)?;
        debug!(response = response.kind.name(), "received response");
        Ok(response)
    }

    /// Reads transport bytes into the accumulator until a frame completes.
    ///
    /// Per-chunk read timeouts are treated as "no data yet"; the wait for the
    /// frame itself is unbounded.
    fn read_frame(&mut self) -> Result<Bytes> {
        let mut chunk = [0u8; 64];
        loop {
            if let Some(frame) = self.codec.decode(&mut self.buf)? {
                return Ok(frame);
            }
            match self.transport.read(&mut chunk) {
                Ok(0) => continue,
                Ok(n) => self.buf.extend_from_slice(&chunk[..n]),
                Err(e)
                    if matches!(
                        e.kind(),
                        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                    ) =>
                {
                    continue
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
