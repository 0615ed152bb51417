use bytes::{Buf, Bytes, BytesMut};

use super::{crc::crc16, Command, ACK, CR, FIELD_SEP, NAK};
use crate::core::{Error, Result};

/// Frame codec for the terminal serial link.
///
/// Encoding builds `identifier [0x1E field]* [CRC16] 0x0D` command frames.
/// Decoding recognizes response frame boundaries on an inbound byte stream:
/// a frame is complete once the accumulator starts with an ACK/NAK control
/// byte or ends with a carriage return.
#[derive(Clone, Default)]
pub struct FrameCodec;

impl FrameCodec {
    /// Creates a new frame codec
    pub fn new() -> Self {
        FrameCodec
    }

    /// Encodes a command and its arguments into `dst`.
    ///
    /// Arguments must be ASCII; the checksum, when the command requires one,
    /// covers every byte built so far.
    pub fn encode(&mut self, command: Command, args: &[&str], dst: &mut BytesMut) -> Result<()> {
        let start = dst.len();
        dst.extend_from_slice(command.identifier().as_bytes());
        for arg in args {
            if !arg.is_ascii() {
                return Err(Error::protocol(format!(
                    "argument {:?} is not ASCII-encodable",
                    arg
                )));
            }
            dst.extend_from_slice(&[FIELD_SEP]);
            dst.extend_from_slice(arg.as_bytes());
        }
        if command.requires_crc() {
            let crc = crc16(&dst[start..]);
            dst.extend_from_slice(&crc);
        }
        dst.extend_from_slice(&[CR]);
        Ok(())
    }

    /// Extracts the next complete frame from `src`, if one has accumulated.
    ///
    /// Returns `Ok(None)` when more bytes are needed. There is no maximum
    /// frame length and no timeout at this layer; pacing is the transport's
    /// concern.
    pub fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        let Some(&first) = src.first() else {
            return Ok(None);
        };
        if first == ACK || first == NAK {
            let frame = src.split_to(1);
            // Drop anything that trailed the control byte.
            src.advance(src.len());
            return Ok(Some(frame.freeze()));
        }
        if src.last() == Some(&CR) {
            let frame = src.split_to(src.len());
            return Ok(Some(frame.freeze()));
        }
        Ok(None)
    }
}
