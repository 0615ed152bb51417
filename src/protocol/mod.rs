//! Payment terminal protocol
//!
//! This module defines the terminal command and response registries, the
//! CRC16 checksum, and the frame codec used on the serial link.

pub mod codec;
pub mod command;
pub mod crc;
pub mod response;

pub use self::codec::FrameCodec;
pub use self::command::Command;
pub use self::response::{ParsedResponse, ResponseKind};

// Constants
/// Positive acknowledge control byte
pub const ACK: u8 = 0x06;

/// Negative acknowledge control byte
pub const NAK: u8 = 0x15;

/// Frame terminator
pub const CR: u8 = 0x0D;

/// Separator between the code/identifier and data fields
pub const FIELD_SEP: u8 = 0x1E;

/// Number of checksum bytes carried by CRC-protected frames
pub const CRC_LEN: usize = 2;
