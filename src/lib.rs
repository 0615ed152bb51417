//! vendctl: serial vending kiosk controller
//!
//! This library implements the payment-terminal protocol engine (command framing,
//! CRC16 checksums, response decoding) and the transaction state machine that
//! sequences product selection, card authorization, dispensing, and result
//! reporting over a serial-attached payment terminal.
pub mod core;

pub mod hw;
pub mod machine;
pub mod protocol;
pub mod terminal;

// Re-export commonly used items
pub use core::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Installs a default `tracing` subscriber writing to stderr.
///
/// Intended for embedding applications; does nothing if a subscriber is
/// already installed.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt().with_target(false).try_init();
}
