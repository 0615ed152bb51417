//! Synchronous payment terminal client
//!
//! This module composes the frame codec with a byte transport to provide
//! one-command-at-a-time exchanges with the terminal.

pub mod client;

pub use self::client::TerminalClient;
