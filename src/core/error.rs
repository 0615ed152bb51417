use std::io;
use thiserror::Error;

/// Custom error types for the vending controller
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Framing error: {0}")]
    Framing(String),

    #[error("Unknown response code: {0}")]
    UnknownResponse(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dispense error: {0}")]
    Dispense(String),
}

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Error::Transport(msg.into())
    }

    /// Creates a new framing error
    pub fn framing(msg: impl Into<String>) -> Self {
        Error::Framing(msg.into())
    }

    /// Creates a new protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Error::Protocol(msg.into())
    }

    /// Creates a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Creates a new dispense error
    pub fn dispense(msg: impl Into<String>) -> Self {
        Error::Dispense(msg.into())
    }

    /// True for failures the vend loop may not absorb.
    ///
    /// Only a transport that could not be opened terminates the controller;
    /// every other error resolves into an abort-and-retry from idle.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}
