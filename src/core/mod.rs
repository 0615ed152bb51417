//! Core types for the vending controller
//!
//! This module contains the fundamental building blocks used throughout the library.

pub mod error;
pub mod types;

pub use self::error::{Error, Result};
pub use self::types::{
    price_cents,
    Portion,
    Product,
    SaleResult,
    Transaction,
};

/// Default baud rate for the payment terminal serial link
pub const TERMINAL_BAUD: u32 = 9600;

/// Default baud rate for the motor controller serial link
pub const MOTOR_BAUD: u32 = 38_400;

/// Per-read timeout on serial transports; a frame read keeps polling past it
pub const SERIAL_READ_TIMEOUT_MS: u64 = 100;
