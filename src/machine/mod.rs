//! Vending machine configuration and state machine
//!
//! This module drives a purchase from idle through selection, payment,
//! dispensing, and reporting, using the terminal client and the hardware
//! collaborator traits.

pub mod config;
pub mod vend;

pub use self::config::{MachineConfig, Timings};
pub use self::vend::{AbortReason, CycleOutcome, FailureReason, VendStep, VendingMachine};
