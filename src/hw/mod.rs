//! Hardware collaborator interfaces
//!
//! The vend state machine talks to its peripherals through these traits so
//! the core never depends on a concrete keypad, display, or motor driver.

pub mod dispense;
pub mod display;
pub mod keypad;

pub use self::dispense::{
    Dispenser, MotorDispenser, MotorDriver, MoveCommand, TelemetryLog, TelemetrySample,
    BUFFER_IDLE,
};
pub use self::display::{Display, NullDisplay};
pub use self::keypad::Keypad;
