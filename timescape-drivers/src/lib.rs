//! Hardware driver implementations
//!
//! Chip-independent halves of the slider drivers. Each driver splits into a
//! main-loop half implementing a trait from `timescape-core` and an
//! interrupt half made of atomics that the firmware's handlers tick:
//!
//! - Step/direction stepper with interrupt pulse counting
//! - Intervalometer with a shutter line and a seconds countdown
//! - Endstop switches on GPIO inputs

#![no_std]
#![deny(unsafe_code)]

pub mod endstop;
pub mod shutter;
pub mod stepper;

pub use endstop::PinEndstops;
pub use shutter::{Countdown, Expiry, ShutterTimer};
pub use stepper::{MicrostepPins, MoveCounter, PulseOutcome, PulseStepper, StepMode, StepOutput};
