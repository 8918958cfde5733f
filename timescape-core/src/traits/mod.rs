//! Hardware abstraction traits
//!
//! These traits define the interface between the sequencing logic and the
//! interrupt-driven drivers. Commands are fire-and-forget: completion is
//! reported later through [`SharedFlags`](crate::flags::SharedFlags), never
//! through a return value.

pub mod endstop;
pub mod input;
pub mod shutter;
pub mod stepper;

pub use endstop::Endstops;
pub use input::ButtonAdc;
pub use shutter::Intervalometer;
pub use stepper::{Direction, SliderStepper};
