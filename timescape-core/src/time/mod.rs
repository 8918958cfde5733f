//! Tick time
//!
//! A 32-bit free-running tick count and the clock that assembles it from a
//! 16-bit hardware counter plus an interrupt-maintained overflow count.

mod clock;
mod value;

pub use clock::{Clock, OverflowCounter, TickCounter, TimeSource};
pub use value::{TimeValue, TICKS_PER_MICRO, TICKS_PER_SECOND};
