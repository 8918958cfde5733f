//! Wraparound-safe tick count
//!
//! One tick is 0.5 µs (a 16 MHz clock behind a /8 prescaler, which the
//! RP2040 firmware reproduces with a fractional PWM divider). The counter
//! rolls over every 2^32 ticks, roughly 35.8 minutes, and every operation
//! wraps silently.
//!
//! Ordering between two values is only meaningful while their true
//! separation is below 2^31 ticks. Past that the difference aliases and
//! [`TimeValue::is_at_or_after`] answers the wrong way round.

use core::ops::{Add, AddAssign, Sub, SubAssign};

/// Ticks per second of the timebase
pub const TICKS_PER_SECOND: u32 = 2_000_000;

/// Ticks per microsecond of the timebase
pub const TICKS_PER_MICRO: u32 = TICKS_PER_SECOND / 1_000_000;

/// An instant or a duration, in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct TimeValue(u32);

impl TimeValue {
    /// The zero instant / empty duration
    pub const ZERO: Self = Self(0);

    /// Wrap a raw tick count
    pub const fn from_ticks(ticks: u32) -> Self {
        Self(ticks)
    }

    /// Build from whole seconds plus microseconds
    ///
    /// Values that do not fit in 32 bits of ticks wrap.
    pub const fn from_secs_micros(seconds: u32, micros: u32) -> Self {
        Self(
            micros
                .wrapping_mul(TICKS_PER_MICRO)
                .wrapping_add(seconds.wrapping_mul(TICKS_PER_SECOND)),
        )
    }

    /// Build from milliseconds
    pub const fn from_millis(millis: u32) -> Self {
        Self::from_secs_micros(millis / 1000, (millis % 1000) * 1000)
    }

    /// Build from microseconds
    pub const fn from_micros(micros: u32) -> Self {
        Self::from_secs_micros(micros / 1_000_000, micros % 1_000_000)
    }

    /// Raw tick count
    pub const fn ticks(self) -> u32 {
        self.0
    }

    /// Whole seconds part
    pub const fn seconds(self) -> u32 {
        self.0 / TICKS_PER_SECOND
    }

    /// Microseconds remaining after the whole seconds
    pub const fn micros(self) -> u32 {
        (self.0 % TICKS_PER_SECOND) / TICKS_PER_MICRO
    }

    /// True if `self` is the same instant as `other` or later
    ///
    /// Computed on the wrapped difference reinterpreted as signed, so it
    /// stays correct across the rollover as long as both instants are
    /// within 2^31 ticks of each other.
    pub const fn is_at_or_after(self, other: Self) -> bool {
        (self.0.wrapping_sub(other.0) as i32) >= 0
    }

    /// Signed tick distance from `earlier` to `self`
    pub const fn ticks_since(self, earlier: Self) -> i32 {
        self.0.wrapping_sub(earlier.0) as i32
    }
}

impl Add for TimeValue {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for TimeValue {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.wrapping_add(rhs.0);
    }
}

impl Sub for TimeValue {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.wrapping_sub(rhs.0))
    }
}

impl SubAssign for TimeValue {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.wrapping_sub(rhs.0);
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TimeValue {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}s+{}us", self.seconds(), self.micros())
    }
}
