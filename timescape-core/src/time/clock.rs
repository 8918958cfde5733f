//! Two-part hardware clock
//!
//! The low 16 bits come from a free-running hardware counter, the high 16
//! bits from a software count bumped by the counter's wrap interrupt.
//! Both halves are read and written inside one critical section so a wrap
//! can never pair a pre-wrap low half with a post-wrap high half.

use portable_atomic::{AtomicU16, Ordering};

use super::TimeValue;

/// A 16-bit free-running hardware counter
pub trait TickCounter {
    /// Current counter value
    fn count(&self) -> u16;

    /// Load a new counter value
    fn set_count(&mut self, count: u16);

    /// True if the counter has wrapped but the wrap interrupt has not
    /// been serviced yet
    ///
    /// Counters that cannot report this keep the default.
    fn overflow_pending(&self) -> bool {
        false
    }

    /// Discard a pending wrap, called when the counter is reloaded
    fn clear_overflow_pending(&mut self) {}
}

/// Something that can tell the current instant
pub trait TimeSource {
    fn now(&self) -> TimeValue;
}

/// High half of the clock, incremented from the wrap interrupt
///
/// The interrupt handler is the only writer outside [`Clock::set`], which
/// holds a critical section while it writes.
pub struct OverflowCounter(AtomicU16);

impl OverflowCounter {
    pub const fn new() -> Self {
        Self(AtomicU16::new(0))
    }

    /// Count one hardware counter wrap (interrupt context)
    pub fn on_overflow(&self) {
        let next = self.0.load(Ordering::Relaxed).wrapping_add(1);
        self.0.store(next, Ordering::Relaxed);
    }

    pub fn get(&self) -> u16 {
        self.0.load(Ordering::Relaxed)
    }

    fn set(&self, value: u16) {
        self.0.store(value, Ordering::Relaxed);
    }
}

impl Default for OverflowCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Monotonic tick clock built from a [`TickCounter`] and an [`OverflowCounter`]
pub struct Clock<'a, C: TickCounter> {
    counter: C,
    overflows: &'a OverflowCounter,
}

impl<'a, C: TickCounter> Clock<'a, C> {
    pub fn new(counter: C, overflows: &'a OverflowCounter) -> Self {
        Self { counter, overflows }
    }

    /// Read both halves atomically
    pub fn now(&self) -> TimeValue {
        critical_section::with(|_| {
            let mut high = self.overflows.get();
            let low = self.counter.count();
            // A wrap that happened after interrupts were masked is still
            // pending. A small low half means it belongs to this reading.
            if self.counter.overflow_pending() && low < 0x8000 {
                high = high.wrapping_add(1);
            }
            TimeValue::from_ticks(((high as u32) << 16) | low as u32)
        })
    }

    /// Write both halves atomically
    pub fn set(&mut self, value: TimeValue) {
        let ticks = value.ticks();
        critical_section::with(|_| {
            self.counter.set_count(ticks as u16);
            self.counter.clear_overflow_pending();
            self.overflows.set((ticks >> 16) as u16);
        });
    }

    pub fn counter(&self) -> &C {
        &self.counter
    }
}

impl<C: TickCounter> TimeSource for Clock<'_, C> {
    fn now(&self) -> TimeValue {
        Clock::now(self)
    }
}
