//! Intervalometer driver
//!
//! One countdown serves the exposure, the post-exposure delay and the
//! pre-move delay. The firmware ticks [`Countdown::on_tick`] from a fixed
//! rate timer interrupt; when the armed number of seconds has passed the
//! countdown stops and clears the first busy flag that is set, checking
//! exposure, picture delay and motor delay in that order.

use embedded_hal::digital::OutputPin;
use portable_atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering};
use timescape_core::flags::SharedFlags;
use timescape_core::log_warn;
use timescape_core::traits::Intervalometer;

/// Which wait a countdown expiry ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Expiry {
    /// Exposure over, release the shutter
    Exposure,
    PicDelay,
    MotorDelay,
    /// Nothing was waiting on it
    Unclaimed,
}

/// Seconds countdown shared with the timer interrupt
pub struct Countdown {
    ticks_per_second: u32,
    seconds: AtomicU16,
    ticks: AtomicU32,
    running: AtomicBool,
}

impl Countdown {
    pub const fn new(ticks_per_second: u32) -> Self {
        Self {
            ticks_per_second,
            seconds: AtomicU16::new(0),
            ticks: AtomicU32::new(0),
            running: AtomicBool::new(false),
        }
    }

    /// Load the duration of the next countdown
    pub fn arm(&self, seconds: u16) {
        self.seconds.store(seconds, Ordering::Release);
    }

    pub fn armed_seconds(&self) -> u16 {
        self.seconds.load(Ordering::Acquire)
    }

    /// Restart counting from zero
    pub fn start(&self) {
        self.ticks.store(0, Ordering::Release);
        self.running.store(true, Ordering::Release);
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
        self.ticks.store(0, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Count one timer tick (interrupt side)
    ///
    /// Returns `None` while the countdown is idle or still running.
    pub fn on_tick(&self, flags: &SharedFlags) -> Option<Expiry> {
        if !self.is_running() {
            return None;
        }

        let ticks = self.ticks.fetch_add(1, Ordering::AcqRel) + 1;
        let limit = self.armed_seconds() as u32 * self.ticks_per_second;
        if ticks < limit {
            return None;
        }

        self.stop();
        let expiry = if flags.in_take_pic_mode.is_set() {
            flags.in_take_pic_mode.clear();
            Expiry::Exposure
        } else if flags.in_pic_delay_mode.is_set() {
            flags.in_pic_delay_mode.clear();
            Expiry::PicDelay
        } else if flags.in_motor_delay_mode.is_set() {
            flags.in_motor_delay_mode.clear();
            Expiry::MotorDelay
        } else {
            Expiry::Unclaimed
        };
        Some(expiry)
    }
}

/// Camera shutter line plus the shared countdown
///
/// The shutter line is active high. The interrupt half has to release it
/// when [`Countdown::on_tick`] reports [`Expiry::Exposure`]; the firmware
/// shares the pin between both halves.
pub struct ShutterTimer<'a, P> {
    shutter: P,
    countdown: &'a Countdown,
}

impl<'a, P: OutputPin> ShutterTimer<'a, P> {
    pub fn new(mut shutter: P, countdown: &'a Countdown) -> Self {
        if shutter.set_low().is_err() {
            log_warn!("shutter line write failed");
        }
        Self { shutter, countdown }
    }

    pub fn countdown(&self) -> &Countdown {
        self.countdown
    }

    /// Release the shutter and abandon any running countdown
    pub fn cancel(&mut self) {
        self.countdown.stop();
        if self.shutter.set_low().is_err() {
            log_warn!("shutter line write failed");
        }
    }
}

impl<P: OutputPin> Intervalometer for ShutterTimer<'_, P> {
    fn set_exposure(&mut self, seconds: u16) {
        self.countdown.arm(seconds);
    }

    fn set_pic_delay(&mut self, seconds: u16) {
        self.countdown.arm(seconds);
    }

    fn set_motor_delay(&mut self, seconds: u16) {
        self.countdown.arm(seconds);
    }

    fn take_pic(&mut self) {
        if self.shutter.set_high().is_err() {
            log_warn!("shutter line write failed");
        }
        self.countdown.start();
    }

    fn delay_loop(&mut self) {
        self.countdown.start();
    }
}
