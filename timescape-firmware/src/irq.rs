//! Interrupt side
//!
//! All three PWM slices share the `PWM_IRQ_WRAP` line. The handler
//! acknowledges every pending slice and dispatches on the bits:
//!
//! - clock slice: bump the clock's overflow count
//! - step slice: count a pulse, halt STEP after the last one
//! - countdown slice: tick the intervalometer, release the shutter when an
//!   exposure ends
//!
//! State shared with the main loop is either atomic or parked in a
//! critical-section mutex.

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_rp::gpio::Output;
use embassy_rp::interrupt;
use embassy_rp::interrupt::InterruptExt;
use embassy_rp::pac;
use embassy_rp::pwm::Pwm;
use timescape_core::config::{SharedConfig, SliderConfig};
use timescape_core::flags::SharedFlags;
use timescape_core::time::OverflowCounter;
use timescape_drivers::{Countdown, Expiry, MoveCounter, PulseOutcome};

use crate::board::{self, CLOCK_SLICE, COUNTDOWN_SLICE, STEP_SLICE};

pub static FLAGS: SharedFlags = SharedFlags::new();
pub static CONFIG: SharedConfig = SharedConfig::new(SliderConfig::DEFAULT);
pub static OVERFLOWS: OverflowCounter = OverflowCounter::new();
pub static MOVE: MoveCounter = MoveCounter::new();
pub static COUNTDOWN: Countdown = Countdown::new(board::COUNTDOWN_HZ);

static STEP_PWM: Mutex<RefCell<Option<Pwm<'static>>>> = Mutex::new(RefCell::new(None));
static SHUTTER: Mutex<RefCell<Option<Output<'static>>>> = Mutex::new(RefCell::new(None));

const fn slice_bit(slice: usize) -> u32 {
    1 << slice
}

/// Hand the STEP slice over to the shared cell
pub fn install_step_pwm(pwm: Pwm<'static>) {
    critical_section::with(|cs| STEP_PWM.borrow_ref_mut(cs).replace(pwm));
}

/// Hand the shutter relay line over to the shared cell
pub fn install_shutter(pin: Output<'static>) {
    critical_section::with(|cs| SHUTTER.borrow_ref_mut(cs).replace(pin));
}

/// Run `f` on the STEP slice, if installed
pub fn with_step_pwm<R>(f: impl FnOnce(&mut Pwm<'static>) -> R) -> Option<R> {
    critical_section::with(|cs| STEP_PWM.borrow_ref_mut(cs).as_mut().map(f))
}

/// Run `f` on the shutter line, if installed
pub fn with_shutter<R>(f: impl FnOnce(&mut Output<'static>) -> R) -> Option<R> {
    critical_section::with(|cs| SHUTTER.borrow_ref_mut(cs).as_mut().map(f))
}

/// True if the clock slice wrapped and the handler has not run yet
pub fn clock_wrap_pending() -> bool {
    pac::PWM.intr().read().0 & slice_bit(CLOCK_SLICE) != 0
}

/// Acknowledge a clock slice wrap without counting it
pub fn clear_clock_wrap() {
    pac::PWM
        .intr()
        .write_value(pac::pwm::regs::Intr(slice_bit(CLOCK_SLICE)));
}

/// Unmask the wrap interrupt of all three slices
pub fn enable() {
    let mask = slice_bit(CLOCK_SLICE) | slice_bit(STEP_SLICE) | slice_bit(COUNTDOWN_SLICE);
    pac::PWM.intr().write_value(pac::pwm::regs::Intr(mask));
    pac::PWM.inte().modify(|w| w.0 |= mask);
    // SAFETY: the handler below only touches atomics and critical-section cells
    unsafe { interrupt::PWM_IRQ_WRAP.enable() };
}

#[interrupt]
fn PWM_IRQ_WRAP() {
    let pending = pac::PWM.ints().read().0;
    pac::PWM.intr().write_value(pac::pwm::regs::Intr(pending));

    if pending & slice_bit(CLOCK_SLICE) != 0 {
        OVERFLOWS.on_overflow();
    }

    if pending & slice_bit(STEP_SLICE) != 0 && MOVE.on_pulse(&FLAGS) == PulseOutcome::Complete {
        with_step_pwm(|pwm| pwm.set_config(&board::step_pwm_idle()));
    }

    if pending & slice_bit(COUNTDOWN_SLICE) != 0
        && COUNTDOWN.on_tick(&FLAGS) == Some(Expiry::Exposure)
    {
        with_shutter(|pin| pin.set_low());
    }
}
