//! Board constants
//!
//! | Signal | GPIO |
//! |---|---|
//! | STEP (PWM1 A) | 18 |
//! | DIR | 19 |
//! | MS1, MS2, MS3 | 20, 21, 22 |
//! | Shutter relay | 15 |
//! | Left endstop | 10 |
//! | Right endstop | 11 |
//! | Button ladder | 26 (ADC0) |

use embassy_rp::pwm::Config as PwmConfig;
use fixed::types::U12F4;
use timescape_core::navigation::StepTiming;

/// System clock after `embassy_rp::init`
pub const SYS_CLOCK_HZ: u32 = 125_000_000;

/// PWM slice used as the 2 MHz timebase
pub const CLOCK_SLICE: usize = 0;

/// PWM slice driving STEP
pub const STEP_SLICE: usize = 1;

/// PWM slice pacing the intervalometer countdown
pub const COUNTDOWN_SLICE: usize = 2;

/// Countdown interrupt rate
pub const COUNTDOWN_HZ: u32 = 100;

/// Integer divider of the step and countdown slices
const SLOW_DIVIDER: u8 = 250;

/// Step pulse timer: 500 kHz count rate
pub const STEP_TIMING: StepTiming = StepTiming {
    clock_hz: SYS_CLOCK_HZ,
    prescaler: SLOW_DIVIDER as u32,
};

/// Free-running 16-bit counter at 125 MHz / 62.5 = 2 MHz
pub fn clock_pwm_config() -> PwmConfig {
    let mut config = PwmConfig::default();
    // 62.5 in 12.4 fixed point
    config.divider = U12F4::from_bits(62 * 16 + 8);
    config.top = u16::MAX;
    config
}

/// Step slice, stopped
pub fn step_pwm_idle() -> PwmConfig {
    let mut config = PwmConfig::default();
    config.divider = SLOW_DIVIDER.into();
    config.enable = false;
    config
}

/// Step slice emitting one pulse every `period` counts
pub fn step_pwm_running(period: u16) -> PwmConfig {
    let mut config = step_pwm_idle();
    config.top = period.saturating_sub(1);
    config.compare_a = period / 2;
    config.enable = true;
    config
}

/// Countdown slice wrapping at [`COUNTDOWN_HZ`]
pub fn countdown_pwm_config() -> PwmConfig {
    let mut config = PwmConfig::default();
    config.divider = SLOW_DIVIDER.into();
    config.top = (SYS_CLOCK_HZ / SLOW_DIVIDER as u32 / COUNTDOWN_HZ - 1) as u16;
    config
}
