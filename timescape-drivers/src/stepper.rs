//! Step/direction stepper driver
//!
//! The carriage motor sits behind an EasyDriver-style step/direction
//! board. A pulse generator (a PWM slice on the RP2040) produces the STEP
//! train at a programmable period. Its wrap interrupt calls
//! [`MoveCounter::on_pulse`] once per pulse, and the move ends when the
//! counter reaches its target.
//!
//! ```ignore
//! static COUNTER: MoveCounter = MoveCounter::new();
//!
//! // main loop
//! let mut stepper = PulseStepper::new(step_pwm, dir_pin, &COUNTER, &FLAGS);
//! stepper.step(Direction::Forward, 12, 625);
//!
//! // pulse interrupt
//! if COUNTER.on_pulse(&FLAGS) == PulseOutcome::Complete {
//!     halt_step_pwm();
//! }
//! ```

use embedded_hal::digital::OutputPin;
use portable_atomic::{AtomicU32, Ordering};
use timescape_core::flags::SharedFlags;
use timescape_core::traits::{Direction, SliderStepper};
use timescape_core::{log_debug, log_warn};

/// Programmable pulse generator driving the STEP line
pub trait StepOutput {
    /// Emit pulses every `period` timer counts until halted
    fn start(&mut self, period: u16);

    /// Stop emitting pulses
    fn halt(&mut self);
}

/// What the pulse interrupt should do after counting a pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulseOutcome {
    /// More pulses to go
    Continue,
    /// Target reached, halt the pulse output
    Complete,
    /// No move armed
    Idle,
}

/// Pulse bookkeeping shared with the pulse interrupt
pub struct MoveCounter {
    target: AtomicU32,
    elapsed: AtomicU32,
}

impl MoveCounter {
    pub const fn new() -> Self {
        Self {
            target: AtomicU32::new(0),
            elapsed: AtomicU32::new(0),
        }
    }

    /// Arm a move of `steps` pulses
    pub fn arm(&self, steps: u32) {
        self.elapsed.store(0, Ordering::Release);
        self.target.store(steps, Ordering::Release);
    }

    /// Disarm without reporting completion
    pub fn cancel(&self) {
        self.target.store(0, Ordering::Release);
    }

    pub fn is_armed(&self) -> bool {
        self.target.load(Ordering::Acquire) != 0
    }

    /// Pulses left in the current move
    pub fn remaining(&self) -> u32 {
        let target = self.target.load(Ordering::Acquire);
        target.saturating_sub(self.elapsed.load(Ordering::Acquire))
    }

    /// Count one pulse (interrupt side)
    ///
    /// On the last pulse of a move sets `motor_move_complete`, clears
    /// `in_move_motor_mode` and disarms.
    pub fn on_pulse(&self, flags: &SharedFlags) -> PulseOutcome {
        let target = self.target.load(Ordering::Acquire);
        if target == 0 {
            return PulseOutcome::Idle;
        }

        let elapsed = self.elapsed.fetch_add(1, Ordering::AcqRel) + 1;
        if elapsed < target {
            return PulseOutcome::Continue;
        }

        self.target.store(0, Ordering::Release);
        flags.motor_move_complete.set();
        flags.in_move_motor_mode.clear();
        PulseOutcome::Complete
    }
}

impl Default for MoveCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Stepper on a pulse generator and a direction line
pub struct PulseStepper<'a, P, D> {
    output: P,
    dir: D,
    counter: &'a MoveCounter,
    flags: &'a SharedFlags,
}

impl<'a, P: StepOutput, D: OutputPin> PulseStepper<'a, P, D> {
    pub fn new(output: P, dir: D, counter: &'a MoveCounter, flags: &'a SharedFlags) -> Self {
        Self {
            output,
            dir,
            counter,
            flags,
        }
    }

    pub fn counter(&self) -> &MoveCounter {
        self.counter
    }

    pub fn output(&self) -> &P {
        &self.output
    }

    fn finish_now(&self) {
        self.counter.cancel();
        self.flags.motor_move_complete.set();
        self.flags.in_move_motor_mode.clear();
    }
}

impl<P: StepOutput, D: OutputPin> SliderStepper for PulseStepper<'_, P, D> {
    fn stop(&mut self) {
        self.output.halt();
        self.counter.cancel();
        self.flags.in_move_motor_mode.clear();
    }

    fn step(&mut self, direction: Direction, steps: u32, speed: u16) {
        let level = if direction.is_high() {
            self.dir.set_high()
        } else {
            self.dir.set_low()
        };
        if level.is_err() {
            log_warn!("direction line write failed");
        }

        if steps == 0 {
            self.finish_now();
            return;
        }
        if speed == 0 {
            // A zero period never produces a pulse
            log_warn!("move of {} steps requested at zero speed", steps);
            self.output.halt();
            self.finish_now();
            return;
        }

        log_debug!("move {:?} {} steps @ {}", direction, steps, speed);
        self.counter.arm(steps);
        self.output.start(speed);
    }
}

/// Microstep resolution of the driver board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepMode {
    #[default]
    Full,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
}

impl StepMode {
    /// MS1, MS2, MS3 levels
    pub const fn select_levels(self) -> [bool; 3] {
        match self {
            StepMode::Full => [false, false, false],
            StepMode::Half => [true, false, false],
            StepMode::Quarter => [false, true, false],
            StepMode::Eighth => [true, true, false],
            StepMode::Sixteenth => [true, true, true],
        }
    }

    /// Pulses per full step
    pub const fn microsteps(self) -> u32 {
        match self {
            StepMode::Full => 1,
            StepMode::Half => 2,
            StepMode::Quarter => 4,
            StepMode::Eighth => 8,
            StepMode::Sixteenth => 16,
        }
    }
}

/// The three microstep select lines
pub struct MicrostepPins<M1, M2, M3> {
    ms1: M1,
    ms2: M2,
    ms3: M3,
}

impl<M1: OutputPin, M2: OutputPin, M3: OutputPin> MicrostepPins<M1, M2, M3> {
    pub fn new(ms1: M1, ms2: M2, ms3: M3) -> Self {
        Self { ms1, ms2, ms3 }
    }

    /// Drive the select lines for `mode`
    pub fn select(&mut self, mode: StepMode) {
        let [l1, l2, l3] = mode.select_levels();
        let ok = self.ms1.set_state(l1.into()).is_ok()
            & self.ms2.set_state(l2.into()).is_ok()
            & self.ms3.set_state(l3.into()).is_ok();
        if ok {
            log_debug!("step mode {:?}", mode);
        } else {
            log_warn!("step mode select failed");
        }
    }
}
