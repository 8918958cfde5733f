//! Simulated slider hardware
//!
//! The fake stepper and shutter record commands and, when `settle` is
//! called, raise completion flags the way the interrupt handlers do.

#![allow(dead_code)]

use std::cell::Cell;

use timescape_core::flags::SharedFlags;
use timescape_core::traits::{Direction, Endstops, Intervalometer, SliderStepper};

pub struct SimStepper<'a> {
    flags: &'a SharedFlags,
    pub moves: Vec<(Direction, u32, u16)>,
    pub stops: u32,
    pending: bool,
}

impl<'a> SimStepper<'a> {
    pub fn new(flags: &'a SharedFlags) -> Self {
        Self {
            flags,
            moves: Vec::new(),
            stops: 0,
            pending: false,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.pending
    }

    /// Finish the move in flight, as the last step pulse interrupt would
    pub fn settle(&mut self) {
        if self.pending {
            self.pending = false;
            self.flags.motor_move_complete.set();
            self.flags.in_move_motor_mode.clear();
        }
    }
}

impl SliderStepper for SimStepper<'_> {
    fn stop(&mut self) {
        self.stops += 1;
        if self.pending {
            self.pending = false;
            self.flags.in_move_motor_mode.clear();
        }
    }

    fn step(&mut self, direction: Direction, steps: u32, speed: u16) {
        self.moves.push((direction, steps, speed));
        self.pending = true;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutterEvent {
    Exposure(u16),
    PicDelay(u16),
    MotorDelay(u16),
    TakePic,
    DelayLoop,
}

pub struct SimShutter<'a> {
    flags: &'a SharedFlags,
    pub events: Vec<ShutterEvent>,
    pub shutter_open: bool,
    pub pictures: u32,
    running: bool,
}

impl<'a> SimShutter<'a> {
    pub fn new(flags: &'a SharedFlags) -> Self {
        Self {
            flags,
            events: Vec::new(),
            shutter_open: false,
            pictures: 0,
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Let the countdown run out, as the countdown interrupt would
    pub fn settle(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        if self.flags.in_take_pic_mode.is_set() {
            self.shutter_open = false;
            self.flags.in_take_pic_mode.clear();
        } else if self.flags.in_pic_delay_mode.is_set() {
            self.flags.in_pic_delay_mode.clear();
        } else if self.flags.in_motor_delay_mode.is_set() {
            self.flags.in_motor_delay_mode.clear();
        }
    }
}

impl Intervalometer for SimShutter<'_> {
    fn set_exposure(&mut self, seconds: u16) {
        self.events.push(ShutterEvent::Exposure(seconds));
    }

    fn set_pic_delay(&mut self, seconds: u16) {
        self.events.push(ShutterEvent::PicDelay(seconds));
    }

    fn set_motor_delay(&mut self, seconds: u16) {
        self.events.push(ShutterEvent::MotorDelay(seconds));
    }

    fn take_pic(&mut self) {
        self.events.push(ShutterEvent::TakePic);
        self.shutter_open = true;
        self.pictures += 1;
        self.running = true;
    }

    fn delay_loop(&mut self) {
        self.events.push(ShutterEvent::DelayLoop);
        self.running = true;
    }
}

/// Endstops that trip after a number of homing bursts
pub struct SimEndstops<'a> {
    bursts: &'a Cell<u32>,
    pub left_after: Option<u32>,
    pub right_after: Option<u32>,
    pub configured: bool,
}

impl<'a> SimEndstops<'a> {
    pub fn new(bursts: &'a Cell<u32>) -> Self {
        Self {
            bursts,
            left_after: None,
            right_after: None,
            configured: false,
        }
    }
}

impl Endstops for SimEndstops<'_> {
    fn configure(&mut self) {
        self.configured = true;
    }

    fn left_triggered(&mut self) -> bool {
        self.left_after.is_some_and(|n| self.bursts.get() >= n)
    }

    fn right_triggered(&mut self) -> bool {
        self.right_after.is_some_and(|n| self.bursts.get() >= n)
    }
}
