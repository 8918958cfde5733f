//! Navigation state machine
//!
//! Guards are evaluated in order and the first match wins. Hardware
//! completion is only ever observed through [`SharedFlags`], which the
//! step pulse and shutter countdown interrupts update behind the main
//! loop's back.
//!
//! Clearing `start_timelapse` sends every sequence state back to
//! [`NavState::Waiting`] on its next evaluation. Only `Waiting` stops the
//! stepper, so an exposure or move already started runs to its own end.

use super::params::{StepTiming, TimelapsePlan};
use super::state::NavState;
use crate::config::ConfigSource;
use crate::flags::{Flag, SharedFlags};
use crate::task::{StateMachine, Transition};
use crate::time::TimeValue;
use crate::traits::{Direction, Endstops, Intervalometer, SliderStepper};

/// Steps per homing move
pub const HOMING_BURST_STEPS: u32 = 10;

/// Which endstop a homing run is heading for
#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Navigation task logic
pub struct NavigationFsm<'a, S, I, E, C> {
    stepper: S,
    shutter: I,
    endstops: E,
    config: C,
    flags: &'a SharedFlags,
    timing: StepTiming,
    /// Derived on the first pass through `StartTimelapse`, kept until `Init`
    plan: Option<TimelapsePlan>,
    timer_count: u16,
    current_pic_number: u32,
    last_pic_number: u32,
}

impl<'a, S, I, E, C> NavigationFsm<'a, S, I, E, C>
where
    S: SliderStepper,
    I: Intervalometer,
    E: Endstops,
    C: ConfigSource,
{
    pub fn new(
        stepper: S,
        shutter: I,
        endstops: E,
        config: C,
        flags: &'a SharedFlags,
        timing: StepTiming,
    ) -> Self {
        Self {
            stepper,
            shutter,
            endstops,
            config,
            flags,
            timing,
            plan: None,
            timer_count: 0,
            current_pic_number: 0,
            last_pic_number: 0,
        }
    }

    fn init(&mut self) -> Transition<NavState> {
        self.stepper.stop();
        self.endstops.configure();
        self.plan = None;
        log_info!("navigation initialised");
        Transition::GoTo(NavState::Waiting)
    }

    fn waiting(&mut self) -> Transition<NavState> {
        self.timer_count = self
            .timing
            .timer_count(self.config.motor_rpm(), self.config.steps_per_rev());
        self.stepper.stop();

        if self.flags.init_left.is_set() {
            log_info!("homing left");
            Transition::GoTo(NavState::InitLeft)
        } else if self.flags.init_right.is_set() {
            log_info!("homing right");
            Transition::GoTo(NavState::InitRight)
        } else if self.flags.start_timelapse.is_set() {
            Transition::GoTo(NavState::StartTimelapse)
        } else {
            Transition::Stay
        }
    }

    fn home(&mut self, side: Side) -> Transition<NavState> {
        let flags = self.flags;
        let (request, at_end, direction): (&Flag, bool, Direction) = match side {
            Side::Left => (
                &flags.init_left,
                self.endstops.left_triggered(),
                Direction::Forward,
            ),
            Side::Right => (
                &flags.init_right,
                self.endstops.right_triggered(),
                Direction::Reverse,
            ),
        };

        if at_end {
            request.clear();
            log_info!("endstop reached");
        }

        if !request.is_set() {
            // Burst completions must not be mistaken for a time-lapse move
            self.stepper.stop();
            flags.motor_move_complete.clear();
            Transition::GoTo(NavState::Waiting)
        } else if !flags.in_move_motor_mode.is_set() {
            flags.in_move_motor_mode.set();
            self.stepper
                .step(direction, HOMING_BURST_STEPS, self.timer_count);
            Transition::Stay
        } else {
            Transition::Stay
        }
    }

    fn start_timelapse(&mut self) -> Transition<NavState> {
        let plan = match self.plan {
            Some(plan) => plan,
            None => match TimelapsePlan::derive(&self.config.snapshot()) {
                Ok(plan) => {
                    log_info!(
                        "plan: {} revs, {} steps, {} s travel, {} pics, {} steps/pic",
                        plan.number_of_revs,
                        plan.total_steps,
                        plan.total_travel_time,
                        plan.total_number_of_pics,
                        plan.steps_per_pic
                    );
                    self.plan = Some(plan);
                    plan
                }
                Err(e) => {
                    log_error!("time-lapse rejected: {:?}", e);
                    self.flags.start_timelapse.clear();
                    return Transition::GoTo(NavState::Waiting);
                }
            },
        };

        let running = self.flags.start_timelapse.is_set();
        if running && self.current_pic_number <= plan.total_number_of_pics {
            self.last_pic_number = 0;
            Transition::GoTo(NavState::TakePic)
        } else if !running {
            Transition::GoTo(NavState::Waiting)
        } else {
            Transition::Stay
        }
    }

    fn take_pic(&mut self) -> Transition<NavState> {
        let total = self.plan.unwrap_or_default().total_number_of_pics;

        if self.current_pic_number >= total {
            log_info!("time-lapse complete after {} pictures", self.current_pic_number);
            self.flags.start_timelapse.clear();
            Transition::GoTo(NavState::Waiting)
        } else if !self.flags.start_timelapse.is_set() {
            log_warn!("time-lapse aborted at picture {}", self.current_pic_number);
            Transition::GoTo(NavState::Waiting)
        } else {
            self.flags.in_take_pic_mode.set();
            self.shutter.set_exposure(self.config.shutter_speed() as u16);
            self.shutter.take_pic();
            self.current_pic_number += 1;
            log_debug!("picture {} of {}", self.current_pic_number, total);
            Transition::GoTo(NavState::PicDelayWait)
        }
    }

    fn pic_delay_wait(&mut self) -> Transition<NavState> {
        if !self.flags.in_take_pic_mode.is_set() {
            self.flags.in_pic_delay_mode.set();
            self.shutter.set_pic_delay(self.config.pic_delay() as u16);
            self.shutter.delay_loop();
            Transition::GoTo(NavState::MotorDelayOrMove)
        } else if !self.flags.start_timelapse.is_set() {
            Transition::GoTo(NavState::Waiting)
        } else {
            Transition::Stay
        }
    }

    fn motor_delay_or_move(&mut self) -> Transition<NavState> {
        let idle = !self.flags.in_move_motor_mode.is_set()
            && !self.flags.in_pic_delay_mode.is_set();

        if idle && self.flags.motor_move_complete.is_set() {
            // Back to the shutter without waiting for this delay
            self.shutter.set_motor_delay(self.config.motor_delay() as u16);
            self.shutter.delay_loop();
            self.flags.motor_move_complete.clear();
            Transition::GoTo(NavState::TakePic)
        } else if idle {
            self.flags.in_motor_delay_mode.set();
            self.shutter.set_motor_delay(self.config.motor_delay() as u16);
            self.shutter.delay_loop();
            Transition::GoTo(NavState::MotorMove)
        } else if !self.flags.start_timelapse.is_set() {
            Transition::GoTo(NavState::Waiting)
        } else {
            Transition::Stay
        }
    }

    fn motor_move(&mut self) -> Transition<NavState> {
        if !self.flags.in_motor_delay_mode.is_set() {
            let steps = self.plan.unwrap_or_default().steps_per_pic;
            self.flags.in_move_motor_mode.set();
            self.stepper.step(Direction::Forward, steps, self.timer_count);
            Transition::GoTo(NavState::MotorDelayOrMove)
        } else if !self.flags.start_timelapse.is_set() {
            Transition::GoTo(NavState::Waiting)
        } else {
            Transition::Stay
        }
    }

    /// Parameters of the current run, if one has been planned
    pub fn plan(&self) -> Option<TimelapsePlan> {
        self.plan
    }

    /// Step timer period used for moves
    pub fn timer_count(&self) -> u16 {
        self.timer_count
    }

    /// Pictures taken since power-up
    ///
    /// Not reset between runs, so a second run after a completed one ends
    /// immediately until the next restart.
    pub fn current_pic_number(&self) -> u32 {
        self.current_pic_number
    }

    pub fn last_pic_number(&self) -> u32 {
        self.last_pic_number
    }

    pub fn stepper(&self) -> &S {
        &self.stepper
    }

    pub fn stepper_mut(&mut self) -> &mut S {
        &mut self.stepper
    }

    pub fn shutter(&self) -> &I {
        &self.shutter
    }

    pub fn shutter_mut(&mut self) -> &mut I {
        &mut self.shutter
    }

    pub fn endstops_mut(&mut self) -> &mut E {
        &mut self.endstops
    }
}

impl<S, I, E, C> StateMachine for NavigationFsm<'_, S, I, E, C>
where
    S: SliderStepper,
    I: Intervalometer,
    E: Endstops,
    C: ConfigSource,
{
    type State = NavState;

    fn initial_state(&self) -> NavState {
        NavState::Init
    }

    fn run(&mut self, state: NavState, _now: TimeValue) -> Transition<NavState> {
        match state {
            NavState::Init => self.init(),
            NavState::Waiting => self.waiting(),
            NavState::InitLeft => self.home(Side::Left),
            NavState::InitRight => self.home(Side::Right),
            NavState::StartTimelapse => self.start_timelapse(),
            NavState::TakePic => self.take_pic(),
            NavState::PicDelayWait => self.pic_delay_wait(),
            NavState::MotorDelayOrMove => self.motor_delay_or_move(),
            NavState::MotorMove => self.motor_move(),
        }
    }
}
