//! Navigation task driven through a simulated slider

mod common;

use std::cell::Cell;

use common::{ShutterEvent, SimEndstops, SimShutter, SimStepper};
use timescape_core::config::SliderConfig;
use timescape_core::flags::SharedFlags;
use timescape_core::navigation::{NavState, NavigationFsm, StepTiming, HOMING_BURST_STEPS};
use timescape_core::task::Task;
use timescape_core::time::TimeValue;
use timescape_core::traits::Direction;

type SimFsm<'a> = NavigationFsm<'a, SimStepper<'a>, SimShutter<'a>, SimEndstops<'a>, SliderConfig>;

const INTERVAL: TimeValue = TimeValue::from_micros(500);

struct Rig<'a> {
    task: Task<SimFsm<'a>>,
    now: TimeValue,
    bursts: &'a Cell<u32>,
}

impl<'a> Rig<'a> {
    fn new(flags: &'a SharedFlags, bursts: &'a Cell<u32>, config: SliderConfig) -> Self {
        let fsm = NavigationFsm::new(
            SimStepper::new(flags),
            SimShutter::new(flags),
            SimEndstops::new(bursts),
            config,
            flags,
            StepTiming::AVR_16MHZ,
        );
        Self {
            task: Task::new("navigation", fsm, INTERVAL),
            now: TimeValue::ZERO,
            bursts,
        }
    }

    fn state(&self) -> NavState {
        self.task.current_state()
    }

    fn fsm(&mut self) -> &mut SimFsm<'a> {
        self.task.machine_mut()
    }

    /// One scheduler pass without any hardware completing
    fn pass(&mut self) {
        assert!(self.task.schedule(self.now));
        self.now += INTERVAL;
    }

    /// One scheduler pass, then let every pending hardware action finish
    fn pass_and_settle(&mut self) {
        self.pass();
        let fsm = self.task.machine_mut();
        if fsm.stepper().is_moving() {
            self.bursts.set(self.bursts.get() + 1);
        }
        fsm.stepper_mut().settle();
        fsm.shutter_mut().settle();
    }

    fn run_until(&mut self, target: NavState, max_passes: u32) -> u32 {
        for n in 1..=max_passes {
            self.pass_and_settle();
            if self.state() == target {
                return n;
            }
        }
        panic!("never reached {:?}, stuck in {:?}", target, self.state());
    }
}

#[test]
fn test_boot_reaches_waiting() {
    let flags = SharedFlags::new();
    let bursts = Cell::new(0);
    let mut rig = Rig::new(&flags, &bursts, SliderConfig::DEFAULT);

    assert_eq!(rig.state(), NavState::Init);
    rig.pass();
    assert_eq!(rig.state(), NavState::Waiting);
    assert!(rig.fsm().endstops_mut().configured);

    rig.pass();
    assert_eq!(rig.state(), NavState::Waiting);
    assert_eq!(rig.fsm().timer_count(), 625);
    assert!(rig.fsm().stepper().stops >= 1);
}

#[test]
fn test_waiting_prefers_left_then_right_then_start() {
    let flags = SharedFlags::new();
    let bursts = Cell::new(0);
    let mut rig = Rig::new(&flags, &bursts, SliderConfig::DEFAULT);
    rig.pass();

    flags.start_timelapse.set();
    flags.init_right.set();
    flags.init_left.set();
    rig.pass();
    assert_eq!(rig.state(), NavState::InitLeft);

    let mut rig = Rig::new(&flags, &bursts, SliderConfig::DEFAULT);
    flags.init_left.clear();
    rig.pass();
    rig.pass();
    assert_eq!(rig.state(), NavState::InitRight);

    let mut rig = Rig::new(&flags, &bursts, SliderConfig::DEFAULT);
    flags.init_right.clear();
    rig.pass();
    rig.pass();
    assert_eq!(rig.state(), NavState::StartTimelapse);
}

#[test]
fn test_home_left_issues_one_burst_per_completion() {
    const N: u32 = 7;
    let flags = SharedFlags::new();
    let bursts = Cell::new(0);
    let mut rig = Rig::new(&flags, &bursts, SliderConfig::DEFAULT);
    rig.fsm().endstops_mut().left_after = Some(N);

    rig.pass();
    flags.init_left.set();
    rig.run_until(NavState::Waiting, 1000);

    let moves = &rig.fsm().stepper().moves;
    assert_eq!(moves.len() as u32, N);
    assert!(moves
        .iter()
        .all(|&(dir, steps, speed)| dir == Direction::Forward
            && steps == HOMING_BURST_STEPS
            && speed == 625));
    assert!(!flags.init_left.is_set());
    assert!(!flags.motor_move_complete.is_set());
}

#[test]
fn test_home_waits_for_burst_completion() {
    let flags = SharedFlags::new();
    let bursts = Cell::new(0);
    let mut rig = Rig::new(&flags, &bursts, SliderConfig::DEFAULT);
    rig.pass();
    flags.init_right.set();
    rig.pass();
    assert_eq!(rig.state(), NavState::InitRight);

    // Burst issued, hardware never finishes it
    for _ in 0..10 {
        rig.pass();
    }
    assert_eq!(rig.fsm().stepper().moves.len(), 1);
    assert!(flags.in_move_motor_mode.is_set());

    // Endstop trips mid-burst
    rig.fsm().endstops_mut().right_after = Some(0);
    rig.pass();
    assert_eq!(rig.state(), NavState::Waiting);
    assert!(!flags.init_right.is_set());
    assert!(!flags.in_move_motor_mode.is_set());
    assert_eq!(rig.fsm().stepper().moves[0].0, Direction::Reverse);
}

#[test]
fn test_operator_cancels_homing() {
    let flags = SharedFlags::new();
    let bursts = Cell::new(0);
    let mut rig = Rig::new(&flags, &bursts, SliderConfig::DEFAULT);
    rig.pass();
    flags.init_left.set();
    rig.pass();
    rig.pass();
    flags.init_left.clear();
    rig.pass();
    assert_eq!(rig.state(), NavState::Waiting);
}

#[test]
fn test_cancelled_homing_does_not_skip_first_move() {
    let flags = SharedFlags::new();
    let bursts = Cell::new(0);
    let mut rig = Rig::new(&flags, &bursts, SliderConfig::DEFAULT);
    rig.pass();
    flags.init_left.set();
    rig.pass_and_settle();
    rig.pass_and_settle();
    rig.pass_and_settle();
    assert_eq!(rig.fsm().stepper().moves.len(), 2);

    flags.init_left.clear();
    rig.pass();
    assert_eq!(rig.state(), NavState::Waiting);
    assert!(!flags.motor_move_complete.is_set());

    flags.start_timelapse.set();
    rig.run_until(NavState::MotorMove, 100);
    assert_eq!(rig.fsm().shutter().pictures, 1);

    rig.pass_and_settle();
    let moves = &rig.fsm().stepper().moves;
    assert_eq!(moves.len(), 3);
    assert_eq!(moves[2].1, 12);
}

#[test]
fn test_full_sequence_completes() {
    let flags = SharedFlags::new();
    let bursts = Cell::new(0);
    let mut rig = Rig::new(&flags, &bursts, SliderConfig::DEFAULT);
    rig.pass();
    rig.pass();
    flags.start_timelapse.set();
    rig.task.set_state(NavState::StartTimelapse);

    rig.run_until(NavState::Waiting, 20_000);

    let plan = rig.fsm().plan().unwrap();
    assert_eq!(plan.total_number_of_pics, 778);
    assert!(!flags.start_timelapse.is_set());
    assert_eq!(rig.fsm().current_pic_number(), 778);
    assert_eq!(rig.fsm().shutter().pictures, 778);

    let moves = &rig.fsm().stepper().moves;
    assert_eq!(moves.len(), 778);
    assert!(moves.iter().all(|&(_, steps, speed)| steps == 12 && speed == 625));
}

#[test]
fn test_cycle_order() {
    let flags = SharedFlags::new();
    let bursts = Cell::new(0);
    let mut rig = Rig::new(&flags, &bursts, SliderConfig::DEFAULT);
    rig.pass();
    flags.start_timelapse.set();

    let mut seen = Vec::new();
    for _ in 0..12 {
        rig.pass_and_settle();
        seen.push(rig.state());
    }
    assert_eq!(
        seen,
        [
            NavState::StartTimelapse,
            NavState::TakePic,
            NavState::PicDelayWait,
            NavState::MotorDelayOrMove,
            NavState::MotorMove,
            NavState::MotorDelayOrMove,
            NavState::TakePic,
            NavState::PicDelayWait,
            NavState::MotorDelayOrMove,
            NavState::MotorMove,
            NavState::MotorDelayOrMove,
            NavState::TakePic,
        ]
    );

    let events = &rig.fsm().shutter().events;
    assert_eq!(
        &events[..6],
        &[
            ShutterEvent::Exposure(20),
            ShutterEvent::TakePic,
            ShutterEvent::PicDelay(1),
            ShutterEvent::DelayLoop,
            ShutterEvent::MotorDelay(1),
            ShutterEvent::DelayLoop,
        ]
    );
}

/// Put the task in `state` with the hardware busy, so only the abort
/// branch can fire
fn busy_in(state: NavState, flags: &SharedFlags, rig: &mut Rig<'_>) {
    match state {
        NavState::PicDelayWait => flags.in_take_pic_mode.set(),
        NavState::MotorDelayOrMove => flags.in_pic_delay_mode.set(),
        NavState::MotorMove => flags.in_motor_delay_mode.set(),
        _ => {}
    }
    rig.task.set_state(state);
}

#[test]
fn test_abort_from_every_sequence_state() {
    for state in [
        NavState::StartTimelapse,
        NavState::TakePic,
        NavState::PicDelayWait,
        NavState::MotorDelayOrMove,
        NavState::MotorMove,
    ] {
        let flags = SharedFlags::new();
        let bursts = Cell::new(0);
        let mut rig = Rig::new(&flags, &bursts, SliderConfig::DEFAULT);
        rig.pass();
        flags.start_timelapse.set();
        rig.pass();
        assert_eq!(rig.state(), NavState::StartTimelapse);

        busy_in(state, &flags, &mut rig);
        flags.start_timelapse.clear();
        rig.pass();
        assert_eq!(rig.state(), NavState::Waiting, "abort from {:?}", state);
    }
}

#[test]
fn test_abort_while_idle_passes_through_take_pic() {
    let flags = SharedFlags::new();
    let bursts = Cell::new(0);
    let mut rig = Rig::new(&flags, &bursts, SliderConfig::DEFAULT);
    rig.pass();
    flags.start_timelapse.set();
    rig.run_until(NavState::PicDelayWait, 10);

    // Exposure already over when the operator aborts
    rig.fsm().shutter_mut().settle();
    flags.start_timelapse.clear();
    // Pic delay, motor delay and the move still run before the abort lands
    let passes = rig.run_until(NavState::Waiting, 10);
    assert_eq!(passes, 5);
    assert_eq!(rig.fsm().current_pic_number(), 1);
}

#[test]
fn test_impossible_plan_is_rejected() {
    let flags = SharedFlags::new();
    let bursts = Cell::new(0);
    let config = SliderConfig {
        timelapse_period_min: 1,
        ..SliderConfig::DEFAULT
    };
    let mut rig = Rig::new(&flags, &bursts, config);
    rig.pass();
    flags.start_timelapse.set();
    rig.pass();
    rig.pass();

    assert_eq!(rig.state(), NavState::Waiting);
    assert!(!flags.start_timelapse.is_set());
    assert!(rig.fsm().plan().is_none());
    assert_eq!(rig.fsm().shutter().pictures, 0);
}

#[test]
fn test_second_run_after_completion_ends_immediately() {
    let flags = SharedFlags::new();
    let bursts = Cell::new(0);
    let config = SliderConfig {
        // 10 min: 600 - 98 = 502 s, 502 / 23 = 21 pictures
        timelapse_period_min: 10,
        ..SliderConfig::DEFAULT
    };
    let mut rig = Rig::new(&flags, &bursts, config);
    rig.pass();
    flags.start_timelapse.set();
    rig.run_until(NavState::Waiting, 5_000);
    assert_eq!(rig.fsm().current_pic_number(), 21);

    flags.start_timelapse.set();
    rig.run_until(NavState::Waiting, 10);
    assert_eq!(rig.fsm().shutter().pictures, 21);
    assert!(!flags.start_timelapse.is_set());
}
