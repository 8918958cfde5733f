//! Ordering and scheduling across the 32-bit tick rollover

use proptest::prelude::*;

use timescape_core::task::{StateMachine, Task, Transition};
use timescape_core::time::TimeValue;

const HALF_RANGE: u64 = 1 << 31;

/// Base instants clustered around the rollover
fn near_rollover() -> impl Strategy<Value = u32> {
    prop_oneof![
        (u32::MAX - 10_000)..=u32::MAX,
        0u32..10_000,
        any::<u32>(),
    ]
}

struct Tick(u32);

impl StateMachine for Tick {
    type State = ();

    fn initial_state(&self) {}

    fn run(&mut self, _state: (), _now: TimeValue) -> Transition<()> {
        self.0 += 1;
        Transition::Stay
    }
}

proptest! {
    #[test]
    fn ordering_matches_unwrapped_comparison(
        base in near_rollover(),
        sep in 0u64..HALF_RANGE,
        forward in any::<bool>(),
    ) {
        // Unwrapped instants
        let a_true = base as u64 + HALF_RANGE;
        let b_true = if forward { a_true + sep } else { a_true - sep };

        let a = TimeValue::from_ticks(a_true as u32);
        let b = TimeValue::from_ticks(b_true as u32);

        prop_assert_eq!(b.is_at_or_after(a), b_true >= a_true);
        prop_assert_eq!(a.is_at_or_after(b), a_true >= b_true);
    }

    #[test]
    fn add_then_subtract_is_identity(base in any::<u32>(), delta in any::<u32>()) {
        let t = TimeValue::from_ticks(base);
        let d = TimeValue::from_ticks(delta);
        prop_assert_eq!((t + d) - d, t);
    }

    #[test]
    fn seconds_and_micros_decompose(seconds in 0u32..2147, micros in 0u32..1_000_000) {
        let t = TimeValue::from_secs_micros(seconds, micros);
        prop_assert_eq!(t.seconds(), seconds);
        prop_assert_eq!(t.micros(), micros);
    }

    #[test]
    fn task_waits_exactly_one_interval(
        start in near_rollover(),
        interval in 1u32..1_000_000,
        probe in 0u32..1_000_000,
    ) {
        let mut task = Task::new("tick", Tick(0), TimeValue::from_ticks(interval));
        let t0 = TimeValue::from_ticks(start);
        task.set_next_run_time(t0);
        prop_assert!(task.schedule(t0));

        let due = t0 + TimeValue::from_ticks(interval);
        let early = probe % interval;
        prop_assert!(!task.schedule(t0 + TimeValue::from_ticks(early)));
        prop_assert!(task.schedule(due));
        prop_assert_eq!(task.machine().0, 2);
    }
}
