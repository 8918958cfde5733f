//! Round-robin scheduler over a fixed task list

use super::{StateMachine, Task};
use crate::time::{TimeSource, TimeValue};

/// Anything the scheduler can poll
pub trait Schedulable {
    /// Run if due, returning true if the task ran
    fn schedule(&mut self, now: TimeValue) -> bool;
}

impl<M: StateMachine> Schedulable for Task<M> {
    fn schedule(&mut self, now: TimeValue) -> bool {
        Task::schedule(self, now)
    }
}

/// A fixed, ordered set of tasks
///
/// Implemented for tuples so the task list is built once and dispatched
/// statically.
pub trait TaskSet {
    /// Schedule every task once, in order, each with a fresh "now"
    fn schedule_each<T: TimeSource>(&mut self, clock: &T) -> usize;
}

macro_rules! impl_task_set {
    ($($task:ident : $idx:tt),+) => {
        impl<$($task: Schedulable),+> TaskSet for ($($task,)+) {
            fn schedule_each<T: TimeSource>(&mut self, clock: &T) -> usize {
                let mut ran = 0;
                $(
                    if self.$idx.schedule(clock.now()) {
                        ran += 1;
                    }
                )+
                ran
            }
        }
    };
}

impl_task_set!(A: 0);
impl_task_set!(A: 0, B: 1);
impl_task_set!(A: 0, B: 1, C: 2);
impl_task_set!(A: 0, B: 1, C: 2, D: 3);

/// Polls its task set forever
pub struct Scheduler<T: TimeSource, S: TaskSet> {
    clock: T,
    tasks: S,
    passes: u32,
}

impl<T: TimeSource, S: TaskSet> Scheduler<T, S> {
    pub fn new(clock: T, tasks: S) -> Self {
        Self {
            clock,
            tasks,
            passes: 0,
        }
    }

    /// One pass over every task, returning how many ran
    pub fn run_pass(&mut self) -> usize {
        self.passes = self.passes.wrapping_add(1);
        self.tasks.schedule_each(&self.clock)
    }

    /// Main loop
    pub fn run(&mut self) -> ! {
        log_info!("scheduler started");
        loop {
            self.run_pass();
        }
    }

    pub fn passes(&self) -> u32 {
        self.passes
    }

    pub fn clock(&self) -> &T {
        &self.clock
    }

    pub fn tasks(&self) -> &S {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut S {
        &mut self.tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Transition;
    use core::cell::Cell;

    struct ManualClock(Cell<u32>);

    impl TimeSource for ManualClock {
        fn now(&self) -> TimeValue {
            TimeValue::from_ticks(self.0.get())
        }
    }

    struct Counter {
        runs: u32,
        asap_once: bool,
    }

    impl StateMachine for Counter {
        type State = ();

        fn initial_state(&self) {}

        fn run(&mut self, _state: (), _now: TimeValue) -> Transition<()> {
            self.runs += 1;
            if core::mem::take(&mut self.asap_once) {
                Transition::AgainAsap(())
            } else {
                Transition::Stay
            }
        }
    }

    fn counter(interval: u32, asap_once: bool) -> Task<Counter> {
        Task::new(
            "counter",
            Counter {
                runs: 0,
                asap_once,
            },
            TimeValue::from_ticks(interval),
        )
    }

    #[test]
    fn test_pass_visits_tasks_in_order() {
        let clock = ManualClock(Cell::new(0));
        let mut sched = Scheduler::new(clock, (counter(10, false), counter(20, false)));

        assert_eq!(sched.run_pass(), 2);
        assert_eq!(sched.run_pass(), 0);

        sched.clock().0.set(10);
        assert_eq!(sched.run_pass(), 1);
        sched.clock().0.set(20);
        assert_eq!(sched.run_pass(), 2);

        let (fast, slow) = sched.tasks();
        assert_eq!(fast.machine().runs, 3);
        assert_eq!(slow.machine().runs, 2);
        assert_eq!(sched.passes(), 4);
    }

    #[test]
    fn test_asap_task_runs_on_next_pass() {
        let clock = ManualClock(Cell::new(0));
        let mut sched = Scheduler::new(clock, (counter(1000, true),));

        assert_eq!(sched.run_pass(), 1);
        assert_eq!(sched.run_pass(), 1);
        assert_eq!(sched.run_pass(), 0);
        assert_eq!(sched.tasks().0.machine().runs, 2);
    }

    #[test]
    fn test_suspended_task_is_skipped() {
        let clock = ManualClock(Cell::new(0));
        let mut sched = Scheduler::new(clock, (counter(10, false), counter(10, false)));
        sched.tasks_mut().0.suspend();

        assert_eq!(sched.run_pass(), 1);
        assert_eq!(sched.tasks().0.machine().runs, 0);
    }
}
