//! Task scheduling contract

use portable_atomic::{AtomicU16, Ordering};

use super::{StateMachine, Transition};
use crate::time::TimeValue;

/// Process-wide serial number source, never reused
static NEXT_SERIAL: AtomicU16 = AtomicU16::new(0);

/// Scheduler-visible task status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OpState {
    /// Due once `next_run_time` is reached
    Waiting,
    /// Inside `run`
    Running,
    /// Due on the next pass regardless of time
    Pending,
    /// Reserved, no task ever enters it
    Blocked,
    /// Skipped until resumed
    Suspended,
}

/// A cooperatively scheduled task
pub struct Task<M: StateMachine> {
    serial: u16,
    name: &'static str,
    interval: TimeValue,
    next_run_time: TimeValue,
    op_state: OpState,
    saved_op_state: OpState,
    state: M::State,
    machine: M,
}

impl<M: StateMachine> Task<M> {
    /// Create a task that is due immediately at time zero
    pub fn new(name: &'static str, machine: M, interval: TimeValue) -> Self {
        let serial = NEXT_SERIAL.fetch_add(1, Ordering::Relaxed);
        Self {
            serial,
            name,
            interval,
            next_run_time: TimeValue::ZERO,
            op_state: OpState::Waiting,
            saved_op_state: OpState::Waiting,
            state: machine.initial_state(),
            machine,
        }
    }

    /// Run the task if it is due
    ///
    /// Returns true if `run` was invoked. The next run time advances by
    /// one interval from the previous one, not from `now`, so a late pass
    /// does not accumulate drift.
    pub fn schedule(&mut self, now: TimeValue) -> bool {
        match self.op_state {
            OpState::Suspended | OpState::Blocked => return false,
            OpState::Running => self.error_stop("scheduled while already running"),
            OpState::Waiting if !now.is_at_or_after(self.next_run_time) => return false,
            OpState::Waiting | OpState::Pending => {}
        }

        self.op_state = OpState::Running;
        let transition = self.machine.run(self.state, now);
        self.next_run_time += self.interval;

        match transition {
            Transition::Stay => {}
            Transition::GoTo(next) => self.state = next,
            Transition::AgainAsap(next) => {
                self.state = next;
                self.op_state = OpState::Pending;
            }
        }

        if self.op_state == OpState::Running {
            self.op_state = OpState::Waiting;
        }
        true
    }

    /// Make the task due on the next scheduler pass
    pub fn run_again_asap(&mut self) {
        if self.op_state != OpState::Suspended {
            self.op_state = OpState::Pending;
        }
    }

    /// True if the task will run on the next pass regardless of time
    pub fn ready(&self) -> bool {
        matches!(self.op_state, OpState::Pending | OpState::Running)
    }

    /// Stop scheduling the task, remembering its operational state
    pub fn suspend(&mut self) {
        if self.op_state != OpState::Suspended {
            self.saved_op_state = self.op_state;
            self.op_state = OpState::Suspended;
        }
    }

    /// Restore the operational state saved by [`suspend`](Self::suspend)
    ///
    /// The next run time is left alone, so an overdue task runs on the
    /// next pass.
    pub fn resume(&mut self) {
        if self.op_state == OpState::Suspended {
            self.op_state = self.saved_op_state;
        }
    }

    /// Halt on an invariant violation
    pub fn error_stop(&self, message: &str) -> ! {
        log_error!("task {} ({}) error stop: {}", self.serial, self.name, message);
        panic!("{}: {}", self.name, message)
    }

    pub fn serial_number(&self) -> u16 {
        self.serial
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn interval(&self) -> TimeValue {
        self.interval
    }

    pub fn set_interval(&mut self, interval: TimeValue) {
        self.interval = interval;
    }

    pub fn next_run_time(&self) -> TimeValue {
        self.next_run_time
    }

    pub fn set_next_run_time(&mut self, at: TimeValue) {
        self.next_run_time = at;
    }

    pub fn op_state(&self) -> OpState {
        self.op_state
    }

    pub fn current_state(&self) -> M::State {
        self.state
    }

    /// Force the user state, for start-up wiring and tests
    pub fn set_state(&mut self, state: M::State) {
        self.state = state;
    }

    pub fn machine(&self) -> &M {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut M {
        &mut self.machine
    }
}
