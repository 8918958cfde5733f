//! Task state machine interface

use crate::time::TimeValue;

/// Result of one state machine step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition<S> {
    /// Keep the current state and wait for the next interval
    Stay,
    /// Switch state and wait for the next interval
    GoTo(S),
    /// Switch state (possibly to the same one) and run again on the next
    /// scheduler pass, ignoring the interval
    AgainAsap(S),
}

/// User-defined sequencing logic of a task
///
/// `run` is invoked by the owning [`Task`](super::Task) and must return
/// without blocking. Collaborators (hardware, shared flags, configuration)
/// live inside the implementing type.
pub trait StateMachine {
    type State: Copy + PartialEq + core::fmt::Debug;

    /// State the task starts in
    fn initial_state(&self) -> Self::State;

    /// Execute one step from `state`
    fn run(&mut self, state: Self::State, now: TimeValue) -> Transition<Self::State>;
}
