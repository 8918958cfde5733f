//! Cooperative tasks
//!
//! A [`Task`] wraps a [`StateMachine`] with the scheduling bookkeeping:
//! interval, next run time and operational state. The [`Scheduler`] polls a
//! fixed tuple of tasks forever, in order, each `run` going to completion
//! before the next task is looked at.

mod machine;
mod runner;
mod scheduler;

pub use machine::{StateMachine, Transition};
pub use runner::{OpState, Task};
pub use scheduler::{Schedulable, Scheduler, TaskSet};
