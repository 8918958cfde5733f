//! Time-lapse navigation
//!
//! The task that homes the carriage and runs a time-lapse: expose, wait,
//! move, repeat, until the planned number of pictures is taken or the
//! operator clears `start_timelapse`.

mod fsm;
mod params;
mod state;

pub use fsm::{NavigationFsm, HOMING_BURST_STEPS};
pub use params::{PlanError, StepTiming, TimelapsePlan};
pub use state::NavState;
