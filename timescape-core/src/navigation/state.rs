//! Navigation states

/// Navigation task state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NavState {
    /// Set up endstop inputs and forget any previous plan
    Init,
    /// Idle, motor stopped, watching the operator flags
    Waiting,
    /// Homing toward the left endstop
    InitLeft,
    /// Homing toward the right endstop
    InitRight,
    /// Derive the plan and start the picture loop
    StartTimelapse,
    /// Open the shutter
    TakePic,
    /// Exposure running, start the pic delay once it ends
    PicDelayWait,
    /// Choose between the next picture and the next move
    MotorDelayOrMove,
    /// Move once the motor delay has run out
    MotorMove,
}

impl NavState {
    /// Numeric state code, as shown in logs
    pub const fn index(self) -> u8 {
        match self {
            NavState::Init => 0,
            NavState::Waiting => 1,
            NavState::InitLeft => 2,
            NavState::InitRight => 3,
            NavState::StartTimelapse => 4,
            NavState::TakePic => 5,
            NavState::PicDelayWait => 6,
            NavState::MotorDelayOrMove => 7,
            NavState::MotorMove => 8,
        }
    }
}
