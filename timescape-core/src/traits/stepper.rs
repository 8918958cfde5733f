//! Carriage stepper trait

/// Carriage travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Direction line high, toward the left endstop
    Forward,
    /// Direction line low, toward the right endstop
    Reverse,
}

impl Direction {
    /// Level to drive on the direction line
    pub fn is_high(self) -> bool {
        matches!(self, Direction::Forward)
    }
}

/// Step/direction motor driver
pub trait SliderStepper {
    /// Halt pulse output immediately
    fn stop(&mut self);

    /// Start a move of `steps` pulses
    ///
    /// `speed` is the pulse timer period in timer counts (see
    /// [`StepTiming`](crate::navigation::StepTiming)). The driver sets
    /// `motor_move_complete` and clears `in_move_motor_mode` once the last
    /// pulse has gone out.
    fn step(&mut self, direction: Direction, steps: u32, speed: u16);
}
