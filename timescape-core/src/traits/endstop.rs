//! Track end sensors

pub trait Endstops {
    /// Prepare the sensor inputs
    fn configure(&mut self);

    /// Carriage is at the left end
    fn left_triggered(&mut self) -> bool;

    /// Carriage is at the right end
    fn right_triggered(&mut self) -> bool;
}
