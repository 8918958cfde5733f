//! Operator input

/// Analog input of the button resistor ladder
pub trait ButtonAdc {
    /// Sample the ladder, `None` if the conversion failed
    fn read(&mut self) -> Option<u16>;
}
