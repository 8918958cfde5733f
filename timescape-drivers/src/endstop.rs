//! Endstop switches on GPIO inputs

use embedded_hal::digital::InputPin;
use timescape_core::traits::Endstops;
use timescape_core::{log_info, log_warn};

/// Left and right endstops, active high
///
/// A pin that cannot be read counts as triggered so a homing run stops.
pub struct PinEndstops<L, R> {
    left: L,
    right: R,
}

impl<L: InputPin, R: InputPin> PinEndstops<L, R> {
    pub fn new(left: L, right: R) -> Self {
        Self { left, right }
    }
}

fn triggered<P: InputPin>(pin: &mut P) -> bool {
    pin.is_high().unwrap_or_else(|_| {
        log_warn!("endstop read failed");
        true
    })
}

impl<L: InputPin, R: InputPin> Endstops for PinEndstops<L, R> {
    fn configure(&mut self) {
        let left = triggered(&mut self.left);
        let right = triggered(&mut self.right);
        log_info!("endstops left={} right={}", left, right);
    }

    fn left_triggered(&mut self) -> bool {
        triggered(&mut self.left)
    }

    fn right_triggered(&mut self) -> bool {
        triggered(&mut self.right)
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;
    use crate::mock::MockInput;

    #[test]
    fn test_active_high() {
        let left = Cell::new(Some(false));
        let right = Cell::new(Some(true));
        let mut endstops = PinEndstops::new(MockInput(&left), MockInput(&right));
        endstops.configure();

        assert!(!endstops.left_triggered());
        assert!(endstops.right_triggered());

        left.set(Some(true));
        assert!(endstops.left_triggered());
    }

    #[test]
    fn test_read_failure_counts_as_triggered() {
        let left = Cell::new(None);
        let right = Cell::new(Some(false));
        let mut endstops = PinEndstops::new(MockInput(&left), MockInput(&right));

        assert!(endstops.left_triggered());
        assert!(!endstops.right_triggered());
    }
}
