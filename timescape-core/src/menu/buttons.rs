//! Button ladder and the button polling task
//!
//! After each press the task parks in [`ButtonState::Debounce`] until
//! [`DEBOUNCE`] has elapsed instead of spinning, so the navigation task
//! keeps running while the contacts settle.

use crate::task::{StateMachine, Transition};
use crate::time::TimeValue;
use crate::traits::ButtonAdc;

/// Settling time after a press
pub const DEBOUNCE: TimeValue = TimeValue::from_millis(300);

/// Repeat count above which edits move by 100
pub const PRESS_COUNT_MAX: u8 = 20;

/// Front panel button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Right,
    Up,
    Down,
    Left,
    Select,
}

impl Button {
    /// Upper ADC bound of each button, lowest first
    const LADDER: [(u16, Button); 5] = [
        (50, Button::Right),
        (250, Button::Up),
        (350, Button::Down),
        (550, Button::Left),
        (850, Button::Select),
    ];

    /// Decode a ladder reading, `None` when nothing is pressed
    pub fn from_adc(reading: u16) -> Option<Button> {
        Self::LADDER
            .iter()
            .find(|(bound, _)| reading < *bound)
            .map(|&(_, button)| button)
    }
}

/// Counts consecutive samples that saw the same button
#[derive(Debug, Clone, Copy, Default)]
pub struct PressTracker {
    previous: Option<Button>,
    count: u8,
}

impl PressTracker {
    pub const fn new() -> Self {
        Self {
            previous: None,
            count: 0,
        }
    }

    /// Record a sample and return the repeat count
    pub fn sample(&mut self, button: Option<Button>) -> u8 {
        if button == self.previous {
            if self.count <= PRESS_COUNT_MAX {
                self.count += 1;
            }
        } else {
            self.count = 0;
        }
        self.previous = button;
        self.count
    }

    pub fn count(&self) -> u8 {
        self.count
    }
}

/// Receiver of button presses
pub trait MenuInput {
    /// Called once when the button task starts
    fn start(&mut self);

    /// Handle one debounced press; `press_count` grows while it is held
    fn on_button(&mut self, button: Button, press_count: u8);
}

/// Button task state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    Init,
    Poll,
    Debounce,
}

/// Polls the ladder and feeds presses to a [`MenuInput`]
pub struct ButtonTask<A, H> {
    adc: A,
    handler: H,
    tracker: PressTracker,
    debounce_until: TimeValue,
}

impl<A: ButtonAdc, H: MenuInput> ButtonTask<A, H> {
    pub fn new(adc: A, handler: H) -> Self {
        Self {
            adc,
            handler,
            tracker: PressTracker::new(),
            debounce_until: TimeValue::ZERO,
        }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn adc_mut(&mut self) -> &mut A {
        &mut self.adc
    }
}

impl<A: ButtonAdc, H: MenuInput> StateMachine for ButtonTask<A, H> {
    type State = ButtonState;

    fn initial_state(&self) -> ButtonState {
        ButtonState::Init
    }

    fn run(&mut self, state: ButtonState, now: TimeValue) -> Transition<ButtonState> {
        match state {
            ButtonState::Init => {
                self.handler.start();
                Transition::GoTo(ButtonState::Poll)
            }
            ButtonState::Poll => {
                let button = self.adc.read().and_then(Button::from_adc);
                let count = self.tracker.sample(button);
                match button {
                    Some(button) => {
                        log_debug!("button {:?} x{}", button, count);
                        self.handler.on_button(button, count);
                        self.debounce_until = now + DEBOUNCE;
                        Transition::GoTo(ButtonState::Debounce)
                    }
                    None => Transition::Stay,
                }
            }
            ButtonState::Debounce => {
                if now.is_at_or_after(self.debounce_until) {
                    Transition::GoTo(ButtonState::Poll)
                } else {
                    Transition::Stay
                }
            }
        }
    }
}
