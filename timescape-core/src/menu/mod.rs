//! Operator interface
//!
//! Five buttons on a resistor ladder drive a two-level menu. The menu
//! edits [`SliderConfig`](crate::config::SliderConfig) and raises the
//! operator flags the navigation task watches. Rendering is left to
//! whoever consumes [`MenuView`].

mod buttons;
mod controller;
mod tree;

pub use buttons::{
    Button, ButtonState, ButtonTask, MenuInput, PressTracker, DEBOUNCE, PRESS_COUNT_MAX,
};
pub use controller::{Line, Marker, Menu, MenuView, LINE_WIDTH};
pub use tree::MenuItem;
