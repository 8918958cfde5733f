//! Flags shared between the main loop and interrupt handlers
//!
//! Each flag has one writer context at any time, which is what makes plain
//! atomic loads and stores enough. Ownership per flag:
//!
//! | Flag | Set by | Cleared by |
//! |---|---|---|
//! | `init_left`, `init_right`, `start_timelapse` | menu task | menu task, navigation task |
//! | `in_take_pic_mode` | navigation task | shutter countdown interrupt |
//! | `in_pic_delay_mode` | navigation task | shutter countdown interrupt |
//! | `in_motor_delay_mode` | navigation task | shutter countdown interrupt |
//! | `in_move_motor_mode` | navigation task | step pulse interrupt |
//! | `motor_move_complete` | step pulse interrupt | navigation task |
//!
//! The menu and navigation tasks never run at the same time, so the two
//! main-loop writers of the operator flags do not race.

use portable_atomic::{AtomicBool, Ordering};

/// One shared boolean
pub struct Flag(AtomicBool);

impl Flag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn store(&self, value: bool) {
        self.0.store(value, Ordering::Release);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for Flag {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Flag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Flag").field(&self.is_set()).finish()
    }
}

/// Every flag the slider tasks and interrupt handlers exchange
#[derive(Debug, Default)]
pub struct SharedFlags {
    /// Operator asked to home against the left endstop
    pub init_left: Flag,
    /// Operator asked to home against the right endstop
    pub init_right: Flag,
    /// Operator started a time-lapse (cleared to abort)
    pub start_timelapse: Flag,
    /// Shutter is open for an exposure
    pub in_take_pic_mode: Flag,
    /// Waiting out the delay after an exposure
    pub in_pic_delay_mode: Flag,
    /// Waiting out the delay before a move
    pub in_motor_delay_mode: Flag,
    /// Carriage is moving
    pub in_move_motor_mode: Flag,
    /// Last commanded move finished
    pub motor_move_complete: Flag,
}

impl SharedFlags {
    pub const fn new() -> Self {
        Self {
            init_left: Flag::new(),
            init_right: Flag::new(),
            start_timelapse: Flag::new(),
            in_take_pic_mode: Flag::new(),
            in_pic_delay_mode: Flag::new(),
            in_motor_delay_mode: Flag::new(),
            in_move_motor_mode: Flag::new(),
            motor_move_complete: Flag::new(),
        }
    }
}
