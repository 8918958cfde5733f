//! Configuration shared between tasks

use core::cell::Cell;

use critical_section::Mutex;

use super::SliderConfig;

/// Read access to the slider settings
///
/// Getters widen every setting to `u32` for the derived-parameter
/// arithmetic.
pub trait ConfigSource {
    /// Consistent copy of every setting
    fn snapshot(&self) -> SliderConfig;

    fn motor_rpm(&self) -> u32 {
        self.snapshot().motor_rpm as u32
    }

    fn steps_per_rev(&self) -> u32 {
        self.snapshot().steps_per_rev as u32
    }

    fn track_length(&self) -> u32 {
        self.snapshot().track_length_mm as u32
    }

    fn pitch(&self) -> u32 {
        self.snapshot().pitch_um as u32
    }

    fn teeth(&self) -> u32 {
        self.snapshot().teeth as u32
    }

    fn shutter_speed(&self) -> u32 {
        self.snapshot().shutter_speed_s as u32
    }

    fn pic_delay(&self) -> u32 {
        self.snapshot().pic_delay_s as u32
    }

    fn motor_delay(&self) -> u32 {
        self.snapshot().motor_delay_s as u32
    }

    fn timelapse_period(&self) -> u32 {
        self.snapshot().timelapse_period_min as u32
    }
}

impl ConfigSource for SliderConfig {
    fn snapshot(&self) -> SliderConfig {
        *self
    }
}

/// Settings cell written by the menu task and read by the navigation task
pub struct SharedConfig(Mutex<Cell<SliderConfig>>);

impl SharedConfig {
    pub const fn new(config: SliderConfig) -> Self {
        Self(Mutex::new(Cell::new(config)))
    }

    pub fn get(&self) -> SliderConfig {
        critical_section::with(|cs| self.0.borrow(cs).get())
    }

    pub fn set(&self, config: SliderConfig) {
        critical_section::with(|cs| self.0.borrow(cs).set(config));
    }
}

impl ConfigSource for &SharedConfig {
    fn snapshot(&self) -> SliderConfig {
        self.get()
    }
}
