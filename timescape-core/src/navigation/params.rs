//! Derived time-lapse parameters
//!
//! Geometry: one motor revolution moves the carriage `pitch × teeth`
//! micrometres, so a track of `L` millimetres takes
//! `L × 1000 / (pitch × teeth)` revolutions. All divisions truncate.

use crate::config::SliderConfig;

/// Step pulse timer characteristics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepTiming {
    /// Timer input clock
    pub clock_hz: u32,
    /// Timer prescaler
    pub prescaler: u32,
}

impl StepTiming {
    /// 16 MHz clock with a /256 prescaler
    pub const AVR_16MHZ: Self = Self {
        clock_hz: 16_000_000,
        prescaler: 256,
    };

    /// Timer period, in timer counts, for one step at `rpm`
    ///
    /// Saturates at `u16::MAX`; returns 0 if any factor is zero.
    pub fn timer_count(&self, rpm: u32, steps_per_rev: u32) -> u16 {
        let denominator = self.prescaler as u64 * rpm as u64 * steps_per_rev as u64;
        (self.clock_hz as u64 * 60)
            .checked_div(denominator)
            .map(|count| count.min(u16::MAX as u64) as u16)
            .unwrap_or(0)
    }
}

impl Default for StepTiming {
    fn default() -> Self {
        Self::AVR_16MHZ
    }
}

/// Reasons a configuration cannot produce a time-lapse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlanError {
    /// Pitch or teeth is zero
    ZeroGeometry,
    /// Motor speed is zero
    ZeroMotorSpeed,
    /// Exposure plus delays add up to zero seconds
    ZeroCycle,
    /// Travel alone takes the whole period, or no full cycle fits
    NoTimeForPictures,
    /// Step count does not fit in 32 bits
    Overflow,
}

/// Everything the picture loop needs, derived once per run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimelapsePlan {
    /// Motor revolutions over the whole track
    pub number_of_revs: u32,
    /// Motor steps over the whole track
    pub total_steps: u32,
    /// Seconds spent moving over the whole track
    pub total_travel_time: u32,
    /// Pictures that fit in the period
    pub total_number_of_pics: u32,
    /// Steps moved between two pictures
    pub steps_per_pic: u32,
}

impl TimelapsePlan {
    pub fn derive(config: &SliderConfig) -> Result<Self, PlanError> {
        let track = config.track_length_mm as u64;
        let geometry = config.pitch_um as u64 * config.teeth as u64;
        if geometry == 0 {
            return Err(PlanError::ZeroGeometry);
        }
        let rpm = config.motor_rpm as u64;
        if rpm == 0 {
            return Err(PlanError::ZeroMotorSpeed);
        }

        let number_of_revs = track * 1000 / geometry;
        let total_steps = track * config.steps_per_rev as u64 * 1000 / geometry;
        let total_travel_time = track * 60 * 1000 / (geometry * rpm);

        let period_s = config.timelapse_period_min as u64 * 60;
        let capture_budget = period_s
            .checked_sub(total_travel_time)
            .ok_or(PlanError::NoTimeForPictures)?;
        let cycle = config.shutter_speed_s as u64
            + config.pic_delay_s as u64
            + 2 * config.motor_delay_s as u64;
        if cycle == 0 {
            return Err(PlanError::ZeroCycle);
        }

        let total_number_of_pics = capture_budget / cycle;
        if total_number_of_pics == 0 {
            return Err(PlanError::NoTimeForPictures);
        }
        let steps_per_pic = total_steps / total_number_of_pics;

        let narrow = |value: u64| u32::try_from(value).map_err(|_| PlanError::Overflow);
        Ok(Self {
            number_of_revs: narrow(number_of_revs)?,
            total_steps: narrow(total_steps)?,
            total_travel_time: narrow(total_travel_time)?,
            total_number_of_pics: narrow(total_number_of_pics)?,
            steps_per_pic: narrow(steps_per_pic)?,
        })
    }
}
