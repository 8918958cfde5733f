//! Configuration type definitions

use serde::{Deserialize, Serialize};

/// Operator settings for the slider and camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SliderConfig {
    /// Motor speed during moves
    pub motor_rpm: u8,
    /// Full steps per motor revolution
    pub steps_per_rev: u16,
    /// Usable track length in millimetres
    pub track_length_mm: u16,
    /// Belt pitch in micrometres
    pub pitch_um: u16,
    /// Teeth on the drive pulley
    pub teeth: u8,
    /// Exposure time in seconds
    pub shutter_speed_s: u8,
    /// Pause after each exposure in seconds
    pub pic_delay_s: u8,
    /// Pause around each move in seconds
    pub motor_delay_s: u8,
    /// Total time-lapse duration in minutes
    pub timelapse_period_min: u16,
}

impl SliderConfig {
    /// Factory settings: 1.8 m track, MXL belt on an 18 tooth pulley
    pub const DEFAULT: Self = Self {
        motor_rpm: 30,
        steps_per_rev: 200,
        track_length_mm: 1800,
        pitch_um: 2032,
        teeth: 18,
        shutter_speed_s: 20,
        pic_delay_s: 1,
        motor_delay_s: 1,
        timelapse_period_min: 300,
    };

    /// Check every field against its [`ParamLimits`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        for param in Param::ALL {
            if !param.limits().contains(param.get(self)) {
                return Err(ConfigError::OutOfRange(param));
            }
        }
        Ok(())
    }
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Inclusive range of an editable setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParamLimits {
    pub min: u32,
    pub max: u32,
}

impl ParamLimits {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn clamp(&self, value: u32) -> u32 {
        value.clamp(self.min, self.max)
    }
}

/// One editable setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Param {
    MotorRpm,
    StepsPerRev,
    TrackLength,
    Pitch,
    Teeth,
    ShutterSpeed,
    PicDelay,
    MotorDelay,
    TimelapsePeriod,
}

impl Param {
    pub const ALL: [Param; 9] = [
        Param::MotorRpm,
        Param::StepsPerRev,
        Param::TrackLength,
        Param::Pitch,
        Param::Teeth,
        Param::ShutterSpeed,
        Param::PicDelay,
        Param::MotorDelay,
        Param::TimelapsePeriod,
    ];

    pub const fn limits(self) -> ParamLimits {
        match self {
            Param::MotorRpm => ParamLimits::new(7, 200),
            Param::StepsPerRev => ParamLimits::new(1, 65535),
            Param::TrackLength => ParamLimits::new(10, 7000),
            Param::Pitch => ParamLimits::new(1, 65535),
            Param::Teeth => ParamLimits::new(1, 255),
            Param::ShutterSpeed => ParamLimits::new(1, 255),
            Param::PicDelay => ParamLimits::new(0, 255),
            Param::MotorDelay => ParamLimits::new(0, 255),
            Param::TimelapsePeriod => ParamLimits::new(0, 65535),
        }
    }

    /// Menu label
    pub const fn label(self) -> &'static str {
        match self {
            Param::MotorRpm => "Motor RPM",
            Param::StepsPerRev => "Mot. Steps/Rev",
            Param::TrackLength => "Track (mm)",
            Param::Pitch => "Pitch (um)",
            Param::Teeth => "Teeth",
            Param::ShutterSpeed => "Shutter (s)",
            Param::PicDelay => "Pic Delay(s)",
            Param::MotorDelay => "Motor Delay(s)",
            Param::TimelapsePeriod => "Timelapse(min)",
        }
    }

    pub fn get(self, config: &SliderConfig) -> u32 {
        match self {
            Param::MotorRpm => config.motor_rpm as u32,
            Param::StepsPerRev => config.steps_per_rev as u32,
            Param::TrackLength => config.track_length_mm as u32,
            Param::Pitch => config.pitch_um as u32,
            Param::Teeth => config.teeth as u32,
            Param::ShutterSpeed => config.shutter_speed_s as u32,
            Param::PicDelay => config.pic_delay_s as u32,
            Param::MotorDelay => config.motor_delay_s as u32,
            Param::TimelapsePeriod => config.timelapse_period_min as u32,
        }
    }

    /// Store `value`, clamped to this setting's limits
    pub fn set(self, config: &mut SliderConfig, value: u32) {
        let value = self.limits().clamp(value);
        match self {
            Param::MotorRpm => config.motor_rpm = value as u8,
            Param::StepsPerRev => config.steps_per_rev = value as u16,
            Param::TrackLength => config.track_length_mm = value as u16,
            Param::Pitch => config.pitch_um = value as u16,
            Param::Teeth => config.teeth = value as u8,
            Param::ShutterSpeed => config.shutter_speed_s = value as u8,
            Param::PicDelay => config.pic_delay_s = value as u8,
            Param::MotorDelay => config.motor_delay_s = value as u8,
            Param::TimelapsePeriod => config.timelapse_period_min = value as u16,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A setting is outside its limits
    OutOfRange(Param),
    /// Record header is neither blank nor ours
    BadMarker,
    /// Record was written by a different layout version
    VersionMismatch,
    /// Serialization failed
    Serialize,
    /// Deserialization failed
    Deserialize,
    /// Backing storage failed
    Storage,
}
