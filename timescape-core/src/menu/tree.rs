//! Menu layout
//!
//! ```text
//! Preferences      Motor RPM, Mot. Steps/Rev, Track (mm), Pitch (um), Teeth
//! Camera Settings  Shutter (s), Pic Delay(s), Motor Delay(s), Timelapse(min)
//! Initialize       Init Right, Init Left
//! Start TL
//! ```
//!
//! Siblings wrap around in both directions.

use crate::config::Param;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuItem {
    Preferences,
    CameraSettings,
    Initialize,
    StartTimelapse,
    Setting(Param),
    InitRight,
    InitLeft,
}

const TOP: [MenuItem; 4] = [
    MenuItem::Preferences,
    MenuItem::CameraSettings,
    MenuItem::Initialize,
    MenuItem::StartTimelapse,
];

const PREFERENCES: [MenuItem; 5] = [
    MenuItem::Setting(Param::MotorRpm),
    MenuItem::Setting(Param::StepsPerRev),
    MenuItem::Setting(Param::TrackLength),
    MenuItem::Setting(Param::Pitch),
    MenuItem::Setting(Param::Teeth),
];

const CAMERA: [MenuItem; 4] = [
    MenuItem::Setting(Param::ShutterSpeed),
    MenuItem::Setting(Param::PicDelay),
    MenuItem::Setting(Param::MotorDelay),
    MenuItem::Setting(Param::TimelapsePeriod),
];

const INITIALIZE: [MenuItem; 2] = [MenuItem::InitRight, MenuItem::InitLeft];

impl MenuItem {
    pub const ROOT: MenuItem = MenuItem::Preferences;

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Preferences => "Preferences",
            MenuItem::CameraSettings => "Camera Settings",
            MenuItem::Initialize => "Initialize",
            MenuItem::StartTimelapse => "Start TL",
            MenuItem::Setting(param) => param.label(),
            MenuItem::InitRight => "Init Right",
            MenuItem::InitLeft => "Init Left",
        }
    }

    pub fn parent(self) -> Option<MenuItem> {
        match self {
            MenuItem::Setting(param) if CAMERA.contains(&MenuItem::Setting(param)) => {
                Some(MenuItem::CameraSettings)
            }
            MenuItem::Setting(_) => Some(MenuItem::Preferences),
            MenuItem::InitRight | MenuItem::InitLeft => Some(MenuItem::Initialize),
            _ => None,
        }
    }

    pub fn children(self) -> &'static [MenuItem] {
        match self {
            MenuItem::Preferences => &PREFERENCES,
            MenuItem::CameraSettings => &CAMERA,
            MenuItem::Initialize => &INITIALIZE,
            _ => &[],
        }
    }

    pub fn first_child(self) -> Option<MenuItem> {
        self.children().first().copied()
    }

    /// True if Right on this item starts editing
    pub fn is_editable(self) -> bool {
        self.children().is_empty()
    }

    fn siblings(self) -> &'static [MenuItem] {
        match self.parent() {
            Some(parent) => parent.children(),
            None => &TOP,
        }
    }

    fn position(self) -> usize {
        self.siblings()
            .iter()
            .position(|&item| item == self)
            .unwrap_or(0)
    }

    pub fn next(self) -> MenuItem {
        let siblings = self.siblings();
        siblings[(self.position() + 1) % siblings.len()]
    }

    pub fn prev(self) -> MenuItem {
        let siblings = self.siblings();
        siblings[(self.position() + siblings.len() - 1) % siblings.len()]
    }
}
