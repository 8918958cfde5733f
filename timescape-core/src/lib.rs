//! Board-agnostic core logic for the camera slider firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Wraparound-safe tick time and the two-part hardware clock
//! - Cooperative task contract and the round-robin scheduler
//! - Flags shared between the main loop and interrupt handlers
//! - Slider configuration, limits and persisted record codec
//! - Hardware abstraction traits (stepper, intervalometer, endstops)
//! - Time-lapse navigation state machine
//! - Button ladder decoding and the operator menu

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
pub mod logging;

pub mod config;
pub mod flags;
pub mod menu;
pub mod navigation;
pub mod task;
pub mod time;
pub mod traits;
