//! Camera shutter and delay timer trait

/// Shutter release line plus a one-second-resolution countdown
///
/// The three setters all load the same countdown register. Completion is
/// signalled by the countdown interrupt clearing `in_take_pic_mode`,
/// `in_pic_delay_mode` or `in_motor_delay_mode`, checked in that order.
pub trait Intervalometer {
    /// Arm the countdown with the exposure time
    fn set_exposure(&mut self, seconds: u16);

    /// Arm the countdown with the post-exposure delay
    fn set_pic_delay(&mut self, seconds: u16);

    /// Arm the countdown with the pre-move delay
    fn set_motor_delay(&mut self, seconds: u16);

    /// Open the shutter and start the countdown
    fn take_pic(&mut self);

    /// Start the countdown without touching the shutter
    fn delay_loop(&mut self);
}
