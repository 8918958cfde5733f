//! RP2040 adapters for the core and driver traits

use core::convert::Infallible;

use embassy_rp::adc::{Adc, Blocking as AdcBlocking, Channel};
use embassy_rp::flash::{Blocking, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_rp::pwm::Pwm;
use embedded_hal::digital::{ErrorType, OutputPin};
use timescape_core::config::{ConfigError, ConfigStore, RECORD_BLANK};
use timescape_core::log_warn;
use timescape_core::time::TickCounter;
use timescape_core::traits::ButtonAdc;
use timescape_drivers::StepOutput;

use crate::board;
use crate::irq;

/// 2 MiB flash on the board
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Settings live in the last erase sector, outside the linked image
///
/// Erasing and programming run with interrupts masked for tens of
/// milliseconds. Only one clock wrap can stay pending in that window, so the
/// clock loses time, and countdown ticks are dropped. [`FlashStore`] refuses
/// to write while the countdown is running or a move is armed.
pub const CONFIG_OFFSET: u32 = (FLASH_SIZE - ERASE_SIZE) as u32;

/// Smallest flash program unit
const PAGE_SIZE: usize = 256;

/// Clock slice counter as the clock's low half
pub struct PwmTicks {
    pwm: Pwm<'static>,
}

impl PwmTicks {
    pub fn new(pwm: Pwm<'static>) -> Self {
        Self { pwm }
    }
}

impl TickCounter for PwmTicks {
    fn count(&self) -> u16 {
        self.pwm.counter()
    }

    fn set_count(&mut self, count: u16) {
        self.pwm.set_counter(count);
    }

    fn overflow_pending(&self) -> bool {
        irq::clock_wrap_pending()
    }

    fn clear_overflow_pending(&mut self) {
        irq::clear_clock_wrap();
    }
}

/// STEP slice, shared with the pulse interrupt
pub struct StepPwm;

impl StepOutput for StepPwm {
    fn start(&mut self, period: u16) {
        irq::with_step_pwm(|pwm| {
            pwm.set_counter(0);
            pwm.set_config(&board::step_pwm_running(period));
        });
    }

    fn halt(&mut self) {
        irq::with_step_pwm(|pwm| pwm.set_config(&board::step_pwm_idle()));
    }
}

/// Shutter relay line, shared with the countdown interrupt
pub struct SharedShutter;

impl ErrorType for SharedShutter {
    type Error = Infallible;
}

impl OutputPin for SharedShutter {
    fn set_low(&mut self) -> Result<(), Infallible> {
        irq::with_shutter(|pin| pin.set_low());
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        irq::with_shutter(|pin| pin.set_high());
        Ok(())
    }
}

/// Button ladder on an ADC input
pub struct LadderAdc {
    adc: Adc<'static, AdcBlocking>,
    channel: Channel<'static>,
}

impl LadderAdc {
    pub fn new(adc: Adc<'static, AdcBlocking>, channel: Channel<'static>) -> Self {
        Self { adc, channel }
    }
}

impl ButtonAdc for LadderAdc {
    /// Scaled to 10 bits, the range the ladder thresholds are given in
    fn read(&mut self) -> Option<u16> {
        match self.adc.blocking_read(&mut self.channel) {
            Ok(raw) => Some(raw >> 2),
            Err(_) => {
                log_warn!("button ladder conversion failed");
                None
            }
        }
    }
}

/// Settings record in the last flash sector
pub struct FlashStore {
    flash: Flash<'static, FLASH, Blocking, FLASH_SIZE>,
}

impl FlashStore {
    pub fn new(flash: Flash<'static, FLASH, Blocking, FLASH_SIZE>) -> Self {
        Self { flash }
    }
}

impl ConfigStore for FlashStore {
    fn read_record(&mut self, buf: &mut [u8]) -> Result<usize, ConfigError> {
        self.flash
            .blocking_read(CONFIG_OFFSET, buf)
            .map_err(|_| ConfigError::Storage)?;
        Ok(buf.len())
    }

    fn write_record(&mut self, record: &[u8]) -> Result<(), ConfigError> {
        if record.len() > PAGE_SIZE {
            return Err(ConfigError::Storage);
        }
        if irq::COUNTDOWN.is_running() || irq::MOVE.is_armed() {
            log_warn!("flash write refused while the slider is busy");
            return Err(ConfigError::Storage);
        }
        let mut page = [RECORD_BLANK; PAGE_SIZE];
        page[..record.len()].copy_from_slice(record);

        self.flash
            .blocking_erase(CONFIG_OFFSET, CONFIG_OFFSET + ERASE_SIZE as u32)
            .map_err(|_| ConfigError::Storage)?;
        self.flash
            .blocking_write(CONFIG_OFFSET, &page)
            .map_err(|_| ConfigError::Storage)
    }
}
