//! Timescape - Camera Slider Time-lapse Firmware
//!
//! Main firmware binary for RP2040-based slider boards. Two cooperative
//! tasks share one forever loop: the menu task polls the button ladder
//! every 5 ms, the navigation task sequences homing and time-lapse runs
//! every 0.5 ms. Step pulses, the shutter countdown and the timebase all
//! run off PWM wrap interrupts.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig};
use embassy_rp::flash::Flash;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::pwm::Pwm;
use static_cell::StaticCell;
use timescape_core::config::SharedConfig;
use timescape_core::log_info;
use timescape_core::menu::{ButtonTask, Menu};
use timescape_core::navigation::NavigationFsm;
use timescape_core::task::{Scheduler, Task};
use timescape_core::time::{Clock, TimeValue};
use timescape_drivers::{MicrostepPins, PinEndstops, PulseStepper, ShutterTimer, StepMode};

#[cfg(feature = "defmt")]
use {defmt_rtt as _, panic_probe as _};

mod board;
mod hardware;
mod irq;

use hardware::{FlashStore, LadderAdc, PwmTicks, SharedShutter, StepPwm};
use irq::{CONFIG, COUNTDOWN, FLAGS, MOVE, OVERFLOWS};

const MENU_INTERVAL: TimeValue = TimeValue::from_millis(5);
const NAVIGATION_INTERVAL: TimeValue = TimeValue::from_micros(500);

type MenuTask = ButtonTask<LadderAdc, Menu<'static, FlashStore>>;

type NavigationTask = NavigationFsm<
    'static,
    PulseStepper<'static, StepPwm, Output<'static>>,
    ShutterTimer<'static, SharedShutter>,
    PinEndstops<Input<'static>, Input<'static>>,
    &'static SharedConfig,
>;

type SliderScheduler =
    Scheduler<Clock<'static, PwmTicks>, (Task<MenuTask>, Task<NavigationTask>)>;

static SCHEDULER: StaticCell<SliderScheduler> = StaticCell::new();

/// Main entry point
#[entry]
fn main() -> ! {
    log_info!("Timescape firmware starting...");

    let p = embassy_rp::init(Default::default());
    log_info!("Peripherals initialized");

    // Timebase
    let clock_pwm = Pwm::new_free(p.PWM_SLICE0, board::clock_pwm_config());
    let clock = Clock::new(PwmTicks::new(clock_pwm), &OVERFLOWS);

    // Stepper
    irq::install_step_pwm(Pwm::new_output_a(
        p.PWM_SLICE1,
        p.PIN_18,
        board::step_pwm_idle(),
    ));
    let dir = Output::new(p.PIN_19, Level::Low);
    let mut microstep = MicrostepPins::new(
        Output::new(p.PIN_20, Level::Low),
        Output::new(p.PIN_21, Level::Low),
        Output::new(p.PIN_22, Level::Low),
    );
    microstep.select(StepMode::Full);
    let stepper = PulseStepper::new(StepPwm, dir, &MOVE, &FLAGS);

    // Intervalometer
    irq::install_shutter(Output::new(p.PIN_15, Level::Low));
    let _countdown_pwm = Pwm::new_free(p.PWM_SLICE2, board::countdown_pwm_config());
    let shutter = ShutterTimer::new(SharedShutter, &COUNTDOWN);

    // Endstops
    let endstops = PinEndstops::new(
        Input::new(p.PIN_10, Pull::Down),
        Input::new(p.PIN_11, Pull::Down),
    );

    // Operator interface
    let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
    let ladder = LadderAdc::new(adc, Channel::new_pin(p.PIN_26, Pull::None));
    let store = FlashStore::new(Flash::new_blocking(p.FLASH));
    let menu = ButtonTask::new(ladder, Menu::new(&FLAGS, &CONFIG, store));

    irq::enable();
    log_info!("Interrupts enabled");

    let navigation = NavigationFsm::new(
        stepper,
        shutter,
        endstops,
        &CONFIG,
        &FLAGS,
        board::STEP_TIMING,
    );

    let scheduler = SCHEDULER.init(Scheduler::new(
        clock,
        (
            Task::new("menu", menu, MENU_INTERVAL),
            Task::new("navigation", navigation, NAVIGATION_INTERVAL),
        ),
    ));
    scheduler.run()
}

#[cfg(not(feature = "defmt"))]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}
