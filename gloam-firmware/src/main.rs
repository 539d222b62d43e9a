//! Gloam - motorized dimmer firmware
//!
//! Main firmware binary for RP2040-based dimmer boards. All dimmer state
//! lives in a single control task; everything here is bring-up: flash,
//! configuration, servo PWM, button, RTC, and indicator.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Flex, Input, Level, Output, Pull};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_time::{Delay, Instant, Timer};
use {defmt_rtt as _, panic_probe as _};

use gloam_core::controller::Controller;
use gloam_drivers::button::{DebouncedButton, DEBOUNCE_MS};
use gloam_drivers::indicator::GpioIndicator;
use gloam_drivers::rtc::Ds1302;
use gloam_drivers::servo::PwmServo;

use crate::board::FlexDataPin;
use crate::flash::{BrightnessCell, DimmerFlash};

mod board;
mod config;
mod flash;
mod tasks;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("gloam firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("peripherals initialized");

    // Flash carries the config override and the persisted brightness
    let mut dimmer_flash = DimmerFlash::new(p.FLASH, p.DMA_CH0);
    let fw_config = config::load(&mut dimmer_flash).await;
    info!("configuration loaded");

    // Servo PWM: 1 µs ticks, 20 ms frame
    let mut pwm_config = PwmConfig::default();
    pwm_config.divider = 125u8.into(); // 125 MHz system clock -> 1 µs per tick
    pwm_config.top = 19_999;
    let pwm = Pwm::new_output_b(p.PWM_SLICE4, p.PIN_9, pwm_config);
    let (_, pwm_b) = pwm.split();
    let servo = PwmServo::new(
        pwm_b.unwrap(),
        fw_config.servo.min_pulse_us,
        fw_config.servo.max_pulse_us,
        fw_config.dimmer.fade.actuator_span,
    );

    // Indicator LED
    let indicator = GpioIndicator::new_active_high(Output::new(p.PIN_13, Level::Low));

    // Push button to ground with the internal pull-up
    let button = DebouncedButton::new(Input::new(p.PIN_2, Pull::Up), false, DEBOUNCE_MS);

    // DS1302 RTC on three GPIOs
    let mut rtc = Ds1302::new(
        Output::new(p.PIN_8, Level::Low),
        Output::new(p.PIN_3, Level::Low),
        FlexDataPin(Flex::new(p.PIN_7)),
        Delay,
    );
    if let Some(calibration) = fw_config.calibration.as_ref() {
        info!("programming RTC from config calibration");
        rtc.set_datetime(calibration);
    }

    // Brightness store over the same flash partition
    let store = BrightnessCell::new(dimmer_flash);

    // The controller restores the persisted brightness and starts the
    // power-on fade down inside `new`.
    let now_ms = Instant::now().as_millis();
    let controller = Controller::new(
        servo,
        store,
        indicator,
        rtc,
        Delay,
        fw_config.dimmer,
        now_ms,
    );

    spawner
        .spawn(tasks::control_task(
            controller,
            button,
            fw_config.dimmer.tick_interval_ms,
        ))
        .unwrap();

    info!("control task spawned, dimmer running");

    // Main task has nothing else to do - all work happens in the control task
    loop {
        Timer::after_secs(60).await;
        trace!("main loop heartbeat");
    }
}
