//! Board wiring for the reference RP2040 build
//!
//! Pin map:
//!   GPIO 2  - push button (to ground, internal pull-up)
//!   GPIO 3  - DS1302 SCLK
//!   GPIO 7  - DS1302 I/O
//!   GPIO 8  - DS1302 CE
//!   GPIO 9  - servo PWM (PWM slice 4, channel B)
//!   GPIO 13 - indicator LED

use embassy_rp::gpio::{Flex, Input, Level, Output};
use embassy_rp::pwm::PwmOutput;
use embassy_time::Delay;

use gloam_core::controller::Controller;
use gloam_drivers::button::DebouncedButton;
use gloam_drivers::indicator::GpioIndicator;
use gloam_drivers::rtc::{DataPin, Ds1302};
use gloam_drivers::servo::PwmServo;

use crate::flash::BrightnessCell;

/// DS1302 data line on a direction-switching pin.
pub struct FlexDataPin<'d>(pub Flex<'d>);

impl DataPin for FlexDataPin<'_> {
    fn set_input(&mut self) {
        self.0.set_as_input();
    }

    fn set_output(&mut self) {
        self.0.set_as_output();
    }

    fn write(&mut self, high: bool) {
        self.0
            .set_level(if high { Level::High } else { Level::Low });
    }

    fn read(&mut self) -> bool {
        self.0.is_high()
    }
}

pub type BoardServo = PwmServo<PwmOutput<'static>>;
pub type BoardIndicator = GpioIndicator<Output<'static>>;
pub type BoardRtc = Ds1302<Output<'static>, Output<'static>, FlexDataPin<'static>, Delay>;
pub type BoardButton = DebouncedButton<Input<'static>>;
pub type BoardController =
    Controller<BoardServo, BrightnessCell<'static>, BoardIndicator, BoardRtc, Delay>;
