//! PWM hobby-servo actuator
//!
//! Drives a positional servo through an `embedded-hal` PWM channel. The
//! standard hobby-servo frame is 20 ms with the position encoded as a
//! 500-2500 µs pulse; actuator units map linearly into that window.

use embedded_hal::pwm::SetDutyCycle;
use gloam_core::traits::Actuator;

/// Servo PWM frame period in microseconds (50 Hz).
pub const FRAME_PERIOD_US: u16 = 20_000;

/// Default pulse width at position 0.
pub const MIN_PULSE_US_DEFAULT: u16 = 500;

/// Default pulse width at the far end of travel.
pub const MAX_PULSE_US_DEFAULT: u16 = 2_500;

/// A hobby servo on a PWM channel.
///
/// The channel must be configured for a 20 ms frame; the driver only ever
/// changes the duty cycle.
pub struct PwmServo<P> {
    pwm: P,
    min_pulse_us: u16,
    max_pulse_us: u16,
    span_units: u16,
}

impl<P: SetDutyCycle> PwmServo<P> {
    /// Create a servo with a custom pulse window.
    ///
    /// `span_units` is the servo's travel range (180 for a standard hobby
    /// servo); positions beyond it are clamped.
    pub fn new(pwm: P, min_pulse_us: u16, max_pulse_us: u16, span_units: u16) -> Self {
        assert!(min_pulse_us < max_pulse_us, "pulse window must be non-empty");
        assert!(max_pulse_us <= FRAME_PERIOD_US, "pulse must fit in the frame");
        assert!(span_units > 0, "span must be positive");
        Self {
            pwm,
            min_pulse_us,
            max_pulse_us,
            span_units,
        }
    }

    /// Create a servo with the standard 500-2500 µs window.
    pub fn with_default_pulses(pwm: P, span_units: u16) -> Self {
        Self::new(pwm, MIN_PULSE_US_DEFAULT, MAX_PULSE_US_DEFAULT, span_units)
    }

    fn pulse_for(&self, units: u16) -> u16 {
        let units = units.min(self.span_units) as u32;
        let window = (self.max_pulse_us - self.min_pulse_us) as u32;
        self.min_pulse_us + (units * window / self.span_units as u32) as u16
    }
}

impl<P: SetDutyCycle> Actuator for PwmServo<P> {
    fn set_position(&mut self, units: u16) {
        let pulse = self.pulse_for(units);
        // Fire-and-forget output; a rejected duty cycle leaves the servo
        // where it was.
        let _ = self.pwm.set_duty_cycle_fraction(pulse, FRAME_PERIOD_US);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    /// Mock PWM channel whose full scale equals the frame period, so the
    /// recorded duty reads directly as a pulse width in microseconds.
    struct MockPwm {
        duty: u16,
    }

    impl embedded_hal::pwm::ErrorType for MockPwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for MockPwm {
        fn max_duty_cycle(&self) -> u16 {
            FRAME_PERIOD_US
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            self.duty = duty;
            Ok(())
        }
    }

    fn servo() -> PwmServo<MockPwm> {
        PwmServo::with_default_pulses(MockPwm { duty: 0 }, 180)
    }

    #[test]
    fn endpoints_hit_the_pulse_window() {
        let mut servo = servo();
        servo.set_position(0);
        assert_eq!(servo.pwm.duty, 500);
        servo.set_position(180);
        assert_eq!(servo.pwm.duty, 2500);
    }

    #[test]
    fn midpoint_is_centered() {
        let mut servo = servo();
        servo.set_position(90);
        assert_eq!(servo.pwm.duty, 1500);
    }

    #[test]
    fn positions_beyond_span_clamp() {
        let mut servo = servo();
        servo.set_position(400);
        assert_eq!(servo.pwm.duty, 2500);
    }

    #[test]
    fn custom_window_scales_linearly() {
        let mut servo = PwmServo::new(MockPwm { duty: 0 }, 1000, 2000, 100);
        servo.set_position(25);
        assert_eq!(servo.pwm.duty, 1250);
    }
}
