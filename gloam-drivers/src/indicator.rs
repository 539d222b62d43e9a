//! GPIO indicator LED
//!
//! Simple binary indicator on a GPIO pin, active-high (default) or
//! active-low.

use embedded_hal::digital::OutputPin;
use gloam_core::traits::Indicator;

/// Indicator LED on a GPIO pin.
pub struct GpioIndicator<P> {
    pin: P,
    /// If true, indicator ON = pin LOW
    inverted: bool,
    /// Current logical state (true = lit)
    on: bool,
}

impl<P: OutputPin> GpioIndicator<P> {
    /// Create a new GPIO indicator.
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin to control
    /// - `inverted`: If true, the LED lights when the pin is LOW
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut indicator = Self {
            pin,
            inverted,
            on: false,
        };
        // Ensure the LED starts dark
        indicator.apply();
        indicator
    }

    /// Create a new indicator with active-high wiring.
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Create a new indicator with active-low wiring.
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    fn apply(&mut self) {
        // Pin writes are infallible on every supported target.
        if self.on != self.inverted {
            let _ = self.pin.set_high();
        } else {
            let _ = self.pin.set_low();
        }
    }
}

impl<P: OutputPin> Indicator for GpioIndicator<P> {
    fn set_on(&mut self, on: bool) {
        self.on = on;
        self.apply();
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    /// Mock GPIO pin for testing
    struct MockPin {
        high: bool,
    }

    impl MockPin {
        fn new() -> Self {
            Self { high: false }
        }
    }

    impl embedded_hal::digital::ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            Ok(())
        }
    }

    #[test]
    fn active_high_indicator() {
        let mut indicator = GpioIndicator::new_active_high(MockPin::new());

        // Initially dark
        assert!(!indicator.is_on());
        assert!(!indicator.pin.high);

        indicator.set_on(true);
        assert!(indicator.is_on());
        assert!(indicator.pin.high);

        indicator.set_on(false);
        assert!(!indicator.is_on());
        assert!(!indicator.pin.high);
    }

    #[test]
    fn active_low_indicator() {
        let mut indicator = GpioIndicator::new_active_low(MockPin::new());

        // Initially dark (pin held high for active-low)
        assert!(!indicator.is_on());
        assert!(indicator.pin.high);

        indicator.set_on(true);
        assert!(indicator.is_on());
        assert!(!indicator.pin.high);
    }

    #[test]
    fn toggle_inverts_state() {
        let mut indicator = GpioIndicator::new_active_high(MockPin::new());
        indicator.toggle();
        assert!(indicator.is_on());
        indicator.toggle();
        assert!(!indicator.is_on());
    }
}
