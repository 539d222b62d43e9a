//! Indicator output trait

/// A binary indicator (status LED).
pub trait Indicator {
    /// Switch the indicator on or off.
    fn set_on(&mut self, on: bool);

    /// Last commanded state.
    fn is_on(&self) -> bool;

    /// Invert the current state.
    fn toggle(&mut self) {
        let on = !self.is_on();
        self.set_on(on);
    }
}
