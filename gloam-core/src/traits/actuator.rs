//! Actuator output trait

/// A positional actuator (servo, motorized pot) with a linear unit range.
///
/// Output is fire-and-forget: there is no position feedback, and the
/// control loop re-commands the position on every tick of an active fade.
pub trait Actuator {
    /// Drive the actuator to an absolute position in its native units.
    fn set_position(&mut self, units: u16);
}
