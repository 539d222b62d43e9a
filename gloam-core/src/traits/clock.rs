//! Wall-clock trait

/// Source of the current time of day.
///
/// Backed by a battery-buffered RTC in the firmware. The control core only
/// ever needs the hour; minutes and seconds stay a driver concern.
pub trait TimeOfDay {
    /// Current hour of day, 0..=23.
    fn hour(&mut self) -> u8;
}
