//! Brightness math
//!
//! All control-path arithmetic is integer. Round-half-up reproduces analog
//! interpolation rounding without dragging float support into the core.

/// Full-scale brightness.
pub const MAX_LEVEL: u8 = 100;

/// Clamp an arbitrary computed value into the brightness domain.
pub fn clamp_level(value: i32) -> u8 {
    value.clamp(0, MAX_LEVEL as i32) as u8
}

/// Map a brightness level onto an actuator position.
///
/// Linear map from `[0, 100]` to `[0, span]`, where `span` is the actuator's
/// native unit range (180 for a hobby servo).
pub fn to_actuator_units(level: u8, span: u16) -> u16 {
    (level.min(MAX_LEVEL) as u32 * span as u32 / MAX_LEVEL as u32) as u16
}

/// Fade duration for a partial traversal, in seconds.
///
/// A full `0..=100` traversal takes `full_span_s`; a shorter distance takes
/// a proportional fraction, rounded to the nearest second. Zero distance is
/// zero seconds.
pub fn proportional_duration_s(from: u8, to: u8, full_span_s: u32) -> u32 {
    let distance = from.abs_diff(to) as u32;
    (distance * full_span_s + MAX_LEVEL as u32 / 2) / MAX_LEVEL as u32
}

/// Linear interpolation between two levels, rounded half-up.
///
/// Saturates to `end` once `elapsed_ms` reaches `duration_ms`, including for
/// a zero duration.
pub fn interpolate(start: u8, end: u8, elapsed_ms: u64, duration_ms: u64) -> u8 {
    if elapsed_ms >= duration_ms {
        return end;
    }
    let delta = end as i64 - start as i64;
    let numer = start as i64 * duration_ms as i64 + delta * elapsed_ms as i64;
    let value = (numer + duration_ms as i64 / 2) / duration_ms as i64;
    clamp_level(value as i32)
}
