//! Configuration types
//!
//! Board-agnostic settings records carrying the firmware defaults. The
//! firmware fills these from its embedded TOML file (or a flash override)
//! and hands them to the controller at boot.

/// Fade engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FadeConfig {
    /// Short-press nudge size, brightness units.
    pub step_size: u8,
    /// Fixed duration of a nudge fade, seconds.
    pub step_fade_s: u32,
    /// Reference duration of a full 0..=100 traversal, seconds.
    pub full_fade_s: u32,
    /// Native actuator unit span the brightness range maps onto.
    pub actuator_span: u16,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            step_size: 20,
            step_fade_s: 10,
            full_fade_s: 3600,
            actuator_span: 180,
        }
    }
}

/// Button press classification thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputConfig {
    /// Minimum held time for a long press, milliseconds (inclusive).
    pub long_press_ms: u64,
    /// Minimum held time for a diagnostic press, milliseconds (inclusive).
    pub diagnostic_press_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            long_press_ms: 1000,
            diagnostic_press_ms: 5000,
        }
    }
}

/// Daily schedule hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScheduleConfig {
    /// Hour of day (0..=23) that triggers the fade up to full.
    pub on_hour: u8,
    /// Hour of day (0..=23) that triggers the fade down to dark.
    pub off_hour: u8,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            on_hour: 11,
            off_hour: 20,
        }
    }
}

/// Indicator LED timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndicatorConfig {
    /// Blink half-period while a nudge fade is running, milliseconds.
    pub adjust_blink_ms: u64,
    /// On/off time of one diagnostic blink phase, milliseconds.
    pub diagnostic_blink_ms: u32,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            adjust_blink_ms: 250,
            diagnostic_blink_ms: 200,
        }
    }
}

/// Complete dimmer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DimmerConfig {
    pub fade: FadeConfig,
    pub input: InputConfig,
    pub schedule: ScheduleConfig,
    pub indicator: IndicatorConfig,
    /// Control loop period, milliseconds.
    pub tick_interval_ms: u64,
}

impl Default for DimmerConfig {
    fn default() -> Self {
        Self {
            fade: FadeConfig::default(),
            input: InputConfig::default(),
            schedule: ScheduleConfig::default(),
            indicator: IndicatorConfig::default(),
            tick_interval_ms: 20,
        }
    }
}
