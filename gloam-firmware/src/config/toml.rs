//! Minimal TOML parser for the dimmer configuration
//!
//! This parser handles only the subset needed for dimmer.toml. It does NOT
//! support the full TOML spec.
//!
//! Supported features:
//! - key = value pairs (integers only)
//! - [section] headers
//! - [section.subsection] headers
//! - Comments (# ...), including trailing comments
//!
//! NOT supported:
//! - Strings, arrays, inline tables
//! - Datetime values
//! - Dotted keys outside section headers

use gloam_drivers::rtc::DateTime;

use super::FirmwareConfig;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unrecognized section header
    InvalidSection,
    /// Line is neither a section header nor a key/value pair
    InvalidLine,
    /// Value failed to parse or is out of range
    InvalidValue,
    /// Unrecognized key for the current section
    UnknownKey,
}

/// Current parsing context
#[derive(Debug, Clone, Copy)]
enum Section {
    Root,
    Fade,
    Input,
    Schedule,
    Indicator,
    Control,
    Servo,
    Calibration,
}

/// Parse TOML configuration into a [`FirmwareConfig`].
pub fn parse_config(input: &str) -> Result<FirmwareConfig, ParseError> {
    let mut config = FirmwareConfig::default();
    let mut calibration = DateTime {
        year: 2000,
        month: 1,
        day: 1,
        weekday: 1,
        hour: 0,
        minute: 0,
        second: 0,
    };
    let mut has_calibration = false;
    let mut section = Section::Root;

    for raw_line in input.lines() {
        // No string values exist in this format, so a '#' always starts a
        // comment.
        let line = match raw_line.split_once('#') {
            Some((before, _)) => before.trim(),
            None => raw_line.trim(),
        };
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            if matches!(section, Section::Calibration) {
                has_calibration = true;
            }
            continue;
        }

        let (key, value) = line.split_once('=').ok_or(ParseError::InvalidLine)?;
        let key = key.trim();
        let value: i64 = value.trim().parse().map_err(|_| ParseError::InvalidValue)?;

        match section {
            Section::Root => return Err(ParseError::InvalidLine),
            Section::Fade => match key {
                "step_size" => config.dimmer.fade.step_size = int_in(value, 1, 100)? as u8,
                "step_fade_s" => config.dimmer.fade.step_fade_s = int_in(value, 1, 86_400)? as u32,
                "full_fade_s" => config.dimmer.fade.full_fade_s = int_in(value, 1, 86_400)? as u32,
                "actuator_span" => {
                    config.dimmer.fade.actuator_span = int_in(value, 1, 360)? as u16
                }
                _ => return Err(ParseError::UnknownKey),
            },
            Section::Input => match key {
                "long_press_ms" => {
                    config.dimmer.input.long_press_ms = int_in(value, 1, 60_000)? as u64
                }
                "diagnostic_press_ms" => {
                    config.dimmer.input.diagnostic_press_ms = int_in(value, 1, 60_000)? as u64
                }
                _ => return Err(ParseError::UnknownKey),
            },
            Section::Schedule => match key {
                "on_hour" => config.dimmer.schedule.on_hour = int_in(value, 0, 23)? as u8,
                "off_hour" => config.dimmer.schedule.off_hour = int_in(value, 0, 23)? as u8,
                _ => return Err(ParseError::UnknownKey),
            },
            Section::Indicator => match key {
                "adjust_blink_ms" => {
                    config.dimmer.indicator.adjust_blink_ms = int_in(value, 1, 10_000)? as u64
                }
                "diagnostic_blink_ms" => {
                    config.dimmer.indicator.diagnostic_blink_ms = int_in(value, 1, 10_000)? as u32
                }
                _ => return Err(ParseError::UnknownKey),
            },
            Section::Control => match key {
                "tick_interval_ms" => {
                    config.dimmer.tick_interval_ms = int_in(value, 1, 1_000)? as u64
                }
                _ => return Err(ParseError::UnknownKey),
            },
            Section::Servo => match key {
                "min_pulse_us" => config.servo.min_pulse_us = int_in(value, 1, 20_000)? as u16,
                "max_pulse_us" => config.servo.max_pulse_us = int_in(value, 1, 20_000)? as u16,
                _ => return Err(ParseError::UnknownKey),
            },
            Section::Calibration => match key {
                "year" => calibration.year = int_in(value, 2000, 2099)? as u16,
                "month" => calibration.month = int_in(value, 1, 12)? as u8,
                "day" => calibration.day = int_in(value, 1, 31)? as u8,
                "weekday" => calibration.weekday = int_in(value, 1, 7)? as u8,
                "hour" => calibration.hour = int_in(value, 0, 23)? as u8,
                "minute" => calibration.minute = int_in(value, 0, 59)? as u8,
                "second" => calibration.second = int_in(value, 0, 59)? as u8,
                _ => return Err(ParseError::UnknownKey),
            },
        }
    }

    if config.servo.min_pulse_us >= config.servo.max_pulse_us {
        return Err(ParseError::InvalidValue);
    }
    if config.dimmer.input.long_press_ms >= config.dimmer.input.diagnostic_press_ms {
        return Err(ParseError::InvalidValue);
    }
    if has_calibration {
        config.calibration = Some(calibration);
    }
    Ok(config)
}

fn parse_section_header(name: &str) -> Result<Section, ParseError> {
    match name.trim() {
        "fade" => Ok(Section::Fade),
        "input" => Ok(Section::Input),
        "schedule" => Ok(Section::Schedule),
        "indicator" => Ok(Section::Indicator),
        "control" => Ok(Section::Control),
        "servo" => Ok(Section::Servo),
        "clock.calibration" => Ok(Section::Calibration),
        _ => Err(ParseError::InvalidSection),
    }
}

fn int_in(value: i64, min: i64, max: i64) -> Result<i64, ParseError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ParseError::InvalidValue)
    }
}
