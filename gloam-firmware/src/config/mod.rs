//! Configuration loading
//!
//! The dimmer configuration is compiled in from dimmer.toml; a TOML blob in
//! the flash storage partition overrides it at boot. An invalid override
//! falls back to the embedded file.

pub mod toml;

use defmt::{debug, error, info, warn};

use gloam_core::config::DimmerConfig;
use gloam_drivers::rtc::DateTime;

use crate::flash::{DimmerFlash, FlashError, MAX_CONFIG_TOML_SIZE};

/// Embedded default configuration (compiled into the firmware).
/// Edit dimmer.toml and rebuild to customize.
const EMBEDDED_CONFIG: &str = include_str!("../../dimmer.toml");

/// Board-level servo electrical settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoConfig {
    pub min_pulse_us: u16,
    pub max_pulse_us: u16,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            min_pulse_us: 500,
            max_pulse_us: 2500,
        }
    }
}

/// Complete firmware configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FirmwareConfig {
    pub dimmer: DimmerConfig,
    pub servo: ServoConfig,
    /// When present, the RTC is programmed once at boot.
    pub calibration: Option<DateTime>,
}

/// Load configuration: flash override first, embedded defaults otherwise.
pub async fn load(flash: &mut DimmerFlash<'_>) -> FirmwareConfig {
    let mut buffer = [0u8; MAX_CONFIG_TOML_SIZE];
    match flash.read_config_toml(&mut buffer).await {
        Ok(len) => match core::str::from_utf8(&buffer[..len]) {
            Ok(text) => match toml::parse_config(text) {
                Ok(config) => {
                    info!("loaded configuration override from flash");
                    return config;
                }
                Err(e) => warn!("flash config invalid: {:?}, using embedded defaults", e),
            },
            Err(_) => warn!("flash config is not UTF-8, using embedded defaults"),
        },
        Err(FlashError::NotFound) => debug!("no flash config override"),
        Err(e) => warn!("flash config read failed: {:?}", e),
    }

    match toml::parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            // Unreachable as long as build.rs validation passes
            error!("embedded config invalid: {:?}, using compiled defaults", e);
            FirmwareConfig::default()
        }
    }
}
