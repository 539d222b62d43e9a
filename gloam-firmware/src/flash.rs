//! Flash persistence
//!
//! Wear-leveled key-value storage in the last 64 KB of flash via
//! sequential-storage: one key holds the last stable brightness, another an
//! optional TOML configuration override.

use defmt::{debug, info, warn};
use embassy_futures::block_on;
use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

use gloam_core::traits::BrightnessStore;

/// Flash storage configuration
pub const FLASH_SIZE: usize = 2 * 1024 * 1024; // 2 MB on the Pico
pub const STORAGE_PARTITION_SIZE: usize = 64 * 1024;
pub const STORAGE_PARTITION_START: usize = FLASH_SIZE - STORAGE_PARTITION_SIZE;

/// Flash range for the storage partition
pub const STORAGE_RANGE: core::ops::Range<u32> =
    (STORAGE_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Key for the persisted brightness cell.
const KEY_BRIGHTNESS: u8 = 0x01;
/// Key for the TOML configuration override.
const KEY_CONFIG_TOML: u8 = 0x02;

/// Maximum stored TOML size.
pub const MAX_CONFIG_TOML_SIZE: usize = 2048;

/// Flash storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Key not present in the partition
    NotFound,
    /// Caller buffer too small for the stored value
    BufferTooSmall,
    /// Underlying storage operation failed
    Storage,
}

/// Storage partition handle.
pub struct DimmerFlash<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
}

impl<'d> DimmerFlash<'d> {
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
        }
    }

    /// Read the TOML configuration override, if one was stored.
    pub async fn read_config_toml(&mut self, buffer: &mut [u8]) -> Result<usize, FlashError> {
        self.read(KEY_CONFIG_TOML, buffer).await
    }

    async fn read(&mut self, key: u8, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let mut data_buffer = [0u8; MAX_CONFIG_TOML_SIZE];

        let result = map::fetch_item::<u8, &[u8], _>(
            &mut self.flash,
            STORAGE_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
        )
        .await;

        match result {
            Ok(Some(data)) => {
                let len = data.len();
                if buffer.len() < len {
                    return Err(FlashError::BufferTooSmall);
                }
                buffer[..len].copy_from_slice(data);
                Ok(len)
            }
            Ok(None) => Err(FlashError::NotFound),
            Err(_) => Err(FlashError::Storage),
        }
    }

    async fn write(&mut self, key: u8, data: &[u8]) -> Result<(), FlashError> {
        let mut data_buffer = [0u8; MAX_CONFIG_TOML_SIZE];

        map::store_item(
            &mut self.flash,
            STORAGE_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
            &data,
        )
        .await
        .map_err(|_| FlashError::Storage)
    }
}

/// Persistent brightness cell.
///
/// Caches the last written value so repeated updates with an unchanged
/// brightness never touch flash. Writes run to completion inline; they only
/// happen at fade completion, so the stall is rare and bounded.
pub struct BrightnessCell<'d> {
    flash: DimmerFlash<'d>,
    cached: Option<u8>,
}

impl<'d> BrightnessCell<'d> {
    pub fn new(flash: DimmerFlash<'d>) -> Self {
        Self {
            flash,
            cached: None,
        }
    }
}

impl BrightnessStore for BrightnessCell<'_> {
    fn read(&mut self) -> u8 {
        if let Some(value) = self.cached {
            return value;
        }
        let mut buffer = [0u8; 8];
        let value = match block_on(self.flash.read(KEY_BRIGHTNESS, &mut buffer)) {
            Ok(len) if len >= 1 => buffer[0],
            Ok(_) => 0,
            Err(FlashError::NotFound) => {
                info!("no persisted brightness, starting dark");
                0
            }
            Err(e) => {
                warn!("flash read failed: {:?}, starting dark", e);
                0
            }
        };
        self.cached = Some(value);
        value
    }

    fn update(&mut self, level: u8) {
        if self.cached == Some(level) {
            return;
        }
        match block_on(self.flash.write(KEY_BRIGHTNESS, &[level])) {
            Ok(()) => {
                self.cached = Some(level);
                debug!("persisted brightness {}", level);
            }
            Err(e) => warn!("flash write failed: {:?}, brightness {} not persisted", e, level),
        }
    }
}
