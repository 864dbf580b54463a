// Licensed under the Apache-2.0 license

use crate::{BundleError, BundleResult};
use zerocopy::byteorder::{LittleEndian, U32};
use zerocopy::FromBytes;

const ESP_IMAGE_HEADER_SIZE: usize = 24;
const ESP_SEGMENT_HEADER_SIZE: usize = 8;

/// The ESP-IDF app descriptor follows the image header and the first segment header.
pub const APP_DESC_OFFSET: usize = ESP_IMAGE_HEADER_SIZE + ESP_SEGMENT_HEADER_SIZE;
pub const APP_DESC_MAGIC: u32 = 0xABCD_5432;

/// Structural check applied to an application image before it is bundled.
pub trait ImageValidator {
    fn validate(&self, image: &[u8]) -> BundleResult<()>;
}

/// Expects a little-endian descriptor word at a fixed offset into the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppDescriptorCheck {
    pub offset: usize,
    pub magic: u32,
}

impl AppDescriptorCheck {
    pub const ESP_APP: Self = Self {
        offset: APP_DESC_OFFSET,
        magic: APP_DESC_MAGIC,
    };

    pub fn min_len(&self) -> usize {
        self.offset.saturating_add(core::mem::size_of::<u32>())
    }
}

impl Default for AppDescriptorCheck {
    fn default() -> Self {
        Self::ESP_APP
    }
}

impl ImageValidator for AppDescriptorCheck {
    fn validate(&self, image: &[u8]) -> BundleResult<()> {
        let required = self.min_len();
        let too_small = BundleError::TooSmall {
            len: image.len(),
            required,
        };
        let Some(desc) = image.get(self.offset..required) else {
            return Err(too_small);
        };
        let word = U32::<LittleEndian>::read_from_bytes(desc)
            .map_err(|_| too_small)?
            .get();

        if word != self.magic {
            return Err(BundleError::BadMagic {
                found: word,
                expected: self.magic,
                offset: self.offset,
            });
        }

        log::debug!(
            "app descriptor 0x{:08X} found at offset {}",
            word,
            self.offset
        );
        Ok(())
    }
}

/// Checks `image` against the ESP-IDF app descriptor.
pub fn validate_app_image(image: &[u8]) -> BundleResult<()> {
    AppDescriptorCheck::ESP_APP.validate(image)
}
