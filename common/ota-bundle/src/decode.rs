// Licensed under the Apache-2.0 license

use crate::{
    BundleError, BundleHeader, BundleResult, BundleSummary, ImageValidator, BUNDLE_MAGIC,
};
use zerocopy::FromBytes;

/// A parsed bundle borrowing its segments from the input buffer.
#[derive(Debug, Clone, Copy)]
pub struct Bundle<'a> {
    pub header: BundleHeader,
    pub app: &'a [u8],
    pub webui: Option<&'a [u8]>,
}

impl<'a> Bundle<'a> {
    /// Splits `bytes` into header and segments, applying the same checks the
    /// device performs before it starts an update.
    pub fn parse(bytes: &'a [u8]) -> BundleResult<Self> {
        let (header, payload) = BundleHeader::read_from_prefix(bytes)
            .map_err(|_| BundleError::TruncatedHeader { len: bytes.len() })?;

        if header.magic != BUNDLE_MAGIC {
            return Err(BundleError::BadBundleMagic {
                found: u32::from_le_bytes(header.magic),
            });
        }

        let expected = header.total_len();
        if bytes.len() as u64 != expected {
            return Err(BundleError::LengthMismatch {
                expected,
                actual: bytes.len() as u64,
            });
        }

        if header.app_size() == 0 {
            return Err(BundleError::EmptyApp);
        }

        if header.reserved() != 0 {
            log::warn!("bundle reserved field is 0x{:08X}", header.reserved());
        }

        let (app, webui) = payload.split_at(header.app_size() as usize);
        Ok(Self {
            header,
            app,
            webui: header.has_webui().then_some(webui),
        })
    }

    /// Runs `validator` over the embedded application image.
    pub fn validate_app(&self, validator: &impl ImageValidator) -> BundleResult<()> {
        validator.validate(self.app)
    }

    pub fn summary(&self) -> BundleSummary {
        BundleSummary::new(&self.header)
    }
}
