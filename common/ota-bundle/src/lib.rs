// Licensed under the Apache-2.0 license

//! TBUP OTA bundle format.
//!
//! A bundle is a 16 byte little-endian header followed by the application
//! firmware image and an optional WebUI filesystem image:
//!
//! ```text
//! Offset        Size        Field
//! 0             4           Magic: "TBUP"
//! 4             4           App size (u32 LE)
//! 8             4           WebUI size (u32 LE, 0 = app-only)
//! 12            4           Reserved (0)
//! 16            app_size    App firmware binary
//! 16+app_size   webui_size  WebUI image (optional)
//! ```

mod decode;
mod encode;
mod error;
mod validate;

use zerocopy::byteorder::{LittleEndian, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

pub use decode::Bundle;
pub use encode::{encode_bundle, write_bundle, BundleSummary};
pub use error::{BundleError, BundleResult, Segment};
pub use validate::{
    validate_app_image, AppDescriptorCheck, ImageValidator, APP_DESC_MAGIC, APP_DESC_OFFSET,
};

pub const BUNDLE_MAGIC: [u8; 4] = *b"TBUP";
pub const BUNDLE_HEADER_SIZE: usize = core::mem::size_of::<BundleHeader>();

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct BundleHeader {
    pub magic: [u8; 4],
    pub app_size: U32<LittleEndian>,
    pub webui_size: U32<LittleEndian>,
    /// Flags word, always zero in this revision of the format.
    pub reserved: U32<LittleEndian>,
}

const _: () = assert!(BUNDLE_HEADER_SIZE == 16);

impl BundleHeader {
    /// Builds the header for payloads of the given lengths, failing if either
    /// length does not fit in the 32-bit size fields.
    pub fn for_payloads(app_len: usize, webui_len: usize) -> BundleResult<Self> {
        let app_size = u32::try_from(app_len).map_err(|_| BundleError::SizeOverflow {
            segment: Segment::App,
            len: app_len as u64,
        })?;
        let webui_size = u32::try_from(webui_len).map_err(|_| BundleError::SizeOverflow {
            segment: Segment::WebUi,
            len: webui_len as u64,
        })?;

        Ok(Self {
            magic: BUNDLE_MAGIC,
            app_size: U32::new(app_size),
            webui_size: U32::new(webui_size),
            reserved: U32::new(0),
        })
    }

    pub fn app_size(&self) -> u32 {
        self.app_size.get()
    }

    pub fn webui_size(&self) -> u32 {
        self.webui_size.get()
    }

    pub fn reserved(&self) -> u32 {
        self.reserved.get()
    }

    pub fn has_webui(&self) -> bool {
        self.webui_size() != 0
    }

    /// Combined length of both segments. Computed in 64 bits so that two
    /// maximal size fields cannot wrap.
    pub fn payload_len(&self) -> u64 {
        u64::from(self.app_size()) + u64::from(self.webui_size())
    }

    pub fn total_len(&self) -> u64 {
        BUNDLE_HEADER_SIZE as u64 + self.payload_len()
    }
}
