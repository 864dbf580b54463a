// Licensed under the Apache-2.0 license

use core::fmt;
use thiserror::Error;

pub type BundleResult<T> = Result<T, BundleError>;

/// Payload segment of a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    App,
    WebUi,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::App => write!(f, "app"),
            Segment::WebUi => write!(f, "webui"),
        }
    }
}

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("app binary too small ({len} bytes, need at least {required})")]
    TooSmall { len: usize, required: usize },
    #[error(
        "app binary has bad magic 0x{found:08X} at offset {offset} (expected 0x{expected:08X}). \
         Is this a valid firmware.bin?"
    )]
    BadMagic {
        found: u32,
        expected: u32,
        offset: usize,
    },
    #[error("{segment} image is {len} bytes, which does not fit in a 32-bit size field")]
    SizeOverflow { segment: Segment, len: u64 },
    #[error("bundle too small for header ({len} bytes)")]
    TruncatedHeader { len: usize },
    #[error("bundle has bad magic 0x{found:08X}")]
    BadBundleMagic { found: u32 },
    #[error("bundle is {actual} bytes but header describes {expected}")]
    LengthMismatch { expected: u64, actual: u64 },
    #[error("bundle app_size is zero")]
    EmptyApp,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
