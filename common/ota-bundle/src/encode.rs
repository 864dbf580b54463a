// Licensed under the Apache-2.0 license

use crate::{BundleHeader, BundleResult, BUNDLE_HEADER_SIZE};
use core::fmt;
use std::io::Write;
use zerocopy::IntoBytes;

/// Builds the complete bundle in memory: header, app image, then the WebUI
/// image if one was supplied. The application image is expected to have been
/// validated already.
pub fn encode_bundle(app: &[u8], webui: Option<&[u8]>) -> BundleResult<Vec<u8>> {
    encode(app, webui.unwrap_or_default()).map(|(_, bundle)| bundle)
}

/// Encodes the bundle and hands it to `sink` in a single `write_all`. Nothing
/// reaches the sink if encoding fails.
pub fn write_bundle<W: Write>(
    sink: &mut W,
    app: &[u8],
    webui: Option<&[u8]>,
) -> BundleResult<BundleSummary> {
    let (header, bundle) = encode(app, webui.unwrap_or_default())?;
    sink.write_all(&bundle)?;
    sink.flush()?;

    Ok(BundleSummary::new(&header))
}

fn encode(app: &[u8], webui: &[u8]) -> BundleResult<(BundleHeader, Vec<u8>)> {
    let header = BundleHeader::for_payloads(app.len(), webui.len())?;

    let mut bundle = Vec::with_capacity(BUNDLE_HEADER_SIZE + app.len() + webui.len());
    bundle.extend_from_slice(header.as_bytes());
    bundle.extend_from_slice(app);
    bundle.extend_from_slice(webui);

    log::debug!(
        "encoded bundle: header {} + app {} + webui {} bytes",
        BUNDLE_HEADER_SIZE,
        app.len(),
        webui.len()
    );
    Ok((header, bundle))
}

/// Human readable report of what went into a bundle. `Display` renders the
/// per-segment lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleSummary {
    pub total_size: u64,
    pub app_size: u32,
    pub webui_size: Option<u32>,
}

impl BundleSummary {
    pub fn new(header: &BundleHeader) -> Self {
        Self {
            total_size: header.total_len(),
            app_size: header.app_size(),
            webui_size: header.has_webui().then(|| header.webui_size()),
        }
    }
}

impl fmt::Display for BundleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  App:   {} bytes", self.app_size)?;
        match self.webui_size {
            Some(size) => write!(f, "  WebUI: {} bytes", size),
            None => write!(f, "  WebUI: (none)"),
        }
    }
}
