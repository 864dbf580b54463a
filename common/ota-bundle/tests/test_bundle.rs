// Licensed under the Apache-2.0 license

use ota_bundle::{
    encode_bundle, validate_app_image, write_bundle, AppDescriptorCheck, Bundle, BundleError,
    BundleHeader, BundleSummary, APP_DESC_MAGIC, APP_DESC_OFFSET, BUNDLE_HEADER_SIZE,
};

/// An app image with the descriptor magic in place, padded out to `len` bytes
/// with a repeating pattern.
fn app_image(len: usize) -> Vec<u8> {
    let mut image: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
    image[APP_DESC_OFFSET..APP_DESC_OFFSET + 4].copy_from_slice(&APP_DESC_MAGIC.to_le_bytes());
    image
}

#[test]
fn test_encode_decode_app_and_webui() {
    let app = app_image(4096 + 7);
    let webui: Vec<u8> = (0..1500u32).map(|i| (i * 7) as u8).collect();

    validate_app_image(&app).expect("app image should validate");
    let bundle = encode_bundle(&app, Some(webui.as_slice())).expect("Failed to encode bundle");
    assert_eq!(bundle.len(), BUNDLE_HEADER_SIZE + app.len() + webui.len());

    let decoded = Bundle::parse(&bundle).expect("Failed to decode bundle");
    assert_eq!(decoded.header.app_size() as usize, app.len());
    assert_eq!(decoded.header.webui_size() as usize, webui.len());
    assert_eq!(decoded.header.reserved(), 0);
    assert_eq!(decoded.app, &app[..]);
    assert_eq!(decoded.webui, Some(&webui[..]));
    decoded
        .validate_app(&AppDescriptorCheck::default())
        .expect("embedded app should validate");
}

#[test]
fn test_encode_decode_app_only() {
    let app = app_image(1024);
    let bundle = encode_bundle(&app, None).unwrap();

    assert_eq!(bundle.len(), BUNDLE_HEADER_SIZE + app.len());
    assert_eq!(&bundle[8..12], &[0, 0, 0, 0]);

    let decoded = Bundle::parse(&bundle).unwrap();
    assert_eq!(decoded.app, &app[..]);
    assert!(decoded.webui.is_none());
    assert_eq!(
        decoded.summary(),
        BundleSummary {
            total_size: 16 + 1024,
            app_size: 1024,
            webui_size: None,
        }
    );
}

#[test]
fn test_minimal_image_bundle_bytes() {
    let mut app = vec![0u8; 36];
    app[32..].copy_from_slice(&0xABCD5432u32.to_le_bytes());
    validate_app_image(&app).unwrap();

    let mut out = Vec::new();
    let summary = write_bundle(&mut out, &app, None).unwrap();

    let mut expected = vec![
        b'T', b'B', b'U', b'P', 0x24, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00,
    ];
    expected.extend_from_slice(&app);
    assert_eq!(out, expected);
    assert_eq!(out.len(), 52);
    assert_eq!(summary.total_size, 52);
}

#[test]
fn test_validator_boundary() {
    let mut app = vec![0u8; 36];
    app[32..].copy_from_slice(&APP_DESC_MAGIC.to_le_bytes());
    assert!(validate_app_image(&app).is_ok());

    assert!(matches!(
        validate_app_image(&app[..35]),
        Err(BundleError::TooSmall {
            len: 35,
            required: 36
        })
    ));

    app[35] ^= 0xFF;
    let err = validate_app_image(&app).unwrap_err();
    assert!(matches!(
        err,
        BundleError::BadMagic {
            found: 0x54CD5432,
            ..
        }
    ));
    assert!(err.to_string().contains("0x54CD5432"));
    assert!(err.to_string().contains("0xABCD5432"));
}

#[cfg(target_pointer_width = "64")]
#[test]
fn test_oversized_segment_rejected() {
    let err = BundleHeader::for_payloads(36, u32::MAX as usize + 1).unwrap_err();
    assert_eq!(
        err.to_string(),
        "webui image is 4294967296 bytes, which does not fit in a 32-bit size field"
    );
}

/// Allocates (lazily zeroed) 4 GiB of address space; run with `--ignored`.
#[cfg(target_pointer_width = "64")]
#[test]
#[ignore]
fn test_oversized_segment_writes_nothing() {
    let app = app_image(64);
    let webui = vec![0u8; u32::MAX as usize + 1];

    let mut sink = Vec::new();
    let err = write_bundle(&mut sink, &app, Some(webui.as_slice())).unwrap_err();
    assert!(matches!(
        err,
        BundleError::SizeOverflow {
            segment: ota_bundle::Segment::WebUi,
            len: 0x1_0000_0000
        }
    ));
    assert!(sink.is_empty());
}
