// Licensed under the Apache-2.0 license

use anyhow::{Context, Result};
use ota_bundle::{validate_app_image, write_bundle, AppDescriptorCheck, Bundle, BundleSummary};
use std::fs;
use std::path::Path;
use tempfile::{Builder, NamedTempFile};

fn load_file(path: &Path) -> Result<Vec<u8>> {
    let data = fs::read(path).with_context(|| format!("Cannot read file '{}'", path.display()))?;
    log::debug!("read {} bytes from {}", data.len(), path.display());
    Ok(data)
}

/// Validates the app image and writes the bundle to `output`.
///
/// The bundle is written to a temporary file next to `output` and renamed into
/// place once complete, so `output` is either the full bundle or untouched.
/// With `verify` set, the staged bundle is re-read and checked before the
/// rename.
pub(crate) fn create_bundle(
    app_path: &Path,
    webui_path: Option<&Path>,
    output: &Path,
    verify: bool,
) -> Result<BundleSummary> {
    let app = load_file(app_path)?;
    validate_app_image(&app)
        .with_context(|| format!("Invalid app image '{}'", app_path.display()))?;

    let webui = webui_path.map(load_file).transpose()?;

    let mut tmp = staging_file(output)?;
    log::debug!("staging bundle in {}", tmp.path().display());

    let summary = write_bundle(tmp.as_file_mut(), &app, webui.as_deref())
        .with_context(|| format!("Unable to write bundle '{}'", output.display()))?;
    commit(tmp, output, verify)?;

    log::info!(
        "wrote {} ({} bytes, webui {})",
        output.display(),
        summary.total_size,
        if summary.webui_size.is_some() {
            "included"
        } else {
            "absent"
        }
    );
    Ok(summary)
}

/// Creates the temporary file the bundle is staged in. It gets the mode a
/// plain create would give (0o666 less the umask), or the mode of the bundle
/// it replaces.
fn staging_file(output: &Path) -> Result<NamedTempFile> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let tmp = builder
        .tempfile_in(dir)
        .with_context(|| format!("Unable to create temporary file in '{}'", dir.display()))?;

    if let Ok(existing) = fs::metadata(output) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .with_context(|| format!("Unable to set permissions of '{}'", tmp.path().display()))?;
    }
    Ok(tmp)
}

/// Moves the staged bundle onto `output`. The staged file is removed instead
/// if verification fails.
fn commit(tmp: NamedTempFile, output: &Path, verify: bool) -> Result<()> {
    if verify {
        verify_bundle(tmp.path())
            .with_context(|| format!("Verification of '{}' failed", output.display()))?;
    }
    tmp.persist(output)
        .with_context(|| format!("Unable to create file '{}'", output.display()))?;
    Ok(())
}

/// Reads a bundle back and applies the device-side acceptance checks.
pub(crate) fn verify_bundle(path: &Path) -> Result<BundleSummary> {
    let data = load_file(path)?;
    let bundle =
        Bundle::parse(&data).with_context(|| format!("Invalid bundle '{}'", path.display()))?;
    bundle
        .validate_app(&AppDescriptorCheck::default())
        .with_context(|| format!("Invalid app image in bundle '{}'", path.display()))?;

    log::debug!("bundle {} is valid", path.display());
    Ok(bundle.summary())
}
