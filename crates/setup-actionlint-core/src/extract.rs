//! Archive extraction for release assets (tar.gz and zip).
//!
//! Both extractors refuse entries that would escape `dest`.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::path::Path;
use tar::Archive;

/// Unpack a gzip-compressed tarball into `dest`, preserving file modes.
pub fn extract_tar_gz(archive: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive).with_context(|| format!("open {}", archive.display()))?;
    fs::create_dir_all(dest).with_context(|| format!("create {}", dest.display()))?;

    let mut tar = Archive::new(GzDecoder::new(file));
    tar.set_preserve_permissions(true);
    tar.unpack(dest)
        .with_context(|| format!("extract {} to {}", archive.display(), dest.display()))?;
    tracing::debug!("extracted {} to {}", archive.display(), dest.display());
    Ok(())
}

/// Unpack a zip archive into `dest`.
pub fn extract_zip(archive: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive).with_context(|| format!("open {}", archive.display()))?;
    fs::create_dir_all(dest).with_context(|| format!("create {}", dest.display()))?;

    let mut zip = zip::ZipArchive::new(file)
        .with_context(|| format!("read zip archive {}", archive.display()))?;
    zip.extract(dest)
        .with_context(|| format!("extract {} to {}", archive.display(), dest.display()))?;
    tracing::debug!("extracted {} to {}", archive.display(), dest.display());
    Ok(())
}
