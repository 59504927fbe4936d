//! SHA-256 hashing and archive verification.

use crate::error::SetupError;
use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Compute SHA-256 of a file and return the digest as lowercase hex.
/// The file handle is closed before this returns.
pub fn sha256_path(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

pub fn sha256_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Hash `archive` and compare against `expected` by exact string equality.
///
/// Both digests are logged; the returned error names neither.
pub fn verify_sha256(archive: &Path, expected: &str) -> Result<()> {
    tracing::info!("calculating checksum for {}", archive.display());
    let actual = sha256_path(archive)?;
    tracing::info!("  expected: {}", expected);
    tracing::info!("  actual:   {}", actual);
    if actual != expected {
        return Err(SetupError::ChecksumMismatch.into());
    }
    Ok(())
}
