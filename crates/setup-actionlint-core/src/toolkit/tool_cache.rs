//! Persistent tool cache with the hosted-runner layout.
//!
//! Entries live at `{root}/{tool}/{version}/{arch}` and count as present only
//! once the sibling `{arch}.complete` marker exists, so an interrupted copy is
//! never reported as a hit.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Host architecture in the naming used by hosted tool caches (`x64`, `arm64`).
pub fn host_cache_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        "x86" => "x32",
        other => other,
    }
}

#[derive(Debug, Clone)]
pub struct ToolCache {
    root: PathBuf,
    arch: String,
}

impl ToolCache {
    pub fn new(root: impl Into<PathBuf>, arch: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            arch: arch.into(),
        }
    }

    /// Cache rooted at `root` for the current host architecture.
    pub fn for_host(root: impl Into<PathBuf>) -> Self {
        Self::new(root, host_cache_arch())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, tool: &str, version: &str) -> PathBuf {
        self.root.join(tool).join(version).join(&self.arch)
    }

    fn marker_path(&self, tool: &str, version: &str) -> PathBuf {
        self.root
            .join(tool)
            .join(version)
            .join(format!("{}.complete", self.arch))
    }

    /// Complete entry for `(tool, version)`, if any.
    pub fn find(&self, tool: &str, version: &str) -> Option<PathBuf> {
        if tool.is_empty() || version.is_empty() {
            return None;
        }
        let entry = self.entry_path(tool, version);
        if entry.is_dir() && self.marker_path(tool, version).is_file() {
            tracing::debug!("found {} {} in tool cache at {}", tool, version, entry.display());
            Some(entry)
        } else {
            tracing::debug!("{} {} not found in tool cache", tool, version);
            None
        }
    }

    /// Copy the contents of `source` into the cache entry for `(tool, version)`,
    /// replacing any previous entry. The marker is written last.
    pub fn cache_dir(&self, source: &Path, tool: &str, version: &str) -> Result<PathBuf> {
        if tool.is_empty() {
            anyhow::bail!("tool name is required to cache a directory");
        }
        if version.is_empty() {
            anyhow::bail!("version is required to cache a directory");
        }
        if !source.is_dir() {
            anyhow::bail!("{} is not a directory", source.display());
        }

        let entry = self.entry_path(tool, version);
        let marker = self.marker_path(tool, version);
        remove_if_exists(&marker)?;
        if entry.exists() {
            fs::remove_dir_all(&entry)
                .with_context(|| format!("remove stale cache entry {}", entry.display()))?;
        }
        fs::create_dir_all(&entry).with_context(|| format!("create {}", entry.display()))?;

        copy_dir_all(source, &entry).with_context(|| {
            format!("copy {} to {}", source.display(), entry.display())
        })?;
        fs::write(&marker, b"").with_context(|| format!("write {}", marker.display()))?;

        tracing::debug!("cached {} {} at {}", tool, version, entry.display());
        Ok(entry)
    }
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("remove {}", path.display())),
    }
}

/// Recursively copy `src` into the existing directory `dst`. `fs::copy` carries
/// file permissions along.
fn copy_dir_all(src: &Path, dst: &Path) -> io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            fs::create_dir_all(&target)?;
            copy_dir_all(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
