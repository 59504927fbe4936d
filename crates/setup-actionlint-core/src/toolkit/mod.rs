//! Runner toolkit: everything the install flow needs from its host.
//!
//! The install flow only depends on the [`Toolkit`] trait. [`RunnerToolkit`]
//! is the real implementation for GitHub Actions runners (and local runs).

mod runner;
mod tool_cache;

pub use runner::RunnerToolkit;
pub use tool_cache::{host_cache_arch, ToolCache};

use anyhow::Result;
use std::path::{Path, PathBuf};
use url::Url;

/// Host services used by the install flow. Logging goes through `tracing`.
pub trait Toolkit {
    /// Cached install dir for `(tool, version)`, if a complete entry exists.
    fn find_cached(&mut self, tool: &str, version: &str) -> Result<Option<PathBuf>>;

    /// Download `url` to a fresh local file and return its path.
    fn download(&mut self, url: &Url) -> Result<PathBuf>;

    /// Extract a zip archive into a fresh directory and return it.
    fn extract_zip(&mut self, archive: &Path) -> Result<PathBuf>;

    /// Extract a tar.gz archive into a fresh directory and return it.
    fn extract_tar(&mut self, archive: &Path) -> Result<PathBuf>;

    /// Copy `source` into the tool cache under `(tool, version)`; returns the cached path.
    fn cache_dir(&mut self, source: &Path, tool: &str, version: &str) -> Result<PathBuf>;

    fn add_to_path(&mut self, dir: &Path) -> Result<()>;

    fn set_output(&mut self, key: &str, value: &str) -> Result<()>;
}
