//! [`Toolkit`] backed by the local filesystem, libcurl and the runner's
//! workflow files.
//!
//! Downloaded archives and extraction dirs are scratch: they live under the
//! temp root only until the extracted tree is in the tool cache, or until the
//! toolkit is dropped if the run fails before that.

use super::tool_cache::ToolCache;
use super::Toolkit;
use crate::config::SetupConfig;
use crate::extract;
use crate::fetch::{self, HttpOptions};
use crate::workflow::WorkflowFiles;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, TempPath};
use url::Url;

pub struct RunnerToolkit {
    cache: ToolCache,
    temp_root: PathBuf,
    http: HttpOptions,
    workflow: WorkflowFiles,
    downloads: Vec<TempPath>,
    extracted: Vec<TempDir>,
}

impl RunnerToolkit {
    pub fn new(
        cache: ToolCache,
        temp_root: PathBuf,
        http: HttpOptions,
        workflow: WorkflowFiles,
    ) -> Self {
        Self {
            cache,
            temp_root,
            http,
            workflow,
            downloads: Vec::new(),
            extracted: Vec::new(),
        }
    }

    /// Toolkit for the current runner: directories from config/env, workflow files from env.
    pub fn from_config(cfg: &SetupConfig) -> Result<Self> {
        let cache = ToolCache::for_host(cfg.tool_cache_dir()?);
        let temp_root = cfg.temp_root()?;
        tracing::debug!(
            "tool cache at {}, temp dir at {}",
            cache.root().display(),
            temp_root.display()
        );
        Ok(Self::new(
            cache,
            temp_root,
            HttpOptions::from(&cfg.http),
            WorkflowFiles::from_env(),
        ))
    }

    fn ensure_temp_root(&self) -> Result<()> {
        fs::create_dir_all(&self.temp_root)
            .with_context(|| format!("create temp dir {}", self.temp_root.display()))
    }

    /// Fresh extraction dir under the temp root, removed with the other scratch.
    fn fresh_dir(&mut self) -> Result<PathBuf> {
        self.ensure_temp_root()?;
        let dir = tempfile::Builder::new()
            .prefix("extract-")
            .tempdir_in(&self.temp_root)
            .with_context(|| format!("create temp dir in {}", self.temp_root.display()))?;
        let path = dir.path().to_path_buf();
        self.extracted.push(dir);
        Ok(path)
    }

    /// Remove downloaded archives and extraction dirs created so far.
    pub fn clear_scratch(&mut self) {
        for path in self.downloads.drain(..) {
            if let Err(e) = path.close() {
                tracing::debug!("could not remove download: {}", e);
            }
        }
        for dir in self.extracted.drain(..) {
            if let Err(e) = dir.close() {
                tracing::debug!("could not remove extraction dir: {}", e);
            }
        }
    }
}

impl Drop for RunnerToolkit {
    fn drop(&mut self) {
        self.clear_scratch();
    }
}

impl Toolkit for RunnerToolkit {
    fn find_cached(&mut self, tool: &str, version: &str) -> Result<Option<PathBuf>> {
        Ok(self.cache.find(tool, version))
    }

    fn download(&mut self, url: &Url) -> Result<PathBuf> {
        self.ensure_temp_root()?;
        let dest = tempfile::Builder::new()
            .prefix("download-")
            .tempfile_in(&self.temp_root)
            .with_context(|| format!("create download file in {}", self.temp_root.display()))?
            .into_temp_path();
        let path = dest.to_path_buf();
        self.downloads.push(dest);
        fetch::download_to_file(url, &path, &self.http)?;
        Ok(path)
    }

    fn extract_zip(&mut self, archive: &Path) -> Result<PathBuf> {
        let dest = self.fresh_dir()?;
        extract::extract_zip(archive, &dest)?;
        Ok(dest)
    }

    fn extract_tar(&mut self, archive: &Path) -> Result<PathBuf> {
        let dest = self.fresh_dir()?;
        extract::extract_tar_gz(archive, &dest)?;
        Ok(dest)
    }

    fn cache_dir(&mut self, source: &Path, tool: &str, version: &str) -> Result<PathBuf> {
        let cached = self.cache.cache_dir(source, tool, version)?;
        self.clear_scratch();
        Ok(cached)
    }

    fn add_to_path(&mut self, dir: &Path) -> Result<()> {
        self.workflow.add_path(dir)
    }

    fn set_output(&mut self, key: &str, value: &str) -> Result<()> {
        self.workflow.set_output(key, value)
    }
}
