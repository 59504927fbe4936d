//! `setup-actionlint install` – the action's main step.

use anyhow::Result;
use setup_actionlint_core::config::SetupConfig;
use setup_actionlint_core::platform::HostPlatform;
use setup_actionlint_core::release::ReleaseSource;
use setup_actionlint_core::table::ChecksumTable;
use setup_actionlint_core::toolkit::RunnerToolkit;
use setup_actionlint_core::{install, workflow};

pub fn run_install(cfg: &SetupConfig, version: Option<&str>) -> Result<()> {
    let raw = match version {
        Some(v) => v.trim().to_string(),
        None => workflow::get_input("version"),
    };
    let table = ChecksumTable::load(cfg.checksums_file.as_deref())?;
    let release = ReleaseSource::parse(&cfg.release_base_url)?;
    let mut toolkit = RunnerToolkit::from_config(cfg)?;

    let outcome = install(&raw, &HostPlatform::current(), &table, &release, &mut toolkit)?;
    tracing::debug!(
        "actionlint {} ready at {} (cache hit: {})",
        outcome.version,
        outcome.path.display(),
        outcome.cache_hit
    );
    Ok(())
}
