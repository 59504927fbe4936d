//! `setup-actionlint versions` – list what the checksum table covers.

use anyhow::Result;
use setup_actionlint_core::config::SetupConfig;
use setup_actionlint_core::table::{ChecksumTable, PlatformDigests};
use setup_actionlint_core::version::DEFAULT_VERSION;

pub fn run_versions(cfg: &SetupConfig) -> Result<()> {
    let table = ChecksumTable::load(cfg.checksums_file.as_deref())?;
    for version in table.versions().rev() {
        let platforms = table.platforms(version).map(format_platforms).unwrap_or_default();
        let label = if version.as_str() == DEFAULT_VERSION {
            format!("{version} (latest)")
        } else {
            version.to_string()
        };
        println!("{:<16} {}", label, platforms);
    }
    Ok(())
}

fn format_platforms(platforms: &PlatformDigests) -> String {
    platforms
        .iter()
        .flat_map(|(os, arches)| arches.keys().map(move |arch| format!("{os}/{arch}")))
        .collect::<Vec<_>>()
        .join(" ")
}
