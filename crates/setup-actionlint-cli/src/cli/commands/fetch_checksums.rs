//! `setup-actionlint fetch-checksums` – regenerate a table entry from upstream.

use anyhow::{Context, Result};
use setup_actionlint_core::config::SetupConfig;
use setup_actionlint_core::fetch::{self, HttpOptions};
use setup_actionlint_core::release::ReleaseSource;
use setup_actionlint_core::table::{parse_release_checksums, ChecksumTable};
use setup_actionlint_core::version::Version;
use std::path::Path;

/// Fetch `actionlint_{version}_checksums.txt`, merge it into the table and
/// print the result as JSON on stdout.
pub fn run_fetch_checksums(cfg: &SetupConfig, version: &str, table: Option<&Path>) -> Result<()> {
    let version = Version::parse(version)?;
    let mut table = ChecksumTable::load(table.or(cfg.checksums_file.as_deref()))?;

    let release = ReleaseSource::parse(&cfg.release_base_url)?;
    let url = release.checksums_url(&version)?;
    tracing::info!("fetching {}", url);
    let text = fetch::fetch_text(&url, &HttpOptions::from(&cfg.http))?;
    let digests = parse_release_checksums(&version, &text)
        .with_context(|| format!("parse {}", url))?;

    table.merge_release(version, digests);
    print!("{}", table.to_json_pretty()?);
    Ok(())
}
