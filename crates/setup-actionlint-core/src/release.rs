//! actionlint release asset naming and download URLs.

use crate::platform::{Os, Platform};
use crate::version::Version;
use anyhow::{Context, Result};
use url::Url;

/// Upstream release download root; assets live under `v{version}/`.
pub const DEFAULT_RELEASE_BASE_URL: &str = "https://github.com/rhysd/actionlint/releases/download/";

/// Archive format of a release asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    TarGz,
}

impl ArchiveKind {
    pub fn for_os(os: Os) -> Self {
        match os {
            Os::Windows => ArchiveKind::Zip,
            Os::Darwin | Os::Linux => ArchiveKind::TarGz,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ArchiveKind::Zip => "zip",
            ArchiveKind::TarGz => "tar.gz",
        }
    }
}

/// One downloadable archive: `actionlint_{version}_{os}_{arch}.{ext}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAsset {
    pub version: Version,
    pub platform: Platform,
    pub kind: ArchiveKind,
}

impl ReleaseAsset {
    pub fn new(version: &Version, platform: Platform) -> Self {
        Self {
            version: version.clone(),
            platform,
            kind: ArchiveKind::for_os(platform.os),
        }
    }

    pub fn file_name(&self) -> String {
        format!(
            "actionlint_{}_{}_{}.{}",
            self.version,
            self.platform.os,
            self.platform.arch,
            self.kind.extension()
        )
    }
}

/// Where release assets are fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSource {
    base: Url,
}

impl ReleaseSource {
    /// Parse a base URL; a trailing `/` is added so joins stay under it.
    pub fn parse(base: &str) -> Result<Self> {
        let mut base =
            Url::parse(base).with_context(|| format!("invalid release base URL {base:?}"))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("release base URL {} cannot be used as a base", base);
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn asset_url(&self, asset: &ReleaseAsset) -> Result<Url> {
        self.release_file(&asset.version, &asset.file_name())
    }

    /// URL of the upstream `actionlint_{version}_checksums.txt`.
    pub fn checksums_url(&self, version: &Version) -> Result<Url> {
        self.release_file(version, &format!("actionlint_{version}_checksums.txt"))
    }

    fn release_file(&self, version: &Version, file: &str) -> Result<Url> {
        let url = self
            .base
            .join(&format!("v{version}/{file}"))
            .with_context(|| format!("build release URL for {file}"))?;
        Ok(url)
    }
}
