//! Install flow: resolve, check cache, download, verify, extract, cache, publish.
//!
//! Every step consumes the previous step's output, so verification always
//! precedes extraction and extraction always precedes caching. Nothing here
//! retries; a failed step ends the run.

use crate::checksum;
use crate::platform::{HostPlatform, Platform};
use crate::release::{ArchiveKind, ReleaseAsset, ReleaseSource};
use crate::table::ChecksumTable;
use crate::toolkit::Toolkit;
use crate::version::{resolve_version, Version};
use anyhow::Result;
use std::path::PathBuf;

/// Name under which the tool is stored in the tool cache.
pub const TOOL_NAME: &str = "actionlint";

/// Everything needed to fetch and check one archive, resolved once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub asset: ReleaseAsset,
    pub expected_sha256: String,
}

impl Selection {
    /// Resolve the runner platform and look up the expected digest.
    pub fn resolve(
        version: &Version,
        host: &HostPlatform<'_>,
        table: &ChecksumTable,
    ) -> Result<Self> {
        let platform = Platform::resolve(host)?;
        let expected = table.lookup(version, platform.os, platform.arch)?;
        Ok(Self {
            asset: ReleaseAsset::new(version, platform),
            expected_sha256: expected.to_string(),
        })
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub version: Version,
    pub cache_hit: bool,
    /// Directory added to PATH.
    pub path: PathBuf,
}

/// Install actionlint for `raw_version` (`""`/`latest`/`x.y.z`).
///
/// The `version` output is published as soon as it is resolved and
/// `cache-hit` right after the cache lookup, so both survive later failures.
pub fn install<T: Toolkit + ?Sized>(
    raw_version: &str,
    host: &HostPlatform<'_>,
    table: &ChecksumTable,
    release: &ReleaseSource,
    toolkit: &mut T,
) -> Result<InstallOutcome> {
    let version = resolve_version(raw_version, table)?;
    toolkit.set_output("version", version.as_str())?;

    let cached = toolkit.find_cached(TOOL_NAME, version.as_str())?;
    toolkit.set_output("cache-hit", if cached.is_some() { "true" } else { "false" })?;
    if let Some(dir) = cached {
        toolkit.add_to_path(&dir)?;
        tracing::info!("cache hit for actionlint {}", version);
        return Ok(InstallOutcome {
            version,
            cache_hit: true,
            path: dir,
        });
    }

    let selection = Selection::resolve(&version, host, table)?;
    let url = release.asset_url(&selection.asset)?;
    tracing::info!("downloading actionlint from {}", url);
    let archive = toolkit.download(&url)?;

    checksum::verify_sha256(&archive, &selection.expected_sha256)?;

    tracing::info!("extracting {}", archive.display());
    let extracted = match selection.asset.kind {
        ArchiveKind::Zip => toolkit.extract_zip(&archive)?,
        ArchiveKind::TarGz => toolkit.extract_tar(&archive)?,
    };

    tracing::info!("caching {}", extracted.display());
    let installed = toolkit.cache_dir(&extracted, TOOL_NAME, version.as_str())?;

    toolkit.add_to_path(&installed)?;
    tracing::info!("installed actionlint {} to {}", version, installed.display());
    Ok(InstallOutcome {
        version,
        cache_hit: false,
        path: installed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::sha256_bytes;
    use crate::error::SetupError;
    use crate::release::DEFAULT_RELEASE_BASE_URL;
    use std::path::Path;
    use url::Url;

    const OTHER: &str = "abababababababababababababababababababababababababababababababab";
    const ARCHIVE_BODY: &[u8] = b"pretend this is a tarball";

    /// Records every call; serves `archive_body` from a temp file on download.
    struct FakeToolkit {
        dir: tempfile::TempDir,
        cached: Option<PathBuf>,
        archive_body: Vec<u8>,
        calls: Vec<String>,
        outputs: Vec<(String, String)>,
        path_entries: Vec<PathBuf>,
        fail_download: bool,
    }

    impl FakeToolkit {
        fn new() -> Self {
            Self {
                dir: tempfile::tempdir().unwrap(),
                cached: None,
                archive_body: ARCHIVE_BODY.to_vec(),
                calls: Vec::new(),
                outputs: Vec::new(),
                path_entries: Vec::new(),
                fail_download: false,
            }
        }

        fn called(&self, name: &str) -> bool {
            self.calls.iter().any(|c| c.starts_with(name))
        }

        fn output(&self, key: &str) -> Option<&str> {
            self.outputs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        }
    }

    impl Toolkit for FakeToolkit {
        fn find_cached(&mut self, tool: &str, version: &str) -> Result<Option<PathBuf>> {
            self.calls.push(format!("find_cached {tool} {version}"));
            Ok(self.cached.clone())
        }

        fn download(&mut self, url: &Url) -> Result<PathBuf> {
            self.calls.push(format!("download {url}"));
            if self.fail_download {
                anyhow::bail!("GET {} returned HTTP 404", url);
            }
            let path = self.dir.path().join("archive");
            std::fs::write(&path, &self.archive_body)?;
            Ok(path)
        }

        fn extract_zip(&mut self, archive: &Path) -> Result<PathBuf> {
            self.calls.push(format!("extract_zip {}", archive.display()));
            Ok(self.dir.path().join("extracted"))
        }

        fn extract_tar(&mut self, archive: &Path) -> Result<PathBuf> {
            self.calls.push(format!("extract_tar {}", archive.display()));
            Ok(self.dir.path().join("extracted"))
        }

        fn cache_dir(&mut self, source: &Path, tool: &str, version: &str) -> Result<PathBuf> {
            self.calls
                .push(format!("cache_dir {} {tool} {version}", source.display()));
            Ok(PathBuf::from("/cache").join(tool).join(version))
        }

        fn add_to_path(&mut self, dir: &Path) -> Result<()> {
            self.calls.push(format!("add_to_path {}", dir.display()));
            self.path_entries.push(dir.to_path_buf());
            Ok(())
        }

        fn set_output(&mut self, key: &str, value: &str) -> Result<()> {
            self.outputs.push((key.to_string(), value.to_string()));
            Ok(())
        }
    }

    fn table_with(linux_amd64: &str) -> ChecksumTable {
        let json = format!(
            r#"{{"1.7.7": {{
                "linux": {{"amd64": "{linux_amd64}", "arm64": "{OTHER}"}},
                "windows": {{"amd64": "{linux_amd64}"}}
            }}}}"#
        );
        ChecksumTable::from_json(&json).unwrap()
    }

    fn release() -> ReleaseSource {
        ReleaseSource::parse(DEFAULT_RELEASE_BASE_URL).unwrap()
    }

    const LINUX_AMD64: HostPlatform<'static> = HostPlatform {
        os: "linux",
        arch: "x86_64",
    };

    #[test]
    fn cache_hit_skips_network() {
        let table = table_with(OTHER);
        let mut tk = FakeToolkit::new();
        tk.cached = Some(PathBuf::from("/cache/actionlint/1.7.7/x64"));

        let out = install("1.7.7", &LINUX_AMD64, &table, &release(), &mut tk).unwrap();
        assert!(out.cache_hit);
        assert_eq!(out.version.as_str(), "1.7.7");
        assert_eq!(out.path, PathBuf::from("/cache/actionlint/1.7.7/x64"));
        assert_eq!(tk.output("version"), Some("1.7.7"));
        assert_eq!(tk.output("cache-hit"), Some("true"));
        assert_eq!(tk.path_entries, vec![out.path.clone()]);
        assert!(!tk.called("download"));
        assert!(!tk.called("extract"));
        assert!(!tk.called("cache_dir"));
    }

    #[test]
    fn cache_hit_does_not_need_a_known_platform() {
        let table = table_with(OTHER);
        let mut tk = FakeToolkit::new();
        tk.cached = Some(PathBuf::from("/cache/actionlint/1.7.7/x64"));
        let host = HostPlatform {
            os: "freebsd",
            arch: "x86_64",
        };
        assert!(install("", &host, &table, &release(), &mut tk).unwrap().cache_hit);
    }

    #[test]
    fn cache_miss_downloads_verifies_extracts_and_caches() {
        let table = table_with(&sha256_bytes(ARCHIVE_BODY));
        let mut tk = FakeToolkit::new();

        let out = install("1.7.7", &LINUX_AMD64, &table, &release(), &mut tk).unwrap();
        assert!(!out.cache_hit);
        assert_eq!(out.path, PathBuf::from("/cache/actionlint/1.7.7"));
        assert_eq!(tk.output("version"), Some("1.7.7"));
        assert_eq!(tk.output("cache-hit"), Some("false"));
        assert_eq!(
            tk.calls[1],
            "download https://github.com/rhysd/actionlint/releases/download/v1.7.7/actionlint_1.7.7_linux_amd64.tar.gz"
        );
        assert!(tk.calls[2].starts_with("extract_tar "));
        assert!(tk.calls[3].starts_with("cache_dir "));
        assert!(tk.calls[3].ends_with(" actionlint 1.7.7"));
        assert_eq!(tk.path_entries, vec![PathBuf::from("/cache/actionlint/1.7.7")]);
    }

    #[test]
    fn windows_uses_zip() {
        let table = table_with(&sha256_bytes(ARCHIVE_BODY));
        let mut tk = FakeToolkit::new();
        let host = HostPlatform {
            os: "windows",
            arch: "x86_64",
        };
        install("latest", &host, &table, &release(), &mut tk).unwrap();
        assert!(tk.calls[1].ends_with("actionlint_1.7.7_windows_amd64.zip"));
        assert!(tk.called("extract_zip"));
        assert!(!tk.called("extract_tar"));
    }

    #[test]
    fn checksum_mismatch_stops_before_extract() {
        let table = table_with(&sha256_bytes(b"the real archive"));
        let mut tk = FakeToolkit::new();

        let err = install("1.7.7", &LINUX_AMD64, &table, &release(), &mut tk).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SetupError>(),
            Some(&SetupError::ChecksumMismatch)
        );
        assert!(tk.called("download"));
        assert!(!tk.called("extract"));
        assert!(!tk.called("cache_dir"));
        assert!(tk.path_entries.is_empty());
        assert_eq!(tk.output("version"), Some("1.7.7"));
    }

    #[test]
    fn unsupported_version_fails_before_outputs() {
        let table = table_with(OTHER);
        let mut tk = FakeToolkit::new();
        let err = install("9.9.9", &LINUX_AMD64, &table, &release(), &mut tk).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SetupError>(),
            Some(&SetupError::UnsupportedVersion("9.9.9".into()))
        );
        assert!(tk.outputs.is_empty());
        assert!(tk.calls.is_empty());
    }

    #[test]
    fn malformed_version_is_reported_as_such() {
        let table = table_with(OTHER);
        let mut tk = FakeToolkit::new();
        let err = install("v1.7.7", &LINUX_AMD64, &table, &release(), &mut tk).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SetupError>(),
            Some(SetupError::InvalidVersion(_))
        ));
    }

    #[test]
    fn unknown_platform_fails_before_download() {
        let table = table_with(OTHER);
        let mut tk = FakeToolkit::new();
        let host = HostPlatform {
            os: "linux",
            arch: "s390x",
        };
        let err = install("1.7.7", &host, &table, &release(), &mut tk).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SetupError>(),
            Some(SetupError::UnknownArch(_))
        ));
        assert_eq!(tk.output("version"), Some("1.7.7"));
        assert_eq!(tk.output("cache-hit"), Some("false"));
        assert!(!tk.called("download"));
    }

    #[test]
    fn platform_missing_from_table_fails_before_download() {
        let table = table_with(OTHER);
        let mut tk = FakeToolkit::new();
        let host = HostPlatform {
            os: "macos",
            arch: "aarch64",
        };
        let err = install("1.7.7", &host, &table, &release(), &mut tk).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported runner OS: darwin. Supported OS are: linux, windows"
        );
        assert!(!tk.called("download"));
    }

    #[test]
    fn download_failure_is_fatal() {
        let table = table_with(OTHER);
        let mut tk = FakeToolkit::new();
        tk.fail_download = true;
        let err = install("1.7.7", &LINUX_AMD64, &table, &release(), &mut tk).unwrap_err();
        assert!(err.to_string().contains("HTTP 404"));
        assert!(!tk.called("extract"));
    }

    #[test]
    fn selection_carries_expected_digest() {
        let digest = sha256_bytes(b"x");
        let table = table_with(&digest);
        let v = Version::parse("1.7.7").unwrap();
        let sel = Selection::resolve(&v, &LINUX_AMD64, &table).unwrap();
        assert_eq!(sel.expected_sha256, digest);
        assert_eq!(sel.asset.file_name(), "actionlint_1.7.7_linux_amd64.tar.gz");
    }
}
