//! Embedded checksum table: version -> OS -> arch -> SHA-256 hex digest.
//!
//! The table ships as `checksums.json` inside the binary and is validated once
//! when loaded. An override table can be loaded from disk with the same rules.

use crate::error::SetupError;
use crate::platform::{Arch, Os};
use crate::version::{Version, DEFAULT_VERSION};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

const EMBEDDED_JSON: &str = include_str!("../checksums.json");

/// Digests for one release, keyed by OS then architecture.
pub type PlatformDigests = BTreeMap<Os, BTreeMap<Arch, String>>;

type RawTable = BTreeMap<String, PlatformDigests>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumTable {
    entries: BTreeMap<Version, PlatformDigests>,
}

impl ChecksumTable {
    /// Load the table compiled into this binary.
    pub fn embedded() -> Result<Self, SetupError> {
        Self::from_json(EMBEDDED_JSON)
    }

    /// The override table at `path` if given, otherwise the embedded one.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_path(p),
            None => Ok(Self::embedded()?),
        }
    }

    /// Load an override table from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("read checksum table {}", path.display()))?;
        let table = Self::from_json(&data)
            .with_context(|| format!("load checksum table {}", path.display()))?;
        Ok(table)
    }

    /// Parse and validate a table. Rejects malformed version keys, digests that
    /// are not 64 lowercase hex characters, all-zero placeholder digests, and
    /// tables without the default version.
    pub fn from_json(data: &str) -> Result<Self, SetupError> {
        let raw: RawTable =
            serde_json::from_str(data).map_err(|e| SetupError::InvalidTable(e.to_string()))?;

        let mut entries = BTreeMap::new();
        for (key, platforms) in raw {
            let version = Version::parse(&key)
                .map_err(|_| SetupError::InvalidTable(format!("invalid version key {key:?}")))?;
            for (os, arches) in &platforms {
                for (arch, digest) in arches {
                    if !is_sha256_hex(digest) {
                        return Err(SetupError::InvalidTable(format!(
                            "digest for {key} {os}/{arch} is not 64 lowercase hex characters"
                        )));
                    }
                    if is_placeholder(digest) {
                        return Err(SetupError::InvalidTable(format!(
                            "digest for {key} {os}/{arch} is a placeholder"
                        )));
                    }
                }
            }
            entries.insert(version, platforms);
        }

        let table = Self { entries };
        let default = Version::parse(DEFAULT_VERSION)?;
        if !table.contains(&default) {
            return Err(SetupError::InvalidTable(format!(
                "default version {DEFAULT_VERSION} is missing"
            )));
        }
        Ok(table)
    }

    pub fn contains(&self, version: &Version) -> bool {
        self.entries.contains_key(version)
    }

    /// Versions in ascending order.
    pub fn versions(&self) -> impl DoubleEndedIterator<Item = &Version> {
        self.entries.keys()
    }

    pub fn platforms(&self, version: &Version) -> Option<&PlatformDigests> {
        self.entries.get(version)
    }

    /// Expected digest for a (version, os, arch) triple.
    ///
    /// Missing OS or arch entries fail with the keys that do exist at that level.
    pub fn lookup(&self, version: &Version, os: Os, arch: Arch) -> Result<&str, SetupError> {
        let by_os = self
            .entries
            .get(version)
            .ok_or_else(|| SetupError::UnsupportedVersion(version.to_string()))?;
        let by_arch = by_os.get(&os).ok_or_else(|| SetupError::UnsupportedOs {
            os,
            supported: join_keys(by_os.keys()),
        })?;
        let digest = by_arch.get(&arch).ok_or_else(|| SetupError::UnsupportedArch {
            arch,
            supported: join_keys(by_arch.keys()),
        })?;
        Ok(digest)
    }

    /// Insert or replace the digests for one release.
    pub fn merge_release(&mut self, version: Version, digests: PlatformDigests) {
        self.entries.insert(version, digests);
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        let raw: RawTable = self
            .entries
            .iter()
            .map(|(v, p)| (v.to_string(), p.clone()))
            .collect();
        let mut out = serde_json::to_string_pretty(&raw)?;
        out.push('\n');
        Ok(out)
    }
}

fn join_keys<T: std::fmt::Display>(keys: impl Iterator<Item = T>) -> String {
    keys.map(|k| k.to_string()).collect::<Vec<_>>().join(", ")
}

pub fn is_sha256_hex(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

fn is_placeholder(digest: &str) -> bool {
    digest.bytes().all(|b| b == b'0')
}

/// Parse an upstream `actionlint_{version}_checksums.txt` file.
///
/// Each line is `<digest>  actionlint_{version}_{os}_{arch}.{ext}`. Assets for
/// platforms outside the supported OS/arch set are skipped.
pub fn parse_release_checksums(version: &Version, text: &str) -> Result<PlatformDigests, SetupError> {
    let prefix = format!("actionlint_{version}_");
    let mut digests = PlatformDigests::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let malformed = || SetupError::InvalidTable(format!("malformed checksums line: {line:?}"));
        let (digest, name) = line.split_once(char::is_whitespace).ok_or_else(malformed)?;
        let name = name.trim_start().trim_start_matches('*');
        if !is_sha256_hex(digest) {
            return Err(malformed());
        }

        let Some(rest) = name.strip_prefix(&prefix) else {
            continue;
        };
        let Some(stem) = rest
            .strip_suffix(".tar.gz")
            .or_else(|| rest.strip_suffix(".zip"))
        else {
            continue;
        };
        let Some((os, arch)) = stem.split_once('_') else {
            continue;
        };
        if let (Some(os), Some(arch)) = (Os::from_name(os), Arch::from_name(arch)) {
            digests
                .entry(os)
                .or_default()
                .insert(arch, digest.to_string());
        }
    }

    if digests.is_empty() {
        return Err(SetupError::InvalidTable(format!(
            "no supported assets listed for actionlint {version}"
        )));
    }
    Ok(digests)
}
