//! Runner platform detection and normalization.
//!
//! Maps the host's raw identifiers (`std::env::consts::{OS, ARCH}`) onto the
//! vocabulary used by actionlint release assets and the checksum table.

use crate::error::SetupError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating system, named as in actionlint release assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Darwin,
    Linux,
    Windows,
}

impl Os {
    pub fn as_str(self) -> &'static str {
        match self {
            Os::Darwin => "darwin",
            Os::Linux => "linux",
            Os::Windows => "windows",
        }
    }

    /// Parse a normalized name (`darwin`, `linux`, `windows`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "darwin" => Some(Os::Darwin),
            "linux" => Some(Os::Linux),
            "windows" => Some(Os::Windows),
            _ => None,
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU architecture, named as in actionlint release assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    Amd64,
    Arm64,
}

impl Arch {
    pub fn as_str(self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
        }
    }

    /// Parse a normalized name (`amd64`, `arm64`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "amd64" => Some(Arch::Amd64),
            "arm64" => Some(Arch::Arm64),
            _ => None,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw platform identifiers as reported by the host process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostPlatform<'a> {
    pub os: &'a str,
    pub arch: &'a str,
}

impl HostPlatform<'static> {
    pub fn current() -> Self {
        Self {
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
        }
    }
}

/// A normalized (os, arch) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    /// Resolve both halves of the host platform; both must be recognized.
    pub fn resolve(host: &HostPlatform<'_>) -> Result<Self, SetupError> {
        let os = resolve_os(host.os)?;
        let arch = resolve_arch(host.arch)?;
        Ok(Self { os, arch })
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.os, self.arch)
    }
}

pub fn resolve_os(raw: &str) -> Result<Os, SetupError> {
    match raw {
        "windows" => Ok(Os::Windows),
        "macos" => Ok(Os::Darwin),
        "linux" => Ok(Os::Linux),
        other => Err(SetupError::UnknownOs(other.to_string())),
    }
}

pub fn resolve_arch(raw: &str) -> Result<Arch, SetupError> {
    match raw {
        "x86_64" => Ok(Arch::Amd64),
        "aarch64" => Ok(Arch::Arm64),
        other => Err(SetupError::UnknownArch(other.to_string())),
    }
}
