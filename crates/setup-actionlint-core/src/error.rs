//! Domain errors for version/platform resolution and integrity checks.
//!
//! Transport, extraction and cache failures are not modelled here; they flow
//! through `anyhow` with context attached at the call site.

use crate::platform::{Arch, Os};
use thiserror::Error;

/// Broad class of a [`SetupError`], used by callers that need to tell user
/// input problems apart from integrity failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad or unsupported input (version string, runner OS/arch).
    Validation,
    /// Downloaded bytes did not match the expected digest.
    Integrity,
    /// The checksum table itself is malformed.
    Table,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("invalid version: \"{0}\". Expected \"latest\" or \"x.y.z\"")]
    InvalidVersion(String),

    #[error(
        "unsupported version: \"{0}\". You may need a newer release of setup-actionlint (or a newer checksum table) to install this version of actionlint"
    )]
    UnsupportedVersion(String),

    #[error("unknown runner OS: {0}. Supported OS are: darwin, linux, windows")]
    UnknownOs(String),

    #[error("unknown runner architecture: {0}. Supported architectures are: amd64, arm64")]
    UnknownArch(String),

    #[error("unsupported runner OS: {os}. Supported OS are: {supported}")]
    UnsupportedOs { os: Os, supported: String },

    #[error("unsupported runner architecture: {arch}. Supported architectures are: {supported}")]
    UnsupportedArch { arch: Arch, supported: String },

    /// Deliberately carries no operands; both digests are logged before this is raised.
    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("invalid checksum table: {0}")]
    InvalidTable(String),
}

impl SetupError {
    pub fn class(&self) -> ErrorClass {
        match self {
            SetupError::ChecksumMismatch => ErrorClass::Integrity,
            SetupError::InvalidTable(_) => ErrorClass::Table,
            _ => ErrorClass::Validation,
        }
    }
}
