//! Version parsing and resolution against the checksum table.

use crate::error::SetupError;
use crate::table::ChecksumTable;
use std::cmp::Ordering;
use std::fmt;

/// Version installed when the input is empty or `latest`.
pub const DEFAULT_VERSION: &str = "1.7.7";

/// A syntactically valid `x.y.z` release version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    /// Parse `x.y.z` where each component is `0` or a decimal without leading zeros.
    pub fn parse(s: &str) -> Result<Self, SetupError> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 || !parts.iter().all(|p| is_numeric_component(p)) {
            return Err(SetupError::InvalidVersion(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn components(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0.split('.').map(|p| (p.len(), p))
    }
}

// Components never carry leading zeros, so a longer digit string is the
// larger number and equal lengths compare lexicographically.
impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.components().cmp(other.components())
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_numeric_component(p: &str) -> bool {
    if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    p == "0" || !p.starts_with('0')
}

/// Turn raw user input into a version that is a key of `table`.
///
/// Empty input and `latest` map to [`DEFAULT_VERSION`]. A well-formed version
/// missing from the table is reported separately from malformed input.
pub fn resolve_version(raw: &str, table: &ChecksumTable) -> Result<Version, SetupError> {
    let version = if raw.is_empty() || raw == "latest" {
        Version::parse(DEFAULT_VERSION)?
    } else {
        Version::parse(raw)?
    };
    if !table.contains(&version) {
        return Err(SetupError::UnsupportedVersion(version.0));
    }
    Ok(version)
}
