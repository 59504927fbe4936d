//! CLI command handlers, one per file.

mod checksum;
mod fetch_checksums;
mod install;
mod versions;

pub use checksum::run_checksum;
pub use fetch_checksums::run_fetch_checksums;
pub use install::run_install;
pub use versions::run_versions;
