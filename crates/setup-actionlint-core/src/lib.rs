//! Install a checksum-verified actionlint release on CI runners.

pub mod config;
pub mod logging;

pub mod checksum;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod install;
pub mod platform;
pub mod release;
pub mod table;
pub mod toolkit;
pub mod version;
pub mod workflow;

pub use error::{ErrorClass, SetupError};
pub use install::{install, InstallOutcome, Selection, TOOL_NAME};
