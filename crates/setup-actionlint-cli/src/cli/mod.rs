//! CLI for setup-actionlint.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use setup_actionlint_core::config::SetupConfig;
use std::path::PathBuf;

use commands::{run_checksum, run_fetch_checksums, run_install, run_versions};

/// Top-level CLI for setup-actionlint.
#[derive(Debug, Parser)]
#[command(name = "setup-actionlint")]
#[command(about = "Install a checksum-verified actionlint release on a CI runner", long_about = None)]
pub struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/setup-actionlint/config.toml if present).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Append logs to this file instead of stderr.
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Install actionlint, add it to PATH and publish the `version` and `cache-hit` outputs.
    Install {
        /// "latest" or x.y.z. Defaults to the action's `version` input (INPUT_VERSION).
        #[arg(long)]
        version: Option<String>,
    },

    /// List the versions and platforms in the checksum table.
    Versions,

    /// Compute SHA-256 of a file (e.g. a downloaded release archive).
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },

    /// Download a release's upstream checksums file and print the updated table as JSON.
    FetchChecksums {
        /// Release version (x.y.z).
        version: String,

        /// Table to merge into (default: the active table).
        #[arg(long, value_name = "PATH")]
        table: Option<PathBuf>,
    },
}

impl CliCommand {
    pub fn run(self, cfg: &SetupConfig) -> Result<()> {
        match self {
            CliCommand::Install { version } => run_install(cfg, version.as_deref())?,
            CliCommand::Versions => run_versions(cfg)?,
            CliCommand::Checksum { path } => run_checksum(&path)?,
            CliCommand::FetchChecksums { version, table } => {
                run_fetch_checksums(cfg, &version, table.as_deref())?
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
