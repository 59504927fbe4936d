//! GitHub Actions workflow plumbing: inputs, outputs, PATH additions and
//! failure annotations.
//!
//! Outputs and PATH entries go through the runner's environment files
//! (`$GITHUB_OUTPUT`, `$GITHUB_PATH`). Without them (older runners, local
//! runs) the equivalent `::command::` lines are printed to stdout.

use anyhow::{Context, Result};
use std::env;
use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Read an action input the way the runner passes it: `INPUT_{NAME}`,
/// uppercased with spaces as underscores, trimmed. Missing inputs are empty.
pub fn get_input(name: &str) -> String {
    std::env::var(input_env_name(name))
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

fn input_env_name(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Escape a message for use in a workflow command.
pub fn escape_data(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

/// Mark the step as failed with `message`. The caller sets the exit status.
pub fn set_failed(message: &str) {
    println!("::error::{}", escape_data(message));
}

/// Destinations for outputs and PATH additions.
#[derive(Debug, Clone, Default)]
pub struct WorkflowFiles {
    pub output: Option<PathBuf>,
    pub path: Option<PathBuf>,
}

impl WorkflowFiles {
    pub fn from_env() -> Self {
        let non_empty = |key: &str| {
            std::env::var_os(key)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self {
            output: non_empty("GITHUB_OUTPUT"),
            path: non_empty("GITHUB_PATH"),
        }
    }

    /// Publish a step output. Values must be single-line.
    pub fn set_output(&self, key: &str, value: &str) -> Result<()> {
        if key.contains(['=', '\n', '\r']) || value.contains(['\n', '\r']) {
            anyhow::bail!("output {key:?} must be a single line without '=' in the name");
        }
        match &self.output {
            Some(file) => append_line(file, &format!("{key}={value}")),
            None => {
                println!("::set-output name={}::{}", key, escape_data(value));
                Ok(())
            }
        }
    }

    /// Make `dir` part of PATH for the following steps of the job and for
    /// this process.
    pub fn add_path(&self, dir: &Path) -> Result<()> {
        let line = dir.to_string_lossy();
        match &self.path {
            Some(file) => append_line(file, &line)?,
            None => println!("::add-path::{}", escape_data(&line)),
        }
        let path = prepend_path(dir, env::var_os("PATH"))?;
        env::set_var("PATH", path);
        Ok(())
    }
}

/// `dir` followed by the entries of `current`.
fn prepend_path(dir: &Path, current: Option<OsString>) -> Result<OsString> {
    let mut entries = vec![dir.to_path_buf()];
    if let Some(current) = current.filter(|c| !c.is_empty()) {
        entries.extend(env::split_paths(&current));
    }
    env::join_paths(entries).with_context(|| format!("add {} to PATH", dir.display()))
}

fn append_line(file: &Path, line: &str) -> Result<()> {
    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(file)
        .with_context(|| format!("open {}", file.display()))?;
    writeln!(f, "{}", line).with_context(|| format!("write {}", file.display()))?;
    Ok(())
}
