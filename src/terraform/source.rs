use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::InventoryError;

pub const DEFAULT_STATE_COMMAND: &str = "terragrunt state pull";

/// Something that can produce raw state bytes for a directory.
///
/// A failed pull is not fatal: the aggregator treats it as "not a state
/// root" and descends into subdirectories instead.
pub trait StateSource {
    fn pull(&self, dir: &Path) -> Result<Vec<u8>, InventoryError>;

    /// Immediate subdirectories of `dir`, sorted.
    fn subdirectories(&self, dir: &Path) -> Result<Vec<PathBuf>, InventoryError> {
        let mut dirs = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                dirs.push(entry.path());
            }
        }
        dirs.sort();
        Ok(dirs)
    }
}

/// Runs an external command (by default `terragrunt state pull`) with the
/// directory as its working directory and captures stdout.
#[derive(Debug, Clone)]
pub struct CommandStateSource {
    program: String,
    args: Vec<String>,
}

impl CommandStateSource {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Splits a command line on whitespace. No shell quoting is supported.
    pub fn from_command_line(command: &str) -> Result<Self, InventoryError> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| InventoryError::Config("state command is empty".to_string()))?;
        Ok(Self::new(program, parts.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Default for CommandStateSource {
    fn default() -> Self {
        Self::new("terragrunt", vec!["state".to_string(), "pull".to_string()])
    }
}

impl StateSource for CommandStateSource {
    fn pull(&self, dir: &Path) -> Result<Vec<u8>, InventoryError> {
        tracing::debug!(dir = %dir.display(), program = %self.program, "pulling state");

        let output = Command::new(&self.program)
            .args(&self.args)
            .current_dir(dir)
            .output()
            .map_err(|e| InventoryError::StateSource {
                dir: dir.to_path_buf(),
                message: format!("failed to run {}: {}", self.program, e),
            })?;

        if !output.status.success() {
            return Err(InventoryError::StateSource {
                dir: dir.to_path_buf(),
                message: output.status.to_string(),
            });
        }

        Ok(output.stdout)
    }
}
