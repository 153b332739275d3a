//! External formatter run over the generated files.

use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, info};

use crate::error::LintError;

/// A formatter command line; generated file paths are appended to `args`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for LintCommand {
    fn default() -> Self {
        Self {
            program: "rustfmt".to_string(),
            args: vec!["--edition".to_string(), "2021".to_string()],
        }
    }
}

impl LintCommand {
    /// Splits a whitespace-separated command line. Returns `None` when empty.
    ///
    /// ```
    /// use apigen_lib::LintCommand;
    ///
    /// let cmd = LintCommand::parse("rustfmt --edition 2024").unwrap();
    /// assert_eq!(cmd.program, "rustfmt");
    /// assert_eq!(cmd.args, ["--edition", "2024"]);
    /// assert!(LintCommand::parse("   ").is_none());
    /// ```
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Runs the command over `files`. Nothing runs when `files` is empty.
    pub fn run(&self, files: &[PathBuf]) -> Result<(), LintError> {
        if files.is_empty() {
            debug!(program = %self.program, "no files to lint");
            return Ok(());
        }

        info!(command = %self, files = files.len(), "running formatter");
        let output = Command::new(&self.program)
            .args(&self.args)
            .args(files)
            .output()
            .map_err(|source| LintError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(LintError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for LintCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_rustfmt() {
        assert_eq!(LintCommand::default().to_string(), "rustfmt --edition 2021");
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let cmd = LintCommand::parse("apigen-no-such-formatter --check").unwrap();
        let err = cmd.run(&[PathBuf::from("x.rs")]).unwrap_err();
        assert!(matches!(err, LintError::Spawn { .. }));
    }

    #[test]
    fn empty_file_list_is_a_no_op() {
        let cmd = LintCommand::parse("apigen-no-such-formatter").unwrap();
        assert!(cmd.run(&[]).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn failing_program_reports_status() {
        let cmd = LintCommand::parse("false").unwrap();
        let err = cmd.run(&[PathBuf::from("x.rs")]).unwrap_err();
        assert!(matches!(err, LintError::Failed { ref program, .. } if program == "false"));
    }
}
