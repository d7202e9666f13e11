//! Boundary to the external toolchain: solc, cargo and the filesystem
//! artifacts they exchange.

pub mod bindings;
pub mod solc;

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::info;

pub use bindings::{AlloyBindings, BindingGenerator, BindingsArtifact};
pub use solc::{CompiledContract, Solc, SolidityCompiler};

#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{command} failed ({status}):\n{output}")]
    CommandFailed {
        command: String,
        status: String,
        output: String,
    },
    #[error("required file {} does not exist", path.display())]
    MissingArtifact { path: PathBuf },
    #[error("malformed {}: {reason}", path.display())]
    MalformedArtifact { path: PathBuf, reason: String },
    #[error("unsupported ABI in contract {contract}: {reason}")]
    UnsupportedAbi { contract: String, reason: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Captured result of one external command run to completion.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Rendered command line, for diagnostics.
    pub command: String,
    /// Exit code; `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Captured stdout followed by stderr.
    pub fn combined(&self) -> String {
        let mut combined = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !combined.is_empty() && !combined.ends_with('\n') {
                combined.push('\n');
            }
            combined.push_str(&self.stderr);
        }
        combined
    }

    /// Passes a zero exit through and turns anything else into
    /// [`ToolchainError::CommandFailed`] carrying the captured output.
    pub fn expect_success(self) -> Result<Self, ToolchainError> {
        if self.success() {
            Ok(self)
        } else {
            Err(self.failure())
        }
    }

    /// The command-failed error for this output.
    pub fn failure(self) -> ToolchainError {
        let output = self.combined();
        ToolchainError::CommandFailed {
            command: self.command,
            status: status_label(self.code),
            output,
        }
    }
}

fn status_label(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Runs one external command to completion, capturing its output.
///
/// The pipeline only ever talks to solc and cargo through this trait, so
/// tests can script the toolchain without spawning anything.
pub trait Executor {
    fn run(&self, program: &str, args: &[String], dir: &Path)
        -> Result<CommandOutput, ToolchainError>;
}

/// [`Executor`] backed by `std::process::Command`, blocking until the
/// child exits.
pub struct ProcessExecutor;

impl Executor for ProcessExecutor {
    fn run(
        &self,
        program: &str,
        args: &[String],
        dir: &Path,
    ) -> Result<CommandOutput, ToolchainError> {
        let command = render_command(program, args);
        info!("running {command}");
        let output = Command::new(program)
            .args(args)
            .current_dir(dir)
            .output()
            .map_err(|source| ToolchainError::Launch {
                program: program.to_string(),
                source,
            })?;
        Ok(CommandOutput {
            command,
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

fn render_command(program: &str, args: &[String]) -> String {
    let mut rendered = program.to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(code: Option<i32>, stdout: &str, stderr: &str) -> CommandOutput {
        CommandOutput {
            command: "tool --flag".to_string(),
            code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn combined_output_appends_stderr_on_its_own_line() {
        assert_eq!(output(Some(0), "out", "err").combined(), "out\nerr");
        assert_eq!(output(Some(0), "out\n", "err").combined(), "out\nerr");
        assert_eq!(output(Some(0), "", "err").combined(), "err");
        assert_eq!(output(Some(0), "out", "").combined(), "out");
    }

    #[test]
    fn expect_success_keeps_the_captured_output_in_the_error() {
        let err = output(Some(1), "", "boom").expect_success().unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("tool --flag"));
        assert!(rendered.contains("exit code 1"));
        assert!(rendered.contains("boom"));
    }

    #[test]
    fn signal_termination_is_labelled() {
        let rendered = output(None, "", "").failure().to_string();
        assert!(rendered.contains("terminated by signal"));
    }
}
