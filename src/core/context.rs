use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use crate::core::error::AppError;
use crate::providers::tools::install_hint;
use crate::ui;

/// Runs external tools on behalf of adapters.
/// The real implementation is [`ExecutionContext`]; tests script their own.
pub trait CommandRunner {
    /// Executes `cmd` with `args`, optionally inside `dir`.
    fn run_in(&self, dir: Option<&Path>, cmd: &str, args: &[&str])
        -> Result<CommandOutput, AppError>;

    /// Executes `cmd` with `args` in the current directory.
    fn run_command(&self, cmd: &str, args: &[&str]) -> Result<CommandOutput, AppError> {
        self.run_in(None, cmd, args)
    }

    /// Returns true if commands are only printed, not executed.
    fn is_dry_run(&self) -> bool {
        false
    }
}

/// Execution context that controls how commands are run.
/// Supports dry-run mode and verbose output.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    dry_run: bool,
    verbose: bool,
}

impl ExecutionContext {
    /// Creates a new execution context.
    pub fn new(dry_run: bool, verbose: bool) -> Self {
        Self { dry_run, verbose }
    }
}

impl CommandRunner for ExecutionContext {
    fn run_in(
        &self,
        dir: Option<&Path>,
        cmd: &str,
        args: &[&str],
    ) -> Result<CommandOutput, AppError> {
        let full_cmd = format!("{} {}", cmd, args.join(" "));

        if self.dry_run {
            ui::info(&format!("[DRY-RUN] {}", full_cmd));
            return Ok(CommandOutput::dry_run());
        }

        if self.verbose {
            ui::info(&format!("Running: {}", full_cmd));
        }
        tracing::debug!(cwd = ?dir, "exec {}", full_cmd);

        let mut command = program(cmd);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = dir {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                AppError::PrerequisiteMissing {
                    tool: cmd.to_string(),
                    hint: install_hint(cmd).to_string(),
                }
            } else {
                AppError::Command(format!("Failed to execute '{}': {}", cmd, e))
            }
        })?;

        let cmd_output = CommandOutput::from_output(output);
        tracing::debug!(code = cmd_output.code, "{} finished", cmd);

        if self.verbose && !cmd_output.stdout.is_empty() {
            ui::output::plain(cmd_output.stdout.trim_end());
        }

        Ok(cmd_output)
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new(false, false)
    }
}

/// npm-installed CLIs are `.cmd` shims on Windows and need the shell.
#[cfg(windows)]
fn program(cmd: &str) -> Command {
    if matches!(cmd, "vercel" | "netlify" | "npm") {
        let mut command = Command::new("cmd");
        command.args(["/C", cmd]);
        command
    } else {
        Command::new(cmd)
    }
}

#[cfg(not(windows))]
fn program(cmd: &str) -> Command {
    Command::new(cmd)
}

/// Result of a command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub success: bool,
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
    pub dry_run: bool,
}

impl CommandOutput {
    /// Creates a mock output for dry-run mode.
    pub fn dry_run() -> Self {
        Self {
            success: true,
            dry_run: true,
            ..Self::default()
        }
    }

    /// Creates a successful output carrying `stdout`.
    pub fn ok(stdout: &str) -> Self {
        Self {
            success: true,
            stdout: stdout.to_string(),
            ..Self::default()
        }
    }

    /// Creates a failed output with the given exit code and `stderr`.
    pub fn failed(code: i32, stderr: &str) -> Self {
        Self {
            success: false,
            code,
            stderr: stderr.to_string(),
            ..Self::default()
        }
    }

    /// Creates output from a std::process::Output.
    pub fn from_output(output: Output) -> Self {
        Self {
            success: output.status.success(),
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            dry_run: false,
        }
    }

    /// Returns an error if the command failed.
    pub fn ensure_success(&self, context: &str) -> Result<(), AppError> {
        if self.dry_run || self.success {
            Ok(())
        } else {
            Err(AppError::Command(format!(
                "{}: {}",
                context,
                if self.stderr.is_empty() {
                    "Command failed"
                } else {
                    &self.stderr
                }
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_success_uses_stderr() {
        let output = CommandOutput::failed(1, "permission denied");
        let err = output.ensure_success("Failed to build image").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Command execution failed: Failed to build image: permission denied"
        );
    }

    #[test]
    fn test_ensure_success_passes_dry_run() {
        assert!(CommandOutput::dry_run().ensure_success("anything").is_ok());
    }

    #[test]
    fn test_missing_binary_is_prerequisite_error() {
        let ctx = ExecutionContext::default();
        let err = ctx
            .run_command("vizdeploy-definitely-not-a-real-tool", &["--version"])
            .unwrap_err();
        assert!(matches!(err, AppError::PrerequisiteMissing { .. }));
    }

    #[test]
    fn test_dry_run_skips_execution() {
        let ctx = ExecutionContext::new(true, false);
        let output = ctx
            .run_command("vizdeploy-definitely-not-a-real-tool", &[])
            .unwrap();
        assert!(output.dry_run);
        assert!(ctx.is_dry_run());
    }
}
