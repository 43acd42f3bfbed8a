//! The command-execution collaborator every check runs through.
//!
//! Checks never spawn processes themselves. They build a command line and
//! hand it to a [`Shell`], which lets the suite run against scripted doubles.

use std::process::{Output, Stdio};

use async_trait::async_trait;
use reachr_common::command::{CommandResult, RunOptions};
use reachr_common::debug;
use thiserror::Error;
use tokio::process::Command;

/// Exit code reported when the child was terminated by a signal.
const SIGNALLED_EXIT_CODE: i32 = -1;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{command}' exited with code {returncode}: {stderr}")]
    NonZeroExit {
        command: String,
        returncode: i32,
        stderr: String,
    },
}

#[async_trait]
pub trait Shell: Send + Sync {
    /// Runs `command` through a POSIX shell.
    ///
    /// With `ignore_exit_code` unset, a nonzero exit code is returned as
    /// [`ShellError::NonZeroExit`]. Without `capture_output` the child inherits
    /// stdio and the text fields of the result are empty.
    async fn run(&self, command: &str, opts: RunOptions) -> Result<CommandResult, ShellError>;
}

/// Runs commands with `sh -c`, so substitutions like `$(hostname)` work.
#[derive(Debug, Clone, Default)]
pub struct SystemShell;

#[async_trait]
impl Shell for SystemShell {
    async fn run(&self, command: &str, opts: RunOptions) -> Result<CommandResult, ShellError> {
        debug!("running `{command}`");

        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command).stdin(Stdio::null());

        let spawn_err = |source| ShellError::Spawn {
            command: command.to_string(),
            source,
        };

        let result: CommandResult = if opts.capture_output {
            let output: Output = cmd.output().await.map_err(spawn_err)?;
            CommandResult::new(
                output.status.code().unwrap_or(SIGNALLED_EXIT_CODE),
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr),
            )
        } else {
            let status = cmd.status().await.map_err(spawn_err)?;
            CommandResult::new(status.code().unwrap_or(SIGNALLED_EXIT_CODE), "", "")
        };

        if !opts.ignore_exit_code && !result.success() {
            return Err(ShellError::NonZeroExit {
                command: command.to_string(),
                returncode: result.returncode,
                stderr: result.stderr.trim().to_string(),
            });
        }

        Ok(result)
    }
}
