/// Options for a single shell invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunOptions {
    /// Capture stdout and stderr instead of inheriting the parent's streams.
    pub capture_output: bool,
    /// Hand back nonzero exit codes instead of turning them into an error.
    pub ignore_exit_code: bool,
}

impl RunOptions {
    /// Capture everything, never fail on the exit code. Every check runs this way.
    pub const fn inspect() -> Self {
        Self {
            capture_output: true,
            ignore_exit_code: true,
        }
    }
}

/// What a finished command left behind.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandResult {
    pub returncode: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    pub fn new(returncode: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            returncode,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.returncode == 0
    }

    /// Stderr with surrounding whitespace removed, for failure messages.
    pub fn stderr_trimmed(&self) -> &str {
        self.stderr.trim()
    }
}
