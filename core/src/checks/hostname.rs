use std::time::Duration;

use reachr_common::command::{CommandResult, RunOptions};
use tokio::time::Instant;

use super::CheckError;
use crate::shell::Shell;

pub const COMMAND: &str = "nslookup $(hostname)";

const TOOL: &str = "nslookup";

/// Longest acceptable lookup, compared after rounding to whole seconds.
pub const LOOKUP_LIMIT: Duration = Duration::from_secs(10);

/// Times the lookup around the shell call. The command is never cancelled;
/// the limit is only checked once it returned.
pub async fn run(shell: &dyn Shell) -> Result<(), CheckError> {
    let start = Instant::now();
    let result = shell.run(COMMAND, RunOptions::inspect()).await?;
    let elapsed = start.elapsed();

    evaluate(&result, elapsed)
}

pub fn evaluate(result: &CommandResult, elapsed: Duration) -> Result<(), CheckError> {
    if !result.success() {
        return Err(CheckError::CommandFailed {
            tool: TOOL,
            stderr: result.stderr_trimmed().to_string(),
        });
    }

    if rounded_secs(elapsed) > LOOKUP_LIMIT.as_secs() {
        return Err(CheckError::TooSlow {
            tool: TOOL,
            elapsed,
            limit: LOOKUP_LIMIT,
            stderr: result.stderr_trimmed().to_string(),
        });
    }

    Ok(())
}

/// Nearest whole second, ties to even.
fn rounded_secs(elapsed: Duration) -> u64 {
    elapsed.as_secs_f64().round_ties_even() as u64
}
