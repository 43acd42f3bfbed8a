use reachr_common::command::{CommandResult, RunOptions};
use reachr_common::network::target::HostTarget;

use super::CheckError;
use crate::shell::Shell;

/// Domain every resolver is asked about.
pub const QUERY_DOMAIN: &str = "example.com";

pub fn command(resolver: &HostTarget) -> String {
    if resolver.is_ipv6_literal() {
        format!("dig -6 @{resolver} {QUERY_DOMAIN} +short")
    } else {
        format!("dig @{resolver} {QUERY_DOMAIN} +short")
    }
}

pub async fn run(shell: &dyn Shell, resolver: &HostTarget) -> Result<(), CheckError> {
    let result = shell.run(&command(resolver), RunOptions::inspect()).await?;
    evaluate(resolver, &result)
}

pub fn evaluate(resolver: &HostTarget, result: &CommandResult) -> Result<(), CheckError> {
    if !result.success() {
        return Err(CheckError::Unreachable {
            host: resolver.clone(),
            stderr: result.stderr_trimmed().to_string(),
        });
    }

    if result.stdout.trim().is_empty() {
        return Err(CheckError::NoResponse {
            host: resolver.clone(),
        });
    }

    Ok(())
}
