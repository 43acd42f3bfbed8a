use reachr_common::command::{CommandResult, RunOptions};
use reachr_common::network::target::HostTarget;

use super::{CheckError, IpFamily};
use crate::shell::Shell;

/// Deadline handed to `ping6 -w`, in seconds.
const PING6_DEADLINE_SECS: u32 = 5;

const TRANSMITTED_MARKER: &str = "1 packets transmitted";
const RECEIVED_MARKER: &str = "1 received";

pub fn command(family: IpFamily, host: &HostTarget) -> String {
    match family {
        IpFamily::V4 => format!("ping -c 1 {host}"),
        IpFamily::V6 => format!("ping6 -c 1 -w {PING6_DEADLINE_SECS} {host}"),
    }
}

pub async fn run(shell: &dyn Shell, family: IpFamily, host: &HostTarget) -> Result<(), CheckError> {
    let result = shell.run(&command(family, host), RunOptions::inspect()).await?;
    evaluate(host, &result)
}

/// A single echo must have gone out and come back, with a zero exit code.
///
/// Plain substring matching on the summary line, no structured parse.
pub fn evaluate(host: &HostTarget, result: &CommandResult) -> Result<(), CheckError> {
    if !result.success() {
        return Err(CheckError::Unreachable {
            host: host.clone(),
            stderr: result.stderr_trimmed().to_string(),
        });
    }

    if !result.stdout.contains(TRANSMITTED_MARKER) || !result.stdout.contains(RECEIVED_MARKER) {
        return Err(CheckError::PacketMismatch {
            host: host.clone(),
            stderr: result.stderr_trimmed().to_string(),
        });
    }

    Ok(())
}
