//! The reachability checks.
//!
//! Each check builds a command line, runs it through a [`Shell`] with the
//! exit code check suppressed, and inspects the returned code and text
//! itself. Submodules hold the command construction and the pass conditions
//! for each diagnostic tool:
//!
//! * [`ping`]: ICMP echo over IPv4 (`ping`) and IPv6 (`ping6`).
//! * [`dns`]: a `dig` query for `example.com` against a given resolver.
//! * [`hostname`]: resolving the local hostname with `nslookup` within 10s.

use std::fmt;
use std::time::Duration;

use reachr_common::network::target::HostTarget;
use thiserror::Error;

use crate::shell::{Shell, ShellError};

pub mod dns;
pub mod hostname;
pub mod ping;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Shell(#[from] ShellError),
    #[error("Host {host} unreachable: {stderr}")]
    Unreachable { host: HostTarget, stderr: String },
    #[error("No response from {host}")]
    NoResponse { host: HostTarget },
    #[error("Expected 1 packet transmitted and 1 received from {host}: {stderr}")]
    PacketMismatch { host: HostTarget, stderr: String },
    #[error("{tool} failed: {stderr}")]
    CommandFailed { tool: &'static str, stderr: String },
    #[error("{tool} should not run into timeout (took {secs:.1}s, limit {limit:?}): {stderr}", secs = .elapsed.as_secs_f64())]
    TooSlow {
        tool: &'static str,
        elapsed: Duration,
        limit: Duration,
        stderr: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpFamily {
    V4,
    V6,
}

/// One concrete check with its parameters bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    Ping { family: IpFamily, host: HostTarget },
    Dns { resolver: HostTarget },
    HostnameLookup,
}

impl Check {
    /// The command line this check hands to the shell.
    pub fn command(&self) -> String {
        match self {
            Check::Ping { family, host } => ping::command(*family, host),
            Check::Dns { resolver } => dns::command(resolver),
            Check::HostnameLookup => hostname::COMMAND.to_string(),
        }
    }

    pub async fn run(&self, shell: &dyn Shell) -> Result<(), CheckError> {
        match self {
            Check::Ping { family, host } => ping::run(shell, *family, host).await,
            Check::Dns { resolver } => dns::run(shell, resolver).await,
            Check::HostnameLookup => hostname::run(shell).await,
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Ping {
                family: IpFamily::V4,
                host,
            } => write!(f, "ping4[{host}]"),
            Check::Ping {
                family: IpFamily::V6,
                host,
            } => write!(f, "ping6[{host}]"),
            Check::Dns { resolver } => write!(f, "dns[{resolver}]"),
            Check::HostnameLookup => f.write_str("hostname_lookup"),
        }
    }
}
