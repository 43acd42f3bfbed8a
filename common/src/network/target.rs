//! # Host Target Model
//!
//! Defines what a check can be pointed at:
//! * An IPv4 literal (e.g., `8.8.8.8`).
//! * An IPv6 literal (e.g., `2001:4860:4860::8888`).
//! * A hostname (e.g., `dns.google.com`).
//!
//! Targets end up interpolated into shell command lines, so parsing is strict
//! about the characters a hostname may contain.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use thiserror::Error;

const MAX_HOSTNAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostTarget {
    V4(Ipv4Addr),
    V6(Ipv6Addr),
    Hostname(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetParseError {
    #[error("empty host target")]
    Empty,
    #[error("invalid host target: {0}")]
    Invalid(String),
}

impl HostTarget {
    /// True for IPv6 literals only. Hostnames are never assumed to be IPv6.
    pub fn is_ipv6_literal(&self) -> bool {
        matches!(self, HostTarget::V6(_))
    }

    pub fn ip(&self) -> Option<IpAddr> {
        match self {
            HostTarget::V4(addr) => Some(IpAddr::V4(*addr)),
            HostTarget::V6(addr) => Some(IpAddr::V6(*addr)),
            HostTarget::Hostname(_) => None,
        }
    }
}

impl FromStr for HostTarget {
    type Err = TargetParseError;

    /// Parses a string into a `HostTarget`.
    ///
    /// IP literals are tried first; anything else must be a valid DNS name
    /// (letters, digits, `-` and `.`, labels of at most 63 characters).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(TargetParseError::Empty);
        }

        if let Ok(ip) = s.parse::<IpAddr>() {
            return Ok(ip.into());
        }

        if is_valid_hostname(s) {
            return Ok(HostTarget::Hostname(s.to_ascii_lowercase()));
        }

        Err(TargetParseError::Invalid(s.to_string()))
    }
}

impl From<IpAddr> for HostTarget {
    fn from(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(addr) => HostTarget::V4(addr),
            IpAddr::V6(addr) => HostTarget::V6(addr),
        }
    }
}

impl fmt::Display for HostTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostTarget::V4(addr) => write!(f, "{addr}"),
            HostTarget::V6(addr) => write!(f, "{addr}"),
            HostTarget::Hostname(name) => f.write_str(name),
        }
    }
}

fn is_valid_hostname(s: &str) -> bool {
    let name = s.strip_suffix('.').unwrap_or(s);
    if name.is_empty() || name.len() > MAX_HOSTNAME_LEN {
        return false;
    }

    name.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}
