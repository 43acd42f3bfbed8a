//! Environment capability probes.
//!
//! A probe is a best-effort check used only to decide whether a case runs.
//! Probe failures are never reported as case failures.

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use reachr_common::debug;
use thiserror::Error;
use tokio::net::{TcpStream, UdpSocket};
use tokio::time::timeout;

const DNS_PORT: u16 = 53;
const EXTERNAL_RESOLVER: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)), DNS_PORT);
const IPV6_RESOLVER: SocketAddr = SocketAddr::new(
    IpAddr::V6(Ipv6Addr::new(0x2001, 0x4860, 0x4860, 0, 0, 0, 0, 0x8888)),
    DNS_PORT,
);
const UDP_PROBE_TIMEOUT: Duration = Duration::from_secs(1);
const TCP_PROBE_TIMEOUT: Duration = Duration::from_secs(2);
const UDP_PROBE_PAYLOAD: &[u8] = &[0x00];

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("UDP send to {target} failed: {source}")]
    Unreachable {
        target: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("UDP send to {target} did not complete within {timeout:?}")]
    TimedOut {
        target: SocketAddr,
        timeout: Duration,
    },
}

#[async_trait]
pub trait CapabilityProbe: Send + Sync {
    /// Succeeds if a datagram towards an external resolver could be sent.
    async fn external_network(&self) -> Result<(), ProbeError>;

    /// True if a TCP connection to a well-known IPv6 address succeeds.
    async fn has_ipv6(&self) -> bool;
}

/// Probes backed by real sockets.
#[derive(Debug, Clone)]
pub struct SocketProbe {
    udp_target: SocketAddr,
    udp_timeout: Duration,
    ipv6_target: SocketAddr,
    tcp_timeout: Duration,
}

impl Default for SocketProbe {
    fn default() -> Self {
        Self {
            udp_target: EXTERNAL_RESOLVER,
            udp_timeout: UDP_PROBE_TIMEOUT,
            ipv6_target: IPV6_RESOLVER,
            tcp_timeout: TCP_PROBE_TIMEOUT,
        }
    }
}

impl SocketProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_udp_target(mut self, target: SocketAddr) -> Self {
        self.udp_target = target;
        self
    }

    pub fn with_ipv6_target(mut self, target: SocketAddr) -> Self {
        self.ipv6_target = target;
        self
    }

    pub fn with_timeouts(mut self, udp: Duration, tcp: Duration) -> Self {
        self.udp_timeout = udp;
        self.tcp_timeout = tcp;
        self
    }

    pub fn udp_target(&self) -> SocketAddr {
        self.udp_target
    }

    pub fn ipv6_target(&self) -> SocketAddr {
        self.ipv6_target
    }
}

#[async_trait]
impl CapabilityProbe for SocketProbe {
    async fn external_network(&self) -> Result<(), ProbeError> {
        let target = self.udp_target;
        let unreachable = |source| ProbeError::Unreachable { target, source };

        let send = async {
            let socket = UdpSocket::bind(unspecified_for(&target))
                .await
                .map_err(unreachable)?;
            socket
                .send_to(UDP_PROBE_PAYLOAD, target)
                .await
                .map_err(unreachable)?;
            Ok::<(), ProbeError>(())
        };

        match timeout(self.udp_timeout, send).await {
            Ok(res) => res,
            Err(_elapsed) => Err(ProbeError::TimedOut {
                target,
                timeout: self.udp_timeout,
            }),
        }
    }

    async fn has_ipv6(&self) -> bool {
        match timeout(self.tcp_timeout, TcpStream::connect(self.ipv6_target)).await {
            Ok(Ok(_stream)) => true,
            Ok(Err(e)) => {
                debug!("IPv6 connect to {} failed: {e}", self.ipv6_target);
                false
            }
            Err(_elapsed) => {
                debug!("IPv6 connect to {} timed out", self.ipv6_target);
                false
            }
        }
    }
}

fn unspecified_for(target: &SocketAddr) -> SocketAddr {
    let ip = match target {
        SocketAddr::V4(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        SocketAddr::V6(_) => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
    };
    SocketAddr::new(ip, 0)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
