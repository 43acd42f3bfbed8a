use std::net::Ipv6Addr;

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::IpNetwork;

use reachr_common::command::RunOptions;
use reachr_common::environment::BootState;
use reachr_common::network::ip;
use reachr_common::debug;

use crate::shell::Shell;

const BOOT_STATE_COMMAND: &str = "systemctl is-system-running";

/// Asks the init system whether the machine finished booting.
///
/// `running` and `degraded` count as booted. Anything else, including a
/// missing `systemctl`, is treated as not booted.
pub async fn detect_boot_state(shell: &dyn Shell) -> BootState {
    match shell.run(BOOT_STATE_COMMAND, RunOptions::inspect()).await {
        Ok(result) => parse_boot_state(&result.stdout),
        Err(e) => {
            debug!("could not query boot state: {e}");
            BootState::NotBooted
        }
    }
}

fn parse_boot_state(stdout: &str) -> BootState {
    match stdout.trim() {
        "running" | "degraded" => BootState::Booted,
        _ => BootState::NotBooted,
    }
}

/// A global unicast IPv6 address and the interface it sits on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv6Address {
    pub interface: String,
    pub addr: Ipv6Addr,
}

/// Global unicast IPv6 addresses of all up, non-loopback interfaces.
pub fn ipv6_inventory() -> Vec<Ipv6Address> {
    global_ipv6_addresses(&datalink::interfaces())
}

fn global_ipv6_addresses(interfaces: &[NetworkInterface]) -> Vec<Ipv6Address> {
    interfaces
        .iter()
        .filter(|i| i.is_up() && !i.is_loopback())
        .flat_map(|i| {
            i.ips.iter().filter_map(|net| match net {
                IpNetwork::V6(v6) if ip::is_global_unicast(&v6.ip()) => Some(Ipv6Address {
                    interface: i.name.clone(),
                    addr: v6.ip(),
                }),
                _ => None,
            })
        })
        .collect()
}
