use colored::*;

use reachr_common::environment::BootState;
use reachr_common::network::ip;
use reachr_common::warn;
use reachr_core::probe::{CapabilityProbe, SocketProbe};
use reachr_core::shell::SystemShell;
use reachr_core::system::{self, Ipv6Address};

use crate::mprint;
use crate::terminal::{colors, format::Detail, print};

const KEYS: [&str; 3] = ["External UDP", "IPv6 TCP", "Boot state"];

pub async fn probe() {
    let probe = SocketProbe::new();
    print::set_key_width(KEYS);

    let external: ColoredString = match probe.external_network().await {
        Ok(()) => format!("reachable ({})", probe.udp_target()).green(),
        Err(e) => {
            warn!("{e}");
            "unreachable".red()
        }
    };
    print::aligned_line(KEYS[0], external);

    let ipv6: ColoredString = if probe.has_ipv6().await {
        format!("available ({})", probe.ipv6_target()).green()
    } else {
        "unavailable".red()
    };
    print::aligned_line(KEYS[1], ipv6);

    let boot: ColoredString = match system::detect_boot_state(&SystemShell).await {
        BootState::Booted => "booted".green(),
        BootState::NotBooted => "not booted".yellow(),
    };
    print::aligned_line(KEYS[2], boot);

    mprint!();
    print_inventory(&system::ipv6_inventory());
}

fn print_inventory(addresses: &[Ipv6Address]) {
    if addresses.is_empty() {
        print::print_status("No global IPv6 addresses configured");
        return;
    }

    print::print_status("Global IPv6 addresses");
    let details: Vec<Detail> = addresses
        .iter()
        .map(|a| {
            let value = format!("{} ({})", a.addr, ip::ipv6_type_str(&a.addr)).color(colors::IPV6_ADDR);
            (a.interface.clone(), value)
        })
        .collect();
    print::as_tree_one_level(details);
}
