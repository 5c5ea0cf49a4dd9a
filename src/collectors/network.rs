use crate::provider::{InterfaceInfo, ProviderError};
use crate::utils::file;
use log::debug;
use std::net::Ipv4Addr;
use std::path::Path;
use std::time::Instant;
use systemstat::{IpAddr, Platform, System};

const SYS_CLASS_NET: &str = "/sys/class/net";

#[derive(Debug, Clone, Copy)]
pub enum Direction {
    Received,
    Sent,
}

pub fn collect_interfaces(sys: &System) -> Result<Vec<InterfaceInfo>, ProviderError> {
    let start = Instant::now();
    let networks = sys
        .networks()
        .map_err(|x| ProviderError::read("network interfaces", x))?;

    let result = networks
        .values()
        .map(|net| {
            let ipv4: Vec<Ipv4Addr> = net
                .addrs
                .iter()
                .filter_map(|a| match a.addr {
                    IpAddr::V4(v4) => Some(v4),
                    _ => None,
                })
                .collect();
            InterfaceInfo {
                name: net.name.clone(),
                is_up: is_up(operstate(&net.name).as_deref(), &ipv4),
                is_loopback: is_loopback(&net.name, &ipv4),
                ipv4,
            }
        })
        .collect();

    debug!("collect_interfaces took: {} ms", start.elapsed().as_millis());
    Ok(result)
}

/// Cumulative bytes through `name` since the interface came up.
pub fn collect_io(sys: &System, name: &str, direction: Direction) -> Result<f64, ProviderError> {
    let stats = sys
        .network_stats(name)
        .map_err(|x| ProviderError::read(format!("{} statistics", name), x))?;
    let bytes = match direction {
        Direction::Received => stats.rx_bytes.as_u64(),
        Direction::Sent => stats.tx_bytes.as_u64(),
    };
    Ok(bytes as f64)
}

fn operstate(name: &str) -> Option<String> {
    let path = Path::new(SYS_CLASS_NET).join(name).join("operstate");
    file::read_to_string(path).ok().map(|s| s.trim().to_lowercase())
}

// Tunnels and some virtual links report "unknown" while passing traffic.
fn is_operational(state: &str) -> bool {
    matches!(state, "up" | "unknown")
}

/// Without sysfs an interface holding an IPv4 address counts as up.
fn is_up(operstate: Option<&str>, ipv4: &[Ipv4Addr]) -> bool {
    match operstate {
        Some(state) => is_operational(state),
        None => !ipv4.is_empty(),
    }
}

fn is_loopback(name: &str, ipv4: &[Ipv4Addr]) -> bool {
    name == "lo" || ipv4.iter().any(|a| a.is_loopback())
}
