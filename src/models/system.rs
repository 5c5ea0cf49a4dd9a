#[derive(Debug, Clone, PartialEq)]
pub struct HostSummary {
    pub hostname: String,
    pub os: String,
    pub motherboard: Option<String>,
    pub uptime_secs: u64,
    pub local_ip: String,
    pub external_ip: String,
}

impl Default for HostSummary {
    fn default() -> Self {
        Self {
            hostname: String::from("unknown"),
            os: String::new(),
            motherboard: None,
            uptime_secs: 0,
            local_ip: String::from("N/A"),
            external_ip: String::from("N/A"),
        }
    }
}

/// Formats an uptime as `3d 4h 12m`, dropping leading zero units.
pub fn format_uptime(secs: u64) -> String {
    let days = secs / (24 * 3600);
    let hours = (secs % (24 * 3600)) / 3600;
    let minutes = (secs % 3600) / 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{}d", days));
    }
    if days > 0 || hours > 0 {
        parts.push(format!("{}h", hours));
    }
    parts.push(format!("{}m", minutes));
    parts.join(" ")
}
