use super::{percent_of, BYTES_PER_GB};

#[derive(Debug, Clone, PartialEq)]
pub struct DiskInfo {
    pub name: String,
    pub total_gb: f64,
    pub free_gb: f64,
    pub percent_used: f32,
    pub read_mbps: f64,
    pub write_mbps: f64,
}

impl Default for DiskInfo {
    fn default() -> Self {
        Self {
            name: String::new(),
            total_gb: 0.0,
            free_gb: 0.0,
            percent_used: 0.0,
            read_mbps: 0.0,
            write_mbps: 0.0,
        }
    }
}

impl DiskInfo {
    pub fn with_capacity(name: &str, total_bytes: u64, available_bytes: u64) -> Self {
        let available = available_bytes.min(total_bytes);
        let used = total_bytes - available;
        Self {
            name: name.to_string(),
            total_gb: total_bytes as f64 / BYTES_PER_GB,
            free_gb: available as f64 / BYTES_PER_GB,
            percent_used: percent_of(used as f64, total_bytes as f64),
            ..Self::default()
        }
    }
}
