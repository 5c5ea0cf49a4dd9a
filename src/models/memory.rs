use super::{percent_of, BYTES_PER_MB};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryInfo {
    pub total_mb: f64,
    pub used_mb: f64,
    pub percent_used: f32,
}

impl MemoryInfo {
    pub fn from_bytes(used: u64, total: u64) -> Self {
        Self {
            total_mb: total as f64 / BYTES_PER_MB,
            used_mb: used as f64 / BYTES_PER_MB,
            percent_used: percent_of(used as f64, total as f64),
        }
    }
}
