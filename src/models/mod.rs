use chrono::{DateTime, Local};

pub mod cpu;
pub mod disk;
pub mod gpu;
pub mod memory;
pub mod network;
pub mod system;

pub use cpu::CpuInfo;
pub use disk::DiskInfo;
pub use gpu::GpuInfo;
pub use memory::MemoryInfo;
pub use network::NetworkInfo;
pub use system::HostSummary;

/// One tick's complete set of sampled metrics.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub timestamp: DateTime<Local>,
    pub host: HostSummary,
    pub cpu: CpuInfo,
    pub memory: MemoryInfo,
    pub disks: Vec<DiskInfo>,
    pub networks: Vec<NetworkInfo>,
    pub gpu: Option<GpuInfo>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            timestamp: Local::now(),
            host: HostSummary::default(),
            cpu: CpuInfo::default(),
            memory: MemoryInfo::default(),
            disks: Vec::new(),
            networks: Vec::new(),
            gpu: None,
        }
    }
}

/// `used / total * 100`, zero when there is no total, clamped to [0, 100].
pub fn percent_of(used: f64, total: f64) -> f32 {
    if total.is_nan() || total <= 0.0 || !used.is_finite() {
        return 0.0;
    }
    clamp_percent((used / total * 100.0) as f32)
}

pub fn clamp_percent(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

pub(crate) const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
pub(crate) const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_of_zero_total() {
        assert_eq!(percent_of(0.0, 0.0), 0.0);
        assert_eq!(percent_of(512.0, 0.0), 0.0);
    }

    #[test]
    fn test_percent_of_stays_in_range() {
        assert_eq!(percent_of(50.0, 200.0), 25.0);
        assert_eq!(percent_of(300.0, 200.0), 100.0);
        assert_eq!(percent_of(0.0, 200.0), 0.0);
        for used in [0.0, 1.0, 99.0, 1e12] {
            for total in [0.0, 1.0, 100.0, 1e9] {
                let p = percent_of(used, total);
                assert!((0.0..=100.0).contains(&p), "{used}/{total} gave {p}");
            }
        }
    }

    #[test]
    fn test_clamp_percent() {
        assert_eq!(clamp_percent(-3.0), 0.0);
        assert_eq!(clamp_percent(140.0), 100.0);
        assert_eq!(clamp_percent(f32::NAN), 0.0);
        assert_eq!(clamp_percent(42.5), 42.5);
    }
}
