use async_trait::async_trait;
use std::collections::HashSet;
use std::net::Ipv4Addr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProviderError {
    #[error("{0} is not available on this host")]
    Unavailable(String),
    #[error("failed to read {what}: {reason}")]
    Read { what: String, reason: String },
    #[error("{0} did not respond within {1} ms")]
    Timeout(String, u64),
}

impl ProviderError {
    pub fn read(what: impl Into<String>, reason: impl ToString) -> Self {
        ProviderError::Read {
            what: what.into(),
            reason: reason.to_string(),
        }
    }
}

/// Groups of counters a provider may or may not be able to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterCategory {
    Processor,
    Thermal,
    System,
    LogicalDisk,
    NetworkInterface,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Counter {
    CpuTotal,
    CpuTemperature,
    ProcessCount,
    ThreadCount,
    DiskReadBytes(String),
    DiskWriteBytes(String),
    NetReceivedBytes(String),
    NetSentBytes(String),
}

impl Counter {
    pub fn category(&self) -> CounterCategory {
        match self {
            Counter::CpuTotal => CounterCategory::Processor,
            Counter::CpuTemperature => CounterCategory::Thermal,
            Counter::ProcessCount | Counter::ThreadCount => CounterCategory::System,
            Counter::DiskReadBytes(_) | Counter::DiskWriteBytes(_) => CounterCategory::LogicalDisk,
            Counter::NetReceivedBytes(_) | Counter::NetSentBytes(_) => {
                CounterCategory::NetworkInterface
            }
        }
    }
}

/// Hardware found at startup. Anything missing here stays missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HardwareInventory {
    pub cpu_name: String,
    pub logical_cores: usize,
    pub gpu_name: Option<String>,
    pub motherboard: Option<String>,
    pub cpu_temperature_sensor: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriveInfo {
    pub name: String,
    pub total_bytes: u64,
    pub available_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceInfo {
    pub name: String,
    pub is_up: bool,
    pub is_loopback: bool,
    pub ipv4: Vec<Ipv4Addr>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryReading {
    pub total_bytes: u64,
    pub used_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GpuReading {
    pub name: String,
    pub core_load: f32,
    pub core_temp: f32,
    pub core_clock_mhz: f32,
    pub mem_clock_mhz: f32,
    pub vram_total_mb: f32,
    pub vram_used_mb: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostInfo {
    pub hostname: String,
    pub os: String,
    pub uptime_secs: u64,
}

/// Capability interface over the host's hardware and OS counters.
///
/// The sampler only ever talks to a `Provider`, so tests can swap in a
/// scripted fake. Implementations report failures per call; deciding what a
/// failure means for the snapshot is the sampler's job.
#[async_trait]
pub trait Provider: Send {
    async fn detect_hardware(&mut self) -> HardwareInventory;

    fn list_categories(&self) -> HashSet<CounterCategory>;

    /// Pull fresh values for this tick. Counters read afterwards are
    /// consistent with each other.
    async fn refresh(&mut self) -> Result<(), ProviderError>;

    async fn read_counter(&mut self, counter: &Counter) -> Result<f64, ProviderError>;

    async fn enumerate_drives(&mut self) -> Result<Vec<DriveInfo>, ProviderError>;

    async fn enumerate_interfaces(&mut self) -> Result<Vec<InterfaceInfo>, ProviderError>;

    async fn read_memory(&mut self) -> Result<MemoryReading, ProviderError>;

    async fn read_gpu(&mut self) -> Result<GpuReading, ProviderError>;

    async fn host_info(&mut self) -> Result<HostInfo, ProviderError>;

    fn shutdown(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_categories() {
        assert_eq!(Counter::CpuTotal.category(), CounterCategory::Processor);
        assert_eq!(Counter::ThreadCount.category(), CounterCategory::System);
        assert_eq!(
            Counter::DiskWriteBytes("sda".into()).category(),
            CounterCategory::LogicalDisk
        );
        assert_eq!(
            Counter::NetSentBytes("eth0".into()).category(),
            CounterCategory::NetworkInterface
        );
    }

    #[test]
    fn test_error_messages() {
        let err = ProviderError::read("memory", "permission denied");
        assert_eq!(err.to_string(), "failed to read memory: permission denied");
        let err = ProviderError::Timeout("gpu".into(), 750);
        assert_eq!(err.to_string(), "gpu did not respond within 750 ms");
    }
}
