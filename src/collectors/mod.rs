//! The real [`Provider`]: `sysinfo` for CPU usage, processes and drives,
//! `systemstat` for memory, temperatures and interface counters, hwmon/DMI
//! sysfs files for sensors and the board, and `nvidia-smi` for the GPU.
//!
//! Every `sysinfo`/`systemstat`/sysfs read is synchronous and may stall on a
//! hung mount, so it runs on tokio's blocking pool through [`run_blocking`].
//! That keeps the caller's `tokio::time::timeout` able to fire.

use crate::provider::{
    Counter, CounterCategory, DriveInfo, GpuReading, HardwareInventory, HostInfo, InterfaceInfo,
    MemoryReading, Provider, ProviderError,
};
use crate::utils::hwmon;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use sysinfo::{Disks, ProcessesToUpdate, System as SysInfo};
use systemstat::{Platform, System as SystemStat};

pub mod cpu;
pub mod disk;
pub mod memory;
pub mod network;
pub mod nvidia;
pub mod system;

use cpu::TemperatureSource;

/// Library handles shared with the blocking pool.
struct Handles {
    sys_info: SysInfo,
    sys_stat: SystemStat,
    disks: Disks,
}

pub struct HostProvider {
    handles: Arc<Mutex<Handles>>,
    temperature: TemperatureSource,
    gpu_present: bool,
}

/// Runs `f` against `state` on the blocking pool.
///
/// A read abandoned by a timeout keeps the lock until it returns, so later
/// calls queue behind it on the pool instead of on the runtime thread.
pub(crate) async fn run_blocking<S, T, F>(
    state: &Arc<Mutex<S>>,
    what: &str,
    f: F,
) -> Result<T, ProviderError>
where
    S: Send + 'static,
    T: Send + 'static,
    F: FnOnce(&mut S) -> Result<T, ProviderError> + Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || {
        let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    })
    .await
    .map_err(|e| ProviderError::read(what, e))?
}

impl HostProvider {
    pub fn new() -> Self {
        let start = Instant::now();
        let mut sys_info = SysInfo::new_all();
        // First usage figure is relative to this refresh.
        sys_info.refresh_cpu_usage();
        let handles = Handles {
            sys_info,
            sys_stat: SystemStat::new(),
            disks: Disks::new_with_refreshed_list(),
        };
        debug!("HostProvider::new took: {} ms", start.elapsed().as_millis());
        Self {
            handles: Arc::new(Mutex::new(handles)),
            temperature: TemperatureSource::Unavailable,
            gpu_present: false,
        }
    }

    async fn with_handles<T, F>(&self, what: &str, f: F) -> Result<T, ProviderError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Handles) -> Result<T, ProviderError> + Send + 'static,
    {
        run_blocking(&self.handles, what, f).await
    }
}

impl Default for HostProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for HostProvider {
    async fn detect_hardware(&mut self) -> HardwareInventory {
        let detected = self
            .with_handles("hardware detection", |h| {
                Ok((
                    cpu::detect_temperature_source(&h.sys_stat),
                    cpu::collect_name(&h.sys_info),
                    cpu::collect_count(&h.sys_info),
                    hwmon::read_board_name(Path::new(hwmon::DMI_ROOT)),
                ))
            })
            .await;
        let (temperature, cpu_name, logical_cores, motherboard) = match detected {
            Ok(detected) => detected,
            Err(e) => {
                warn!("Hardware detection failed: {}", e);
                (TemperatureSource::Unavailable, String::new(), 0, None)
            }
        };
        self.temperature = temperature;

        let gpu_name = nvidia::probe().await;
        self.gpu_present = gpu_name.is_some();

        HardwareInventory {
            cpu_name,
            logical_cores,
            gpu_name,
            motherboard,
            cpu_temperature_sensor: self.temperature != TemperatureSource::Unavailable,
        }
    }

    fn list_categories(&self) -> HashSet<CounterCategory> {
        let mut categories: HashSet<CounterCategory> = [
            CounterCategory::Processor,
            CounterCategory::System,
            CounterCategory::LogicalDisk,
            CounterCategory::NetworkInterface,
        ]
        .into_iter()
        .collect();
        if self.temperature != TemperatureSource::Unavailable {
            categories.insert(CounterCategory::Thermal);
        }
        categories
    }

    async fn refresh(&mut self) -> Result<(), ProviderError> {
        self.with_handles("refresh", |h| {
            let start = Instant::now();
            h.sys_info.refresh_cpu_usage();
            h.sys_info.refresh_processes(ProcessesToUpdate::All, true);
            h.disks = Disks::new_with_refreshed_list();
            debug!("refresh took: {} ms", start.elapsed().as_millis());
            Ok(())
        })
        .await
    }

    async fn read_counter(&mut self, counter: &Counter) -> Result<f64, ProviderError> {
        let counter = counter.clone();
        let temperature = self.temperature.clone();
        self.with_handles("counter", move |h| match &counter {
            Counter::CpuTotal => cpu::collect_load_aggregate(&h.sys_info),
            Counter::CpuTemperature => cpu::collect_temperature(&h.sys_stat, &temperature),
            Counter::ProcessCount => system::collect_process_count(&h.sys_info),
            Counter::ThreadCount => system::collect_thread_count(&h.sys_info),
            Counter::DiskReadBytes(name) => disk::collect_io(&h.disks, name, disk::Direction::Read),
            Counter::DiskWriteBytes(name) => {
                disk::collect_io(&h.disks, name, disk::Direction::Write)
            }
            Counter::NetReceivedBytes(name) => {
                network::collect_io(&h.sys_stat, name, network::Direction::Received)
            }
            Counter::NetSentBytes(name) => {
                network::collect_io(&h.sys_stat, name, network::Direction::Sent)
            }
        })
        .await
    }

    async fn enumerate_drives(&mut self) -> Result<Vec<DriveInfo>, ProviderError> {
        self.with_handles("drives", |h| Ok(disk::collect_drives(&h.disks)))
            .await
    }

    async fn enumerate_interfaces(&mut self) -> Result<Vec<InterfaceInfo>, ProviderError> {
        self.with_handles("network interfaces", |h| {
            network::collect_interfaces(&h.sys_stat)
        })
        .await
    }

    async fn read_memory(&mut self) -> Result<MemoryReading, ProviderError> {
        self.with_handles("memory", |h| memory::collect_ram(&h.sys_stat))
            .await
    }

    async fn read_gpu(&mut self) -> Result<GpuReading, ProviderError> {
        if !self.gpu_present {
            return Err(ProviderError::Unavailable(String::from("GPU")));
        }
        nvidia::collect().await
    }

    async fn host_info(&mut self) -> Result<HostInfo, ProviderError> {
        self.with_handles("host info", |_| Ok(system::collect_host()))
            .await
    }

    fn shutdown(&mut self) {
        info!("Releasing hardware providers");
        self.gpu_present = false;
        self.temperature = TemperatureSource::Unavailable;
        // A read stuck on the pool still holds the handles; they go when it returns.
        match self.handles.try_lock() {
            Ok(mut handles) => handles.disks = Disks::new(),
            Err(_) => debug!("Hardware handles busy at shutdown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_run_blocking_returns_result() {
        let state = Arc::new(Mutex::new(41u32));
        let value = run_blocking(&state, "counter", |n| {
            *n += 1;
            Ok(*n)
        })
        .await;
        assert_eq!(value, Ok(42));

        let err: Result<(), _> = run_blocking(&state, "counter", |_| {
            Err(ProviderError::read("counter", "boom"))
        })
        .await;
        assert_eq!(err, Err(ProviderError::read("counter", "boom")));
    }

    #[tokio::test]
    async fn test_stalled_read_does_not_block_the_runtime() {
        let state = Arc::new(Mutex::new(()));
        let start = Instant::now();
        let result = tokio::time::timeout(
            Duration::from_millis(50),
            run_blocking(&state, "refresh", |_| {
                std::thread::sleep(Duration::from_millis(400));
                Ok(())
            }),
        )
        .await;

        assert!(result.is_err(), "timeout fires while the read is stuck");
        assert!(start.elapsed() < Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_panicking_read_is_an_error() {
        let state = Arc::new(Mutex::new(()));
        let result: Result<(), _> =
            run_blocking(&state, "memory", |_| panic!("driver fault")).await;
        assert!(matches!(result, Err(ProviderError::Read { .. })));

        // The poisoned lock is still usable.
        let again = run_blocking(&state, "memory", |_| Ok(7)).await;
        assert_eq!(again, Ok(7));
    }
}
