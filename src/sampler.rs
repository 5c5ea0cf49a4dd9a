use crate::models::{
    clamp_percent, percent_of, CpuInfo, DiskInfo, GpuInfo, HostSummary, MemoryInfo, NetworkInfo,
    Snapshot, BYTES_PER_GB,
};
use crate::provider::{Counter, CounterCategory, HardwareInventory, Provider, ProviderError};
use crate::rate::{bytes_to_mb_per_sec, bytes_to_mbps, RateState};
use chrono::Local;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::future::Future;
use std::time::{Duration, Instant};

/// Hardware detection may spawn helper tools for the first time, so it gets
/// a longer bound than the per-tick reads.
const DETECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct SamplerOptions {
    pub provider_timeout: Duration,
    pub local_ip: String,
    pub external_ip: String,
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_millis(1000),
            local_ip: String::from("N/A"),
            external_ip: String::from("N/A"),
        }
    }
}

/// Owns the provider and everything that has to survive between ticks.
pub struct Sampler<P: Provider> {
    provider: P,
    inventory: HardwareInventory,
    categories: HashSet<CounterCategory>,
    rates: RateState,
    options: SamplerOptions,
}

async fn bounded<T, F>(limit: Duration, what: &str, fut: F) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout(what.to_string(), limit.as_millis() as u64)),
    }
}

fn or_default<T: Default>(what: &str, result: Result<T, ProviderError>) -> T {
    result.unwrap_or_else(|e| {
        log_failure(what, &e);
        T::default()
    })
}

fn log_failure(what: &str, err: &ProviderError) {
    match err {
        ProviderError::Unavailable(_) => debug!("{}: {}", what, err),
        _ => warn!("{}: {}", what, err),
    }
}

impl<P: Provider> Sampler<P> {
    pub async fn new(mut provider: P, options: SamplerOptions) -> Self {
        let start = Instant::now();
        let inventory = match tokio::time::timeout(DETECT_TIMEOUT, provider.detect_hardware()).await
        {
            Ok(inventory) => inventory,
            Err(_) => {
                warn!(
                    "Hardware detection timed out after {} ms, continuing without it",
                    DETECT_TIMEOUT.as_millis()
                );
                HardwareInventory::default()
            }
        };
        let categories = provider.list_categories();

        info!(
            "Detected CPU '{}' ({} logical cores), GPU: {}, motherboard: {}",
            inventory.cpu_name,
            inventory.logical_cores,
            inventory.gpu_name.as_deref().unwrap_or("none"),
            inventory.motherboard.as_deref().unwrap_or("unknown"),
        );
        debug!("Available counter categories: {:?}", categories);
        debug!("Sampler init took: {} ms", start.elapsed().as_millis());

        Self {
            provider,
            inventory,
            categories,
            rates: RateState::new(),
            options,
        }
    }

    pub async fn sample(&mut self) -> Snapshot {
        let start = Instant::now();
        let limit = self.options.provider_timeout;

        if let Err(e) = bounded(limit, "refresh", self.provider.refresh()).await {
            log_failure("refresh", &e);
        }
        let now = Instant::now();

        let host = self.sample_host().await;
        let cpu = self.sample_cpu().await;
        let memory = self.sample_memory().await;
        let disks = self.sample_disks(now).await;
        let networks = self.sample_networks(now).await;
        let gpu = self.sample_gpu().await;

        let seen: Vec<String> = disks
            .iter()
            .flat_map(|d| [disk_key(&d.name, "read"), disk_key(&d.name, "write")])
            .chain(
                networks
                    .iter()
                    .flat_map(|n| [net_key(&n.name, "rx"), net_key(&n.name, "tx")]),
            )
            .collect();
        self.rates.retain_keys(seen.iter().map(|s| s.as_str()));

        debug!("sample took: {} ms", start.elapsed().as_millis());

        Snapshot {
            timestamp: Local::now(),
            host,
            cpu,
            memory,
            disks,
            networks,
            gpu,
        }
    }

    /// Releases provider handles. Rate history goes with the sampler.
    pub fn shutdown(mut self) {
        debug!("Shutting down sampler, dropping {} rate sources", self.rates.len());
        self.provider.shutdown();
    }

    async fn counter(&mut self, counter: Counter) -> Result<f64, ProviderError> {
        let category = counter.category();
        if !self.categories.contains(&category) {
            return Err(ProviderError::Unavailable(format!("{:?} counters", category)));
        }
        let what = format!("{:?}", counter);
        bounded(
            self.options.provider_timeout,
            &what,
            self.provider.read_counter(&counter),
        )
        .await
    }

    async fn sample_host(&mut self) -> HostSummary {
        let limit = self.options.provider_timeout;
        let info = or_default(
            "host info",
            bounded(limit, "host info", self.provider.host_info()).await,
        );

        HostSummary {
            hostname: if info.hostname.is_empty() {
                String::from("unknown")
            } else {
                info.hostname
            },
            os: info.os,
            motherboard: self.inventory.motherboard.clone(),
            uptime_secs: info.uptime_secs,
            local_ip: self.options.local_ip.clone(),
            external_ip: self.options.external_ip.clone(),
        }
    }

    async fn sample_cpu(&mut self) -> CpuInfo {
        let usage = or_default("CPU usage", self.counter(Counter::CpuTotal).await);
        let processes = or_default("process count", self.counter(Counter::ProcessCount).await);
        let threads = or_default("thread count", self.counter(Counter::ThreadCount).await);

        let temperature_c = if self.inventory.cpu_temperature_sensor {
            match self.counter(Counter::CpuTemperature).await {
                Ok(t) => Some(t as f32),
                Err(e) => {
                    log_failure("CPU temperature", &e);
                    None
                }
            }
        } else {
            None
        };

        CpuInfo {
            name: if self.inventory.cpu_name.is_empty() {
                CpuInfo::default().name
            } else {
                self.inventory.cpu_name.clone()
            },
            total_usage_percent: clamp_percent(usage as f32),
            process_count: processes.max(0.0) as u64,
            thread_count: threads.max(0.0) as u64,
            temperature_c,
        }
    }

    async fn sample_memory(&mut self) -> MemoryInfo {
        let limit = self.options.provider_timeout;
        let reading = or_default(
            "memory",
            bounded(limit, "memory", self.provider.read_memory()).await,
        );
        MemoryInfo::from_bytes(reading.used_bytes, reading.total_bytes)
    }

    async fn sample_disks(&mut self, now: Instant) -> Vec<DiskInfo> {
        let limit = self.options.provider_timeout;
        let drives = or_default(
            "drives",
            bounded(limit, "drives", self.provider.enumerate_drives()).await,
        );

        let mut disks = Vec::with_capacity(drives.len());
        for drive in drives {
            let mut disk =
                DiskInfo::with_capacity(&drive.name, drive.total_bytes, drive.available_bytes);

            match self.counter(Counter::DiskReadBytes(drive.name.clone())).await {
                Ok(bytes) => {
                    let rate = self.rates.per_second(&disk_key(&drive.name, "read"), bytes, now);
                    disk.read_mbps = bytes_to_mb_per_sec(rate);
                }
                Err(e) => log_failure(&format!("{} read bytes", drive.name), &e),
            }
            match self.counter(Counter::DiskWriteBytes(drive.name.clone())).await {
                Ok(bytes) => {
                    let rate = self.rates.per_second(&disk_key(&drive.name, "write"), bytes, now);
                    disk.write_mbps = bytes_to_mb_per_sec(rate);
                }
                Err(e) => log_failure(&format!("{} write bytes", drive.name), &e),
            }
            disks.push(disk);
        }
        disks
    }

    async fn sample_networks(&mut self, now: Instant) -> Vec<NetworkInfo> {
        let limit = self.options.provider_timeout;
        let interfaces = or_default(
            "network interfaces",
            bounded(limit, "network interfaces", self.provider.enumerate_interfaces()).await,
        );

        let mut networks = Vec::new();
        for iface in interfaces.into_iter().filter(|i| i.is_up && !i.is_loopback) {
            let mut net = NetworkInfo {
                name: iface.name.clone(),
                ..NetworkInfo::default()
            };

            match self.counter(Counter::NetReceivedBytes(iface.name.clone())).await {
                Ok(bytes) => {
                    let rate = self.rates.per_second(&net_key(&iface.name, "rx"), bytes, now);
                    net.download_mbps = bytes_to_mbps(rate);
                    net.total_down_gb = bytes.max(0.0) / BYTES_PER_GB;
                }
                Err(e) => log_failure(&format!("{} received bytes", iface.name), &e),
            }
            match self.counter(Counter::NetSentBytes(iface.name.clone())).await {
                Ok(bytes) => {
                    let rate = self.rates.per_second(&net_key(&iface.name, "tx"), bytes, now);
                    net.upload_mbps = bytes_to_mbps(rate);
                    net.total_up_gb = bytes.max(0.0) / BYTES_PER_GB;
                }
                Err(e) => log_failure(&format!("{} sent bytes", iface.name), &e),
            }
            networks.push(net);
        }
        networks
    }

    async fn sample_gpu(&mut self) -> Option<GpuInfo> {
        // Absence was settled at startup.
        let name = self.inventory.gpu_name.clone()?;
        let limit = self.options.provider_timeout;

        let gpu = match bounded(limit, "GPU", self.provider.read_gpu()).await {
            Ok(reading) => GpuInfo {
                name: if reading.name.is_empty() { name } else { reading.name },
                core_load: clamp_percent(reading.core_load),
                core_temp: reading.core_temp.max(0.0),
                core_clock_mhz: reading.core_clock_mhz.max(0.0),
                mem_clock_mhz: reading.mem_clock_mhz.max(0.0),
                vram_total_mb: reading.vram_total_mb.max(0.0),
                vram_used_mb: reading.vram_used_mb.max(0.0),
                vram_percent_used: percent_of(
                    reading.vram_used_mb.max(0.0) as f64,
                    reading.vram_total_mb as f64,
                ),
            },
            Err(e) => {
                log_failure("GPU", &e);
                GpuInfo {
                    name,
                    ..GpuInfo::default()
                }
            }
        };
        Some(gpu)
    }

    #[cfg(test)]
    pub(crate) fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }
}

fn disk_key(name: &str, direction: &str) -> String {
    format!("disk:{}:{}", name, direction)
}

fn net_key(name: &str, direction: &str) -> String {
    format!("net:{}:{}", name, direction)
}
