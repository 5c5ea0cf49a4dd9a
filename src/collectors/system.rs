use crate::provider::{HostInfo, ProviderError};
use crate::utils::file;
use log::debug;
use std::path::Path;
use std::time::Instant;
use sysinfo::{System as SysInfo, ThreadKind};

const PROC_LOADAVG: &str = "/proc/loadavg";

pub fn collect_host() -> HostInfo {
    let start = Instant::now();
    let os = SysInfo::long_os_version()
        .or_else(SysInfo::name)
        .unwrap_or_default();
    let result = HostInfo {
        hostname: SysInfo::host_name().unwrap_or_default(),
        os,
        uptime_secs: SysInfo::uptime(),
    };
    debug!("collect_host took: {} ms", start.elapsed().as_millis());
    result
}

/// Processes, not counting the threads sysinfo lists alongside them.
pub fn collect_process_count(sys: &SysInfo) -> Result<f64, ProviderError> {
    count_processes(sys.processes().values().map(|p| p.thread_kind()))
}

fn count_processes(
    kinds: impl Iterator<Item = Option<ThreadKind>>,
) -> Result<f64, ProviderError> {
    let count = kinds.filter(Option::is_none).count();
    if count == 0 {
        return Err(ProviderError::Unavailable(String::from("process list")));
    }
    Ok(count as f64)
}

/// Sums task lists; a process without one counts as a single thread.
fn sum_threads(tasks: impl Iterator<Item = Option<usize>>) -> Result<f64, ProviderError> {
    let threads: usize = tasks.map(|n| n.unwrap_or(0).max(1)).sum();
    if threads == 0 {
        return Err(ProviderError::Unavailable(String::from("thread count")));
    }
    Ok(threads as f64)
}

/// Threads across all processes. The kernel keeps the total in
/// `/proc/loadavg`; elsewhere fall back to summing per-process task lists.
pub fn collect_thread_count(sys: &SysInfo) -> Result<f64, ProviderError> {
    let start = Instant::now();
    let result = match file::thread_count_from_loadavg(Path::new(PROC_LOADAVG)) {
        Ok(threads) => Ok(threads as f64),
        Err(e) => {
            debug!("thread count from {} unavailable: {}", PROC_LOADAVG, e);
            sum_threads(
                sys.processes()
                    .values()
                    .filter(|p| p.thread_kind().is_none())
                    .map(|p| p.tasks().map(|tasks| tasks.len())),
            )
        }
    };
    debug!("collect_thread_count took: {} ms", start.elapsed().as_millis());
    result
}
