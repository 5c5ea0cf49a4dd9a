use crate::provider::ProviderError;
use crate::utils::hwmon;
use log::debug;
use std::path::{Path, PathBuf};
use std::time::Instant;
use sysinfo::System as SysInfo;
use systemstat::{Platform, System};

/// Where the CPU temperature comes from, settled once at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum TemperatureSource {
    Hwmon(PathBuf),
    SystemStat,
    Unavailable,
}

pub fn detect_temperature_source(sys: &System) -> TemperatureSource {
    let start = Instant::now();
    let result = if let Some(sensor) = hwmon::find_cpu_sensor(Path::new(hwmon::HWMON_ROOT)) {
        debug!("CPU temperature from hwmon {} ({})", sensor.name, sensor.label);
        TemperatureSource::Hwmon(sensor.path)
    } else if sys.cpu_temp().is_ok() {
        TemperatureSource::SystemStat
    } else {
        TemperatureSource::Unavailable
    };
    debug!(
        "detect_temperature_source took: {} ms",
        start.elapsed().as_millis()
    );
    result
}

pub fn collect_temperature(sys: &System, source: &TemperatureSource) -> Result<f64, ProviderError> {
    let start = Instant::now();
    let result = match source {
        TemperatureSource::Hwmon(path) => hwmon::read_temperature(path)
            .map(f64::from)
            .ok_or_else(|| ProviderError::read("CPU temperature", path.display())),
        TemperatureSource::SystemStat => sys
            .cpu_temp()
            .map(f64::from)
            .map_err(|x| ProviderError::read("CPU temperature", x)),
        TemperatureSource::Unavailable => {
            Err(ProviderError::Unavailable(String::from("CPU temperature sensor")))
        }
    };
    debug!(
        "collect_temperature took: {} ms",
        start.elapsed().as_millis()
    );
    result
}

/// Usage since the previous `refresh_cpu_usage`, in percent.
pub fn collect_load_aggregate(sys: &SysInfo) -> Result<f64, ProviderError> {
    if sys.cpus().is_empty() {
        return Err(ProviderError::Unavailable(String::from("CPU usage")));
    }
    Ok(f64::from(sys.global_cpu_usage()))
}

pub fn collect_name(sys: &SysInfo) -> String {
    sys.cpus()
        .first()
        .map(|cpu| cpu.brand().trim().to_string())
        .unwrap_or_default()
}

pub fn collect_count(sys: &SysInfo) -> usize {
    sys.cpus().len()
}
