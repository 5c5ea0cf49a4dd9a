use crate::provider::{GpuReading, ProviderError};
use log::debug;
use std::time::Instant;
use tokio::process::Command;

const QUERY_FIELDS: &str =
    "name,utilization.gpu,temperature.gpu,clocks.gr,clocks.mem,memory.total,memory.used";

/// Name of the first NVIDIA GPU, or `None` when `nvidia-smi` is missing or
/// reports nothing.
pub async fn probe() -> Option<String> {
    let start = Instant::now();
    let output = run_query("name").await.ok()?;
    let result = output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string);
    debug!("nvidia probe took: {} ms", start.elapsed().as_millis());
    result
}

pub async fn collect() -> Result<GpuReading, ProviderError> {
    let start = Instant::now();
    let output = run_query(QUERY_FIELDS).await?;

    let parse_start = Instant::now();
    let result = output.lines().find_map(parse_line).ok_or_else(|| {
        ProviderError::read(
            "GPU",
            format!("unexpected nvidia-smi output: {}", output.trim()),
        )
    });
    debug!(
        "Nvidia GPU data parsing took: {} ms",
        parse_start.elapsed().as_millis()
    );

    debug!("collect (Nvidia GPU) took: {} ms", start.elapsed().as_millis());
    result
}

async fn run_query(fields: &str) -> Result<String, ProviderError> {
    let cmd_start = Instant::now();
    let output = Command::new("nvidia-smi")
        .arg(format!("--query-gpu={}", fields))
        .arg("--format=csv,noheader,nounits")
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| ProviderError::read("GPU", e))?;
    debug!(
        "nvidia-smi command execution took: {} ms",
        cmd_start.elapsed().as_millis()
    );

    if !output.status.success() {
        return Err(ProviderError::read(
            "GPU",
            format!("nvidia-smi exited with {}", output.status),
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parses one `nvidia-smi` CSV row. Fields the driver reports as `[N/A]`
/// read as zero.
fn parse_line(line: &str) -> Option<GpuReading> {
    let values: Vec<&str> = line.split(',').map(|s| s.trim()).collect();
    if values.len() != 7 || values[0].is_empty() {
        return None;
    }
    let number = |s: &str| s.parse::<f32>().unwrap_or(0.0);

    Some(GpuReading {
        name: values[0].to_string(),
        core_load: number(values[1]),
        core_temp: number(values[2]),
        core_clock_mhz: number(values[3]),
        mem_clock_mhz: number(values[4]),
        vram_total_mb: number(values[5]),
        vram_used_mb: number(values[6]),
    })
}
