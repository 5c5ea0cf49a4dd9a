#[derive(Debug, Clone)]
pub struct CpuInfo {
    pub name: String,
    pub total_usage_percent: f32,
    pub process_count: u64,
    pub thread_count: u64,
    /// `None` when the host exposes no CPU temperature sensor.
    pub temperature_c: Option<f32>,
}

impl Default for CpuInfo {
    fn default() -> Self {
        Self {
            name: String::from("Unknown CPU"),
            total_usage_percent: 0.0,
            process_count: 0,
            thread_count: 0,
            temperature_c: None,
        }
    }
}
