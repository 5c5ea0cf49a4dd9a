#[derive(Debug, Clone, PartialEq)]
pub struct GpuInfo {
    pub name: String,
    pub core_load: f32,
    pub core_temp: f32,
    pub core_clock_mhz: f32,
    pub mem_clock_mhz: f32,
    pub vram_total_mb: f32,
    pub vram_used_mb: f32,
    pub vram_percent_used: f32,
}

impl Default for GpuInfo {
    fn default() -> Self {
        Self {
            name: String::from(""),
            core_load: 0.0,
            core_temp: 0.0,
            core_clock_mhz: 0.0,
            mem_clock_mhz: 0.0,
            vram_total_mb: 0.0,
            vram_used_mb: 0.0,
            vram_percent_used: 0.0,
        }
    }
}
