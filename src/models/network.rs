#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkInfo {
    pub name: String,
    pub download_mbps: f64,
    pub upload_mbps: f64,
    pub total_down_gb: f64,
    pub total_up_gb: f64,
}
