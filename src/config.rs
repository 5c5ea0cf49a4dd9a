use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment};
use log::{debug, LevelFilter};
use serde::Deserialize;
use std::time::Duration;

pub const ENV_PREFIX: &str = "HWPULSE";

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_bar_width() -> usize {
    30
}

fn default_color() -> bool {
    true
}

fn default_provider_timeout_ms() -> u64 {
    1000
}

fn default_external_ip() -> bool {
    true
}

fn default_ip_echo_url() -> String {
    "https://api.ipify.org".to_string()
}

fn default_ip_lookup_timeout_ms() -> u64 {
    3000
}

/// Settings read from `HWPULSE_*` environment variables, e.g.
/// `HWPULSE_BAR_WIDTH=40` or `HWPULSE_EXTERNAL_IP=false`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_bar_width")]
    pub bar_width: usize,
    #[serde(default = "default_color")]
    pub color: bool,
    #[serde(default = "default_provider_timeout_ms")]
    pub provider_timeout_ms: u64,
    #[serde(default = "default_external_ip")]
    pub external_ip: bool,
    #[serde(default = "default_ip_echo_url")]
    pub ip_echo_url: String,
    #[serde(default = "default_ip_lookup_timeout_ms")]
    pub ip_lookup_timeout_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            bar_width: default_bar_width(),
            color: default_color(),
            provider_timeout_ms: default_provider_timeout_ms(),
            external_ip: default_external_ip(),
            ip_echo_url: default_ip_echo_url(),
            ip_lookup_timeout_ms: default_ip_lookup_timeout_ms(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        Self::from_builder(
            Config::builder().add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true)),
        )
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        debug!("Loading configuration from {}_* environment variables", ENV_PREFIX);

        let config = builder.build().context("Failed to load configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize config")?;

        Ok(app_config.normalised())
    }

    fn normalised(mut self) -> Self {
        self.bar_width = self.bar_width.clamp(5, 200);
        self.provider_timeout_ms = self.provider_timeout_ms.max(10);
        self
    }

    pub fn get_log_level(&self) -> LevelFilter {
        match self.log_level.to_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Warn, // Default to Warn if invalid
        }
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    pub fn ip_lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.ip_lookup_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.bar_width, 30);
        assert!(config.color);
        assert_eq!(config.provider_timeout(), Duration::from_millis(1000));
        assert!(config.external_ip);
        assert_eq!(config.ip_echo_url, "https://api.ipify.org");
        assert_eq!(config.get_log_level(), LevelFilter::Warn);
    }

    #[test]
    fn test_empty_source_gives_defaults() {
        let config = AppConfig::from_builder(Config::builder()).unwrap();
        assert_eq!(config.bar_width, 30);
        assert_eq!(config.ip_lookup_timeout_ms, 3000);
    }

    #[test]
    fn test_overrides() {
        let builder = Config::builder()
            .set_override("bar_width", 40)
            .unwrap()
            .set_override("color", false)
            .unwrap()
            .set_override("log_level", "DEBUG")
            .unwrap();
        let config = AppConfig::from_builder(builder).unwrap();

        assert_eq!(config.bar_width, 40);
        assert!(!config.color);
        assert_eq!(config.get_log_level(), LevelFilter::Debug);
    }

    #[test]
    fn test_out_of_range_values_are_normalised() {
        let builder = Config::builder()
            .set_override("bar_width", 1)
            .unwrap()
            .set_override("provider_timeout_ms", 0)
            .unwrap();
        let config = AppConfig::from_builder(builder).unwrap();

        assert_eq!(config.bar_width, 5);
        assert_eq!(config.provider_timeout_ms, 10);
    }

    #[test]
    fn test_bad_value_is_an_error() {
        let builder = Config::builder()
            .set_override("bar_width", "wide")
            .unwrap();
        assert!(AppConfig::from_builder(builder).is_err());
    }

    #[test]
    fn test_from_environment() {
        std::env::set_var("HWPULSE_IP_LOOKUP_TIMEOUT_MS", "1500");
        let config = AppConfig::new().unwrap();
        std::env::remove_var("HWPULSE_IP_LOOKUP_TIMEOUT_MS");

        assert_eq!(config.ip_lookup_timeout(), Duration::from_millis(1500));
    }

    #[test]
    fn test_invalid_log_level() {
        let config = AppConfig {
            log_level: "loud".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.get_log_level(), LevelFilter::Warn);
    }
}
