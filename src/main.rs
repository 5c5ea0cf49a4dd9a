use env_logger::{Builder, WriteStyle};
use hwpulse::cli::Cli;
use hwpulse::config::AppConfig;
use log::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load configuration first (without logging)
    let config = AppConfig::new().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {:#}", e);
        // Fall back to default configuration
        AppConfig::default()
    });

    // Initialise logger with a configured log level
    Builder::new()
        .filter_level(config.get_log_level())
        .write_style(WriteStyle::Auto)
        .format_timestamp_secs()
        .init();

    let interval = Cli::interval_from(std::env::args_os()).unwrap_or_else(|e| e.exit());
    if let Some(notice) = &interval.notice {
        println!("{}", notice);
        info!("{}", notice);
    }

    if let Err(e) = hwpulse::run(config, interval).await {
        error!("Application error: {:#}", e);
        // Print chain of error causes
        for cause in e.chain().skip(1) {
            error!("Caused by: {}", cause);
        }
        return Err(e);
    }
    Ok(())
}
