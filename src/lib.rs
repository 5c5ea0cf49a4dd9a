pub mod cli;
pub mod collectors;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod netinfo;
pub mod provider;
pub mod rate;
pub mod renderer;
pub mod sampler;
mod utils;

use crate::cli::Interval;
use crate::collectors::HostProvider;
use crate::config::AppConfig;
use crate::dashboard::Terminal;
use crate::provider::Provider;
use crate::renderer::Style;
use crate::sampler::{Sampler, SamplerOptions};
use log::{debug, info, warn};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Set once by Ctrl-C. The loop checks it before each tick, and the sleep
/// between ticks wakes up as soon as it is set.
#[derive(Debug, Default)]
pub struct ShutdownSignal {
    triggered: AtomicBool,
    notify: Notify,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.triggered.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    pub async fn sleep(&self, duration: Duration) {
        if self.is_triggered() {
            return;
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => {}
            _ = self.notify.notified() => {}
        }
    }
}

pub async fn run(config: AppConfig, interval: Interval) -> anyhow::Result<()> {
    info!("Starting application, refreshing every {} s", interval.every.as_secs());

    let shutdown = Arc::new(ShutdownSignal::new());
    let listener = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, finishing current tick");
                listener.trigger();
            }
            Err(e) => warn!("Unable to listen for Ctrl-C: {}", e),
        }
    });

    let mut provider = HostProvider::new();
    let options = lookup_addresses(&config, &mut provider).await;
    let mut sampler = Sampler::new(provider, options).await;

    let style = Style {
        notice: interval.notice,
        ..Style::from_config(&config)
    };
    let mut terminal = Terminal::stdout();
    let ticks = main_loop(&mut sampler, &mut terminal, &style, interval.every, &shutdown).await;

    terminal.restore();
    sampler.shutdown();
    info!("Application stopped after {} ticks", ticks);
    Ok(())
}

/// Local and external addresses are looked up once; they are not refreshed
/// while running.
async fn lookup_addresses<P: Provider>(config: &AppConfig, provider: &mut P) -> SamplerOptions {
    let hostname = provider
        .host_info()
        .await
        .map(|host| host.hostname)
        .unwrap_or_default();
    let interface_addrs: Vec<_> = provider
        .enumerate_interfaces()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|iface| iface.is_up && !iface.is_loopback)
        .flat_map(|iface| iface.ipv4)
        .collect();

    let local_ip = netinfo::local_ip(&hostname, &interface_addrs).await;
    let external_ip = if config.external_ip {
        println!("Looking up external IP via {} ...", config.ip_echo_url);
        netinfo::external_ip(&config.ip_echo_url, config.ip_lookup_timeout()).await
    } else {
        debug!("External IP lookup disabled");
        netinfo::NOT_AVAILABLE.to_string()
    };

    SamplerOptions {
        provider_timeout: config.provider_timeout(),
        local_ip,
        external_ip,
    }
}

/// sample → render → sleep until `shutdown` is triggered. Returns the number
/// of frames drawn.
pub async fn main_loop<P: Provider, W: Write>(
    sampler: &mut Sampler<P>,
    terminal: &mut Terminal<W>,
    style: &Style,
    interval: Duration,
    shutdown: &ShutdownSignal,
) -> u64 {
    let mut ticks = 0u64;
    loop {
        if shutdown.is_triggered() {
            break;
        }

        let snapshot = sampler.sample().await;
        let frame = dashboard::render(style, &snapshot);
        terminal.draw(&frame);
        ticks += 1;

        shutdown.sleep(interval).await;
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Colours;
    use crate::sampler::tests::FakeProvider;
    use std::time::Instant;

    fn plain_style() -> Style {
        Style {
            bar_width: 10,
            colours: Colours::plain(),
            notice: None,
        }
    }

    #[tokio::test]
    async fn test_loop_stops_on_shutdown() {
        let mut sampler = Sampler::new(FakeProvider::healthy(), SamplerOptions::default()).await;
        let mut terminal = Terminal::new(Vec::new());
        let shutdown = Arc::new(ShutdownSignal::new());

        let trigger = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.trigger();
        });

        let ticks = main_loop(
            &mut sampler,
            &mut terminal,
            &plain_style(),
            Duration::from_millis(10),
            &shutdown,
        )
        .await;

        assert!(ticks >= 2, "only {ticks} ticks");
        let written = String::from_utf8(terminal.into_inner()).unwrap();
        assert_eq!(written.matches("hwpulse | testbox").count() as u64, ticks);
    }

    #[tokio::test]
    async fn test_shutdown_cuts_sleep_short() {
        let mut sampler = Sampler::new(FakeProvider::healthy(), SamplerOptions::default()).await;
        let mut terminal = Terminal::new(Vec::new());
        let shutdown = Arc::new(ShutdownSignal::new());

        let trigger = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.trigger();
        });

        let start = Instant::now();
        let ticks = main_loop(
            &mut sampler,
            &mut terminal,
            &plain_style(),
            Duration::from_secs(30),
            &shutdown,
        )
        .await;

        assert_eq!(ticks, 1);
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_no_ticks_after_early_shutdown() {
        let mut sampler = Sampler::new(FakeProvider::healthy(), SamplerOptions::default()).await;
        let mut terminal = Terminal::new(Vec::new());
        let shutdown = ShutdownSignal::new();
        shutdown.trigger();

        let ticks = main_loop(
            &mut sampler,
            &mut terminal,
            &plain_style(),
            Duration::from_millis(10),
            &shutdown,
        )
        .await;
        assert_eq!(ticks, 0);
    }

    #[tokio::test]
    async fn test_failed_external_lookup_keeps_running() {
        let config = AppConfig {
            ip_echo_url: "http://127.0.0.1:9/".into(),
            ip_lookup_timeout_ms: 300,
            ..AppConfig::default()
        };
        let mut provider = FakeProvider::healthy();
        let options = lookup_addresses(&config, &mut provider).await;
        assert_eq!(options.external_ip, netinfo::NOT_AVAILABLE);

        let mut sampler = Sampler::new(provider, options).await;
        let mut terminal = Terminal::new(Vec::new());
        let shutdown = Arc::new(ShutdownSignal::new());
        let trigger = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(60)).await;
            trigger.trigger();
        });
        let ticks = main_loop(
            &mut sampler,
            &mut terminal,
            &plain_style(),
            Duration::from_millis(10),
            &shutdown,
        )
        .await;

        assert!(ticks >= 1);
        let written = String::from_utf8(terminal.into_inner()).unwrap();
        assert!(written.contains("External IP: N/A"));
    }

    #[tokio::test]
    async fn test_disabled_external_lookup() {
        let config = AppConfig {
            external_ip: false,
            ..AppConfig::default()
        };
        let mut provider = FakeProvider::healthy();
        let options = lookup_addresses(&config, &mut provider).await;
        assert_eq!(options.external_ip, netinfo::NOT_AVAILABLE);
        assert_eq!(options.provider_timeout, Duration::from_millis(1000));
    }
}
