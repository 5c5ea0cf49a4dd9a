use log::{debug, warn};
use reqwest::Client;
use std::net::{IpAddr, Ipv4Addr};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::lookup_host;

pub const NOT_AVAILABLE: &str = "N/A";

const DNS_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("lookup timed out after {0} ms")]
    Timeout(u64),
    #[error("response was not an IP address: {0:?}")]
    Malformed(String),
    #[error("could not resolve {0}")]
    Unresolved(String),
}

/// First non-loopback IPv4 address the hostname resolves to, falling back to
/// the first non-loopback address found on an interface.
pub async fn local_ip(hostname: &str, interface_addrs: &[Ipv4Addr]) -> String {
    match resolve_hostname(hostname).await {
        Ok(addr) => addr.to_string(),
        Err(e) => {
            debug!("Local IP via DNS: {}", e);
            interface_addrs
                .iter()
                .find(|a| !a.is_loopback() && !a.is_unspecified())
                .map(|a| a.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        }
    }
}

async fn resolve_hostname(hostname: &str) -> Result<Ipv4Addr, LookupError> {
    if hostname.is_empty() {
        return Err(LookupError::Unresolved(String::from("<empty hostname>")));
    }
    let addrs = match tokio::time::timeout(DNS_TIMEOUT, lookup_host((hostname, 0))).await {
        Ok(Ok(addrs)) => addrs,
        Ok(Err(_)) => return Err(LookupError::Unresolved(hostname.to_string())),
        Err(_) => return Err(LookupError::Timeout(DNS_TIMEOUT.as_millis() as u64)),
    };

    addrs
        .filter_map(|sock| match sock.ip() {
            IpAddr::V4(v4) if !v4.is_loopback() => Some(v4),
            _ => None,
        })
        .next()
        .ok_or_else(|| LookupError::Unresolved(hostname.to_string()))
}

/// One GET to an IP-echo service. Never retried; any failure is logged and
/// reported as `N/A`.
pub async fn external_ip(url: &str, limit: Duration) -> String {
    let start = Instant::now();
    let result = match fetch_external_ip(url, limit).await {
        Ok(ip) => ip.to_string(),
        Err(e) => {
            warn!("External IP lookup via {} failed: {}", url, e);
            NOT_AVAILABLE.to_string()
        }
    };
    debug!("external_ip took: {} ms", start.elapsed().as_millis());
    result
}

async fn fetch_external_ip(url: &str, limit: Duration) -> Result<IpAddr, LookupError> {
    let client = Client::builder().timeout(limit).build()?;
    let request = async {
        let body = client.get(url).send().await?.error_for_status()?.text().await?;
        parse_ip(&body)
    };
    match tokio::time::timeout(limit, request).await {
        Ok(result) => result,
        Err(_) => Err(LookupError::Timeout(limit.as_millis() as u64)),
    }
}

fn parse_ip(body: &str) -> Result<IpAddr, LookupError> {
    let trimmed = body.trim();
    trimmed
        .parse()
        .map_err(|_| LookupError::Malformed(trimmed.chars().take(64).collect()))
}
