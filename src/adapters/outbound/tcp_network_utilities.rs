//! TCP/HTTP Network Utilities
//!
//! Implements NetworkUtilities with bounded TCP connects and HTTP GETs.

use crate::domain::ports::NetworkUtilities;
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// Probe configuration.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Upper bound for a single probe
    pub timeout: Duration,
    /// Port used when a connection string names a server without one
    pub default_db_port: u16,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            default_db_port: 1433,
        }
    }
}

/// Network utilities backed by real sockets.
///
/// Every probe is bounded by `ProbeConfig::timeout` so a hung server cannot
/// stall endpoint evaluation.
pub struct TcpNetworkUtilities {
    config: ProbeConfig,
}

impl TcpNetworkUtilities {
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// TCP connection check.
    async fn tcp_check(&self, addr: &str) -> Result<(), String> {
        match tokio::time::timeout(self.config.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(mut stream)) => {
                let _ = stream.shutdown().await;
                Ok(())
            }
            Ok(Err(e)) => Err(format!("connection failed: {}", e)),
            Err(_) => Err("connection timeout".to_string()),
        }
    }

    /// HTTP availability check.
    async fn http_check(&self, url: &str) -> Result<(), String> {
        let client = reqwest::Client::builder()
            .timeout(self.config.timeout)
            .build()
            .map_err(|e| format!("client error: {}", e))?;

        match client.get(url).send().await {
            Ok(resp) if resp.status().is_success() => Ok(()),
            Ok(resp) => Err(format!("unhealthy status: {}", resp.status())),
            Err(e) => Err(format!("request failed: {}", e)),
        }
    }
}

impl Default for TcpNetworkUtilities {
    fn default() -> Self {
        Self::new(ProbeConfig::default())
    }
}

#[async_trait]
impl NetworkUtilities for TcpNetworkUtilities {
    async fn verify_db_server_connectivity(&self, connection_string: &str) -> bool {
        // Connection strings may carry credentials; never log them
        let Some(addr) = db_server_address(connection_string, self.config.default_db_port) else {
            tracing::warn!("no server address found in connection string");
            return false;
        };

        match self.tcp_check(&addr).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(addr = %addr, error = %e, "db server probe failed");
                false
            }
        }
    }

    async fn verify_http_server_availability(&self, url: &str) -> bool {
        match self.http_check(url).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "http server probe failed");
                false
            }
        }
    }
}

/// Extract a `host:port` address from a database connection string.
///
/// Accepts key/value connection strings (`Server=`, `Data Source=`,
/// `Host=`, `Address=` plus an optional `Port=`) and bare `host:port` or
/// `host,port` values. SQL Server named instances (`host\instance`) and the
/// `tcp:` prefix are stripped. Returns `None` if no host can be found.
pub fn db_server_address(connection_string: &str, default_port: u16) -> Option<String> {
    let trimmed = connection_string.trim();
    if !trimmed.contains('=') {
        return host_and_port(trimmed, None, default_port);
    }

    let mut server = None;
    let mut port = None;
    for pair in trimmed.split(';') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "server" | "data source" | "datasource" | "host" | "address" | "addr"
            | "network address" => server = Some(value.trim()),
            "port" => port = value.trim().parse::<u16>().ok(),
            _ => {}
        }
    }

    host_and_port(server?, port, default_port)
}

fn host_and_port(value: &str, port: Option<u16>, default_port: u16) -> Option<String> {
    let value = value.strip_prefix("tcp:").unwrap_or(value);

    let (host, inline_port) = if let Some((host, p)) = value.split_once(',') {
        (host, p.trim().parse::<u16>().ok())
    } else if let Some((host, p)) = value.rsplit_once(':') {
        match p.trim().parse::<u16>() {
            Ok(p) => (host, Some(p)),
            Err(_) => (value, None),
        }
    } else {
        (value, None)
    };

    let host = host.split('\\').next().unwrap_or(host).trim();
    let host = match host {
        "" => return None,
        "." | "(local)" => "127.0.0.1",
        h => h,
    };

    Some(format!(
        "{}:{}",
        host,
        inline_port.or(port).unwrap_or(default_port)
    ))
}
