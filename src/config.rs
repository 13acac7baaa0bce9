use crate::adapters::outbound::ProbeConfig;
use crate::domain::entities::EndPointConfiguration;
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // Endpoint document
    pub endpoints_path: String,

    // Probe settings
    pub probe_timeout_ms: u64,
    pub default_db_port: u16,

    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints_path: "endpoints.json".to_string(),
            probe_timeout_ms: 5000,
            default_db_port: 1433,
            debug: false,
        }
    }
}

impl Config {
    /// Probe settings for `TcpNetworkUtilities`.
    pub fn probe_config(&self) -> ProbeConfig {
        ProbeConfig {
            timeout: Duration::from_millis(self.probe_timeout_ms),
            default_db_port: self.default_db_port,
        }
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    config_from(|key| std::env::var(key).ok())
}

fn config_from<F>(var: F) -> anyhow::Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let endpoints_path = var("ADAPTIVE_CLIENT_ENDPOINTS_PATH")
        .unwrap_or_else(|| "endpoints.json".to_string());

    let probe_timeout_ms = var("ADAPTIVE_CLIENT_PROBE_TIMEOUT_MS")
        .and_then(|v| v.parse().ok())
        .unwrap_or(5000);

    let default_db_port = var("ADAPTIVE_CLIENT_DEFAULT_DB_PORT")
        .and_then(|v| v.parse().ok())
        .unwrap_or(1433);

    let debug = var("DEBUG").is_some();

    Ok(Config {
        endpoints_path,
        probe_timeout_ms,
        default_db_port,
        debug,
    })
}

#[derive(Debug, Deserialize)]
struct EndPointsDocument {
    #[serde(rename = "EndPoints")]
    endpoints: Vec<EndPointConfiguration>,
}

/// Read endpoint records from a JSON document of the form
/// `{"EndPoints": [{"Name": ..., "API_Name": ..., ...}]}`.
///
/// Records are returned in document order; validation happens when they are
/// registered.
pub fn load_endpoints(path: impl AsRef<Path>) -> anyhow::Result<Vec<EndPointConfiguration>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read endpoint document {}", path.display()))?;
    let doc: EndPointsDocument = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse endpoint document {}", path.display()))?;
    Ok(doc.endpoints)
}
