//! adaptive-client - endpoint connectivity check
//!
//! Composition root: loads the endpoint document, validates it into
//! perimeters and reports which endpoint each perimeter would select.
//!
//! Every active endpoint is probed, not just the first live one, so the
//! report covers the whole document. The resolution engine stops at the
//! first live candidate and is not used here.

use adaptive_client::config::{load_config, load_endpoints};
use adaptive_client::domain::value_objects::{EndPointKey, EndPointType};
use adaptive_client::{
    DbServerValidator, EndPointValidator, HttpServerValidator, NetworkUtilities,
    RegistrationHelper, TcpNetworkUtilities,
};
use std::collections::HashMap;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt().with_max_level(log_level).init();

    tracing::info!(
        "starting adaptive-client endpoints={} probe_timeout_ms={}",
        cfg.endpoints_path,
        cfg.probe_timeout_ms
    );

    // ===== COMPOSITION ROOT =====

    let endpoints = load_endpoints(&cfg.endpoints_path)?;
    let network: Arc<dyn NetworkUtilities> =
        Arc::new(TcpNetworkUtilities::new(cfg.probe_config()));

    // Stock validators: HTTP for web endpoints, TCP for everything else
    let mut validators: HashMap<EndPointKey, Arc<dyn EndPointValidator>> = HashMap::new();
    for endpoint in endpoints.iter().filter(|e| e.is_active) {
        validators.entry(endpoint.key()).or_insert_with(|| {
            if endpoint.endpoint_type == EndPointType::WEB_API {
                Arc::new(HttpServerValidator::new(network.clone())) as Arc<dyn EndPointValidator>
            } else {
                Arc::new(DbServerValidator::new(network.clone()))
            }
        });
    }

    let mut helper = RegistrationHelper::new();
    helper.register_endpoints(endpoints)?;
    for (key, validator) in &validators {
        helper.register_validator(key.endpoint_type(), key.provider_name(), validator.clone())?;
    }
    let runtime = helper.build();

    let mut unreachable = 0;
    for perimeter in runtime.perimeters() {
        let mut selected = None;

        for endpoint in perimeter.endpoints() {
            let Some(validator) = validators.get(&endpoint.key()) else {
                continue;
            };

            let alive = validator.validate(&endpoint.connection_string).await;
            tracing::info!(
                api = %perimeter.name(),
                endpoint = %endpoint.name,
                alive,
                "probed endpoint"
            );
            if alive && selected.is_none() {
                selected = Some(endpoint.name.clone());
            }
        }

        match selected {
            Some(name) => tracing::info!(api = %perimeter.name(), endpoint = %name, "would select"),
            None => {
                unreachable += 1;
                tracing::warn!(api = %perimeter.name(), "no reachable endpoint");
            }
        }
    }

    if unreachable > 0 {
        anyhow::bail!("{} perimeter(s) have no reachable endpoint", unreachable);
    }

    Ok(())
}
