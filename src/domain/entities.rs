//! Domain Entities - Endpoints and perimeters
//!
//! An endpoint describes one concrete backend for a logical API. A perimeter
//! is the ordered set of active endpoints serving that API. Both are built
//! once at startup and are immutable afterwards.

use crate::domain::error::ConfigError;
use crate::domain::value_objects::EndPointKey;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// One candidate backend.
///
/// Field names follow the `EndPoints` section of the host's configuration
/// document (`Name`, `API_Name`, `EndPointType`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EndPointConfiguration {
    /// Unique name across every API
    pub name: String,
    /// Name of the API (perimeter) this endpoint belongs to
    #[serde(rename = "API_Name", alias = "ApiName")]
    pub api_name: String,
    /// Kind of client used to reach the endpoint (InProcess, WebAPI, ...)
    #[serde(rename = "EndPointType")]
    pub endpoint_type: String,
    /// Storage or transport technology (MSSQL, MySQL, ...); may be empty
    #[serde(default)]
    pub provider_name: String,
    /// Connection string or base address
    pub connection_string: String,
    /// Inactive endpoints are skipped entirely
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    /// Position in registration order; lower is tried first
    #[serde(skip)]
    pub ordinal: usize,
}

fn default_is_active() -> bool {
    true
}

impl EndPointConfiguration {
    /// Create an active endpoint.
    pub fn new(
        name: impl Into<String>,
        api_name: impl Into<String>,
        endpoint_type: impl Into<String>,
        provider_name: impl Into<String>,
        connection_string: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            api_name: api_name.into(),
            endpoint_type: endpoint_type.into(),
            provider_name: provider_name.into(),
            connection_string: connection_string.into(),
            is_active: true,
            ordinal: 0,
        }
    }

    /// Set the active flag.
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Validator/registry lookup key for this endpoint.
    pub fn key(&self) -> EndPointKey {
        EndPointKey::new(self.endpoint_type.clone(), self.provider_name.clone())
    }
}

/// Ordered set of active endpoints serving one API.
#[derive(Debug, Clone)]
pub struct Perimeter {
    name: String,
    endpoints: Vec<Arc<EndPointConfiguration>>,
}

impl Perimeter {
    /// Create a perimeter; members are kept sorted by ordinal.
    pub fn new(name: impl Into<String>, mut endpoints: Vec<EndPointConfiguration>) -> Self {
        endpoints.sort_by_key(|e| e.ordinal);
        Self {
            name: name.into(),
            endpoints: endpoints.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in try-order.
    pub fn endpoints(&self) -> &[Arc<EndPointConfiguration>] {
        &self.endpoints
    }

    /// Find a member by endpoint name.
    pub fn find(&self, endpoint_name: &str) -> Option<&Arc<EndPointConfiguration>> {
        self.endpoints.iter().find(|e| e.name == endpoint_name)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

/// Validate endpoint records and group them into perimeters.
///
/// Inactive records are dropped before validation. Each record's ordinal is
/// its position in `records`, so the first registered endpoint of an API is
/// the first one tried. Perimeters are returned in order of first appearance.
pub fn build_perimeters<I>(records: I) -> Result<Vec<Perimeter>, ConfigError>
where
    I: IntoIterator<Item = EndPointConfiguration>,
{
    let active: Vec<EndPointConfiguration> = records
        .into_iter()
        .enumerate()
        .map(|(ordinal, mut e)| {
            e.ordinal = ordinal;
            e
        })
        .filter(|e| e.is_active)
        .collect();

    validate_endpoints(&active)?;

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<EndPointConfiguration>> = HashMap::new();
    for endpoint in active {
        if !groups.contains_key(&endpoint.api_name) {
            order.push(endpoint.api_name.clone());
        }
        groups
            .entry(endpoint.api_name.clone())
            .or_default()
            .push(endpoint);
    }

    Ok(order
        .into_iter()
        .filter_map(|name| {
            let members = groups.remove(&name)?;
            Some(Perimeter::new(name, members))
        })
        .collect())
}

fn validate_endpoints(endpoints: &[EndPointConfiguration]) -> Result<(), ConfigError> {
    if endpoints.iter().any(|e| e.name.is_empty()) {
        return Err(ConfigError::BlankEndPointName);
    }

    if let Some(e) = endpoints.iter().find(|e| e.api_name.is_empty()) {
        return Err(ConfigError::BlankApiName(e.name.clone()));
    }

    // Names must be unique across all APIs
    let mut seen = HashSet::new();
    for endpoint in endpoints {
        if !seen.insert(endpoint.name.as_str()) {
            return Err(ConfigError::DuplicateEndPointName(endpoint.name.clone()));
        }
    }

    Ok(())
}
