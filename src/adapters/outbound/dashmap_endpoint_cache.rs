//! DashMap EndPoint Cache
//!
//! Implements EndPointCache using DashMap for lock-free concurrent access.

use crate::domain::entities::EndPointConfiguration;
use crate::domain::ports::EndPointCache;
use crate::domain::value_objects::ServiceKey;
use dashmap::DashMap;
use std::sync::Arc;

/// DashMap-backed endpoint cache.
///
/// Each read or write locks a single shard for its own duration only.
/// There is no expiry and no single-flight: concurrent misses for the same
/// service each write their own validated endpoint and the last one wins.
#[derive(Clone)]
pub struct DashMapEndPointCache {
    endpoints: Arc<DashMap<ServiceKey, Arc<EndPointConfiguration>>>,
}

impl DashMapEndPointCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            endpoints: Arc::new(DashMap::new()),
        }
    }
}

impl Default for DashMapEndPointCache {
    fn default() -> Self {
        Self::new()
    }
}

impl EndPointCache for DashMapEndPointCache {
    fn get(&self, service: &ServiceKey) -> Option<Arc<EndPointConfiguration>> {
        self.endpoints.get(service).map(|e| e.value().clone())
    }

    fn set(&self, service: ServiceKey, endpoint: Arc<EndPointConfiguration>) {
        self.endpoints.insert(service, endpoint);
    }

    fn invalidate(&self, service: &ServiceKey) {
        if self.endpoints.remove(service).is_some() {
            tracing::debug!(service = %service, "cached endpoint invalidated");
        }
    }

    fn count(&self) -> usize {
        self.endpoints.len()
    }
}
