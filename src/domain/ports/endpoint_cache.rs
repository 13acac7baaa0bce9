//! EndPoint Cache Port
//!
//! Defines the interface for remembering the last known-good endpoint
//! per service interface.

use crate::domain::entities::EndPointConfiguration;
use crate::domain::value_objects::ServiceKey;
use std::sync::Arc;

/// Cache of the last validated endpoint for each service interface.
///
/// Shared by every concurrent caller. Entries never expire: once an endpoint
/// is cached, resolution for that service skips liveness checks until the
/// host calls [`invalidate`](EndPointCache::invalidate). Implementations must
/// only lock for the duration of a single read or write.
pub trait EndPointCache: Send + Sync {
    /// Get the cached endpoint for a service, if one exists.
    fn get(&self, service: &ServiceKey) -> Option<Arc<EndPointConfiguration>>;

    /// Create or overwrite the cached endpoint for a service.
    fn set(&self, service: ServiceKey, endpoint: Arc<EndPointConfiguration>);

    /// Forget the cached endpoint for a service.
    ///
    /// Never called by the resolution engine itself.
    fn invalidate(&self, service: &ServiceKey);

    /// Number of cached services.
    fn count(&self) -> usize;
}
