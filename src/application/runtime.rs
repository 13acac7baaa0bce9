//! Adaptive Client Runtime
//!
//! The frozen registration tables shared by every client scope.

use crate::application::adaptive_client::{AdaptiveClient, ClientFactory};
use crate::application::client_registry::ClientRegistry;
use crate::domain::entities::Perimeter;
use crate::domain::error::ConfigError;
use crate::domain::ports::EndPointCache;
use crate::domain::services::ClientEvaluator;
use crate::domain::value_objects::ServiceKey;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolved, immutable registration state.
///
/// Built once by [`RegistrationHelper::build`](crate::RegistrationHelper::build).
/// The endpoint cache is the only part that changes after construction.
pub struct AdaptiveClientRuntime {
    perimeters: Vec<Arc<Perimeter>>,
    bindings: HashMap<ServiceKey, Arc<Perimeter>>,
    evaluator: ClientEvaluator,
    registry: ClientRegistry,
    cache: Arc<dyn EndPointCache>,
}

impl AdaptiveClientRuntime {
    pub(crate) fn new(
        perimeters: Vec<Arc<Perimeter>>,
        bindings: HashMap<ServiceKey, Arc<Perimeter>>,
        evaluator: ClientEvaluator,
        registry: ClientRegistry,
        cache: Arc<dyn EndPointCache>,
    ) -> Self {
        Self {
            perimeters,
            bindings,
            evaluator,
            registry,
            cache,
        }
    }

    /// Open a new client scope for service `S`.
    ///
    /// Each scope has its own current endpoint; the cache is shared.
    pub fn client<S: ?Sized + 'static>(self: &Arc<Self>) -> AdaptiveClient<S> {
        AdaptiveClient::new(self.clone())
    }

    /// Factory building `S` clients for named endpoints without probing.
    pub fn factory<S: ?Sized + 'static>(self: &Arc<Self>) -> ClientFactory<S> {
        ClientFactory::new(self.clone())
    }

    /// Perimeter bound to a service.
    pub fn perimeter_for(&self, service: &ServiceKey) -> Result<&Perimeter, ConfigError> {
        self.bindings
            .get(service)
            .map(|p| p.as_ref())
            .ok_or_else(|| ConfigError::NoPerimeterBound(service.to_string()))
    }

    /// Every registered perimeter, in registration order.
    pub fn perimeters(&self) -> impl Iterator<Item = &Perimeter> {
        self.perimeters.iter().map(|p| p.as_ref())
    }

    pub fn evaluator(&self) -> &ClientEvaluator {
        &self.evaluator
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    /// The shared endpoint cache.
    pub fn endpoint_cache(&self) -> &Arc<dyn EndPointCache> {
        &self.cache
    }
}
