//! Registration Helper
//!
//! Startup-time builder for perimeters, service bindings, validators and
//! client factories. Everything is validated here, once; nothing is looked
//! up by reflection at call time.

use crate::adapters::outbound::DashMapEndPointCache;
use crate::application::client_registry::ClientRegistry;
use crate::application::runtime::AdaptiveClientRuntime;
use crate::domain::entities::{build_perimeters, EndPointConfiguration, Perimeter};
use crate::domain::error::ConfigError;
use crate::domain::ports::{EndPointCache, EndPointValidator};
use crate::domain::services::{discard_sink, ClientEvaluator, DiagnosticSink};
use crate::domain::value_objects::{EndPointKey, ServiceKey};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// A unit of registrations, typically one per API.
pub trait AdaptiveClientModule {
    fn register(&self, helper: &mut RegistrationHelper) -> Result<(), ConfigError>;
}

/// Builder for an [`AdaptiveClientRuntime`].
///
/// Endpoints must be registered before the services that bind to them.
///
/// # Example
/// ```ignore
/// let mut helper = RegistrationHelper::new();
/// helper
///     .register_endpoints(endpoints)?
///     .register_validator("InProcess", "MSSQL", Arc::new(DbServerValidator::new(network)))?
///     .register_service::<dyn OrdersService, _>("InProcess", "Orders", "MSSQL", |e| {
///         Arc::new(OrdersRepository::new(&e.connection_string))
///     })?;
/// let runtime = helper.build();
/// ```
pub struct RegistrationHelper {
    perimeters: Vec<Arc<Perimeter>>,
    perimeters_by_api: HashMap<String, Arc<Perimeter>>,
    endpoint_names: HashSet<String>,
    bindings: HashMap<ServiceKey, Arc<Perimeter>>,
    validators: HashMap<EndPointKey, Arc<dyn EndPointValidator>>,
    registry: ClientRegistry,
    sink: DiagnosticSink,
    cache: Option<Arc<dyn EndPointCache>>,
}

impl RegistrationHelper {
    pub fn new() -> Self {
        Self {
            perimeters: Vec::new(),
            perimeters_by_api: HashMap::new(),
            endpoint_names: HashSet::new(),
            bindings: HashMap::new(),
            validators: HashMap::new(),
            registry: ClientRegistry::new(),
            sink: discard_sink(),
            cache: None,
        }
    }

    /// Validate endpoint records and register one perimeter per API.
    ///
    /// Inactive records are ignored. Nothing is registered if any record is
    /// rejected.
    pub fn register_endpoints<I>(&mut self, endpoints: I) -> Result<&mut Self, ConfigError>
    where
        I: IntoIterator<Item = EndPointConfiguration>,
    {
        let perimeters = build_perimeters(endpoints)?;

        for perimeter in &perimeters {
            if self.perimeters_by_api.contains_key(perimeter.name()) {
                return Err(ConfigError::DuplicatePerimeter(perimeter.name().to_string()));
            }
            if let Some(dupe) = perimeter
                .endpoints()
                .iter()
                .find(|e| self.endpoint_names.contains(&e.name))
            {
                return Err(ConfigError::DuplicateEndPointName(dupe.name.clone()));
            }
        }

        for perimeter in perimeters {
            self.endpoint_names
                .extend(perimeter.endpoints().iter().map(|e| e.name.clone()));
            tracing::info!(
                api = %perimeter.name(),
                endpoints = perimeter.len(),
                "registered perimeter"
            );

            let perimeter = Arc::new(perimeter);
            self.perimeters_by_api
                .insert(perimeter.name().to_string(), perimeter.clone());
            self.perimeters.push(perimeter);
        }

        Ok(self)
    }

    /// Bind service `S` to the perimeter `api_name` and register the factory
    /// that builds `S` clients for endpoints of `endpoint_type`/`provider_name`.
    ///
    /// A service may be registered under several endpoint types, but always
    /// against the same perimeter.
    pub fn register_service<S, F>(
        &mut self,
        endpoint_type: &str,
        api_name: &str,
        provider_name: &str,
        factory: F,
    ) -> Result<&mut Self, ConfigError>
    where
        S: ?Sized + 'static,
        F: Fn(&EndPointConfiguration) -> Arc<S> + Send + Sync + 'static,
    {
        if endpoint_type.is_empty() {
            return Err(ConfigError::BlankEndPointType);
        }

        self.bind_perimeter::<S>(api_name)?;
        self.registry
            .register::<S, F>(EndPointKey::new(endpoint_type, provider_name), factory);
        Ok(self)
    }

    /// Register the liveness check for an endpoint type and provider.
    pub fn register_validator(
        &mut self,
        endpoint_type: &str,
        provider_name: &str,
        validator: Arc<dyn EndPointValidator>,
    ) -> Result<&mut Self, ConfigError> {
        if endpoint_type.is_empty() {
            return Err(ConfigError::BlankEndPointType);
        }

        self.validators
            .insert(EndPointKey::new(endpoint_type, provider_name), validator);
        Ok(self)
    }

    /// Register the consumer of "attempt failed" messages.
    pub fn register_logger<F>(&mut self, sink: F) -> &mut Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.sink = Arc::new(sink);
        self
    }

    /// Replace the default DashMap-backed endpoint cache.
    pub fn register_endpoint_cache(&mut self, cache: Arc<dyn EndPointCache>) -> &mut Self {
        self.cache = Some(cache);
        self
    }

    /// Apply a module's registrations.
    pub fn register_module<M>(&mut self, module: &M) -> Result<&mut Self, ConfigError>
    where
        M: AdaptiveClientModule + ?Sized,
    {
        module.register(self)?;
        Ok(self)
    }

    /// Freeze the registrations.
    pub fn build(self) -> Arc<AdaptiveClientRuntime> {
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(DashMapEndPointCache::new()));

        tracing::info!(
            perimeters = self.perimeters.len(),
            services = self.bindings.len(),
            validators = self.validators.len(),
            clients = self.registry.len(),
            "adaptive client runtime ready"
        );

        let evaluator = ClientEvaluator::new(self.validators, cache.clone(), self.sink);
        Arc::new(AdaptiveClientRuntime::new(
            self.perimeters,
            self.bindings,
            evaluator,
            self.registry,
            cache,
        ))
    }

    fn bind_perimeter<S: ?Sized + 'static>(&mut self, api_name: &str) -> Result<(), ConfigError> {
        let perimeter = self
            .perimeters_by_api
            .get(api_name)
            .cloned()
            .ok_or_else(|| ConfigError::PerimeterNotFound(api_name.to_string()))?;
        let service = ServiceKey::of::<S>();

        match self.bindings.get(&service) {
            Some(existing) if existing.name() != perimeter.name() => {
                Err(ConfigError::ConflictingPerimeterBinding {
                    service: service.to_string(),
                    existing: existing.name().to_string(),
                    requested: perimeter.name().to_string(),
                })
            }
            Some(_) => Ok(()),
            None => {
                self.bindings.insert(service, perimeter);
                Ok(())
            }
        }
    }
}

impl Default for RegistrationHelper {
    fn default() -> Self {
        Self::new()
    }
}
