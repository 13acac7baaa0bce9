//! Client Registry
//!
//! Maps (service interface, endpoint type, provider) to a client factory.

use crate::domain::entities::EndPointConfiguration;
use crate::domain::error::ConfigError;
use crate::domain::value_objects::{EndPointKey, ServiceKey};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Builds a client for service `S` bound to a resolved endpoint.
pub type ClientFactoryFn<S> = Arc<dyn Fn(&EndPointConfiguration) -> Arc<S> + Send + Sync>;

/// Registry of client factories.
///
/// Factories for different service interfaces have different types, so they
/// are stored type-erased and recovered by downcasting with the service type
/// used at lookup.
#[derive(Default)]
pub struct ClientRegistry {
    factories: HashMap<(ServiceKey, EndPointKey), Box<dyn Any + Send + Sync>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the factory for service `S` under an endpoint key.
    ///
    /// Replaces any factory previously registered for the same pair.
    pub fn register<S, F>(&mut self, key: EndPointKey, factory: F)
    where
        S: ?Sized + 'static,
        F: Fn(&EndPointConfiguration) -> Arc<S> + Send + Sync + 'static,
    {
        let factory: ClientFactoryFn<S> = Arc::new(factory);
        self.factories
            .insert((ServiceKey::of::<S>(), key), Box::new(factory));
    }

    /// Build a client for service `S` against `endpoint`.
    pub fn resolve<S>(&self, endpoint: &EndPointConfiguration) -> Result<Arc<S>, ConfigError>
    where
        S: ?Sized + 'static,
    {
        let service = ServiceKey::of::<S>();
        let key = endpoint.key();

        match self
            .factories
            .get(&(service, key.clone()))
            .and_then(|f| f.downcast_ref::<ClientFactoryFn<S>>())
        {
            Some(factory) => Ok(factory(endpoint)),
            None => Err(ConfigError::NoClientRegistered {
                service: service.to_string(),
                key,
            }),
        }
    }

    /// Whether a factory exists for service `S` and `key`.
    pub fn contains<S: ?Sized + 'static>(&self, key: &EndPointKey) -> bool {
        self.factories
            .contains_key(&(ServiceKey::of::<S>(), key.clone()))
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
