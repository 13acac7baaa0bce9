//! Client Evaluator Service
//!
//! Selects a live endpoint from a perimeter. Depends only on domain ports:
//! validators answer liveness, the cache remembers the last good choice.

use crate::domain::entities::{EndPointConfiguration, Perimeter};
use crate::domain::error::{AdaptiveClientError, ConfigError};
use crate::domain::ports::{EndPointCache, EndPointValidator};
use crate::domain::value_objects::{EndPointKey, ServiceKey};
use std::collections::HashMap;
use std::sync::Arc;

/// Consumer of "attempt failed" messages.
pub type DiagnosticSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Sink that discards every message.
pub fn discard_sink() -> DiagnosticSink {
    Arc::new(|_: &str| {})
}

/// Endpoint selection algorithm.
///
/// Resolution order:
/// 1. An explicit endpoint name probes exactly that endpoint, with no fallback
/// 2. Otherwise a cached endpoint for the service is returned without probing
/// 3. Otherwise members are probed in ordinal order and the first live one wins
///
/// Every successful probe overwrites the cache entry for the service.
pub struct ClientEvaluator {
    validators: HashMap<EndPointKey, Arc<dyn EndPointValidator>>,
    cache: Arc<dyn EndPointCache>,
    sink: DiagnosticSink,
}

impl ClientEvaluator {
    pub fn new(
        validators: HashMap<EndPointKey, Arc<dyn EndPointValidator>>,
        cache: Arc<dyn EndPointCache>,
        sink: DiagnosticSink,
    ) -> Self {
        Self {
            validators,
            cache,
            sink,
        }
    }

    /// Resolve a validated endpoint for `service` from `perimeter`.
    ///
    /// # Errors
    /// - `UnknownEndPoint` if `endpoint_name` is not a member (nothing is probed)
    /// - `Configuration(NoValidatorRegistered)` if a candidate has no validator
    /// - `ConnectivityExhausted` if every probed candidate failed
    pub async fn evaluate(
        &self,
        perimeter: &Perimeter,
        service: &ServiceKey,
        endpoint_name: Option<&str>,
    ) -> Result<Arc<EndPointConfiguration>, AdaptiveClientError> {
        if let Some(name) = endpoint_name {
            let endpoint = perimeter.find(name).ok_or_else(|| {
                AdaptiveClientError::UnknownEndPoint {
                    name: name.to_string(),
                    perimeter: perimeter.name().to_string(),
                }
            })?;
            return self
                .first_live(std::slice::from_ref(endpoint), service)
                .await;
        }

        if let Some(cached) = self.cache.get(service) {
            tracing::debug!(
                service = %service,
                endpoint = %cached.name,
                "using cached endpoint"
            );
            return Ok(cached);
        }

        self.first_live(perimeter.endpoints(), service).await
    }

    /// Probe candidates in order and cache the first live one.
    async fn first_live(
        &self,
        candidates: &[Arc<EndPointConfiguration>],
        service: &ServiceKey,
    ) -> Result<Arc<EndPointConfiguration>, AdaptiveClientError> {
        let mut attempted = Vec::with_capacity(candidates.len());

        for endpoint in candidates {
            let validator = self.validator_for(endpoint)?;

            // The cache is not touched while the probe is in flight
            if validator.validate(&endpoint.connection_string).await {
                self.cache.set(*service, endpoint.clone());
                tracing::debug!(
                    service = %service,
                    endpoint = %endpoint.name,
                    "selected endpoint"
                );
                return Ok(endpoint.clone());
            }

            self.report_failure(endpoint, service);
            attempted.push(endpoint.name.clone());
        }

        Err(AdaptiveClientError::ConnectivityExhausted {
            service: service.to_string(),
            attempted,
        })
    }

    fn validator_for(
        &self,
        endpoint: &EndPointConfiguration,
    ) -> Result<&Arc<dyn EndPointValidator>, ConfigError> {
        let key = endpoint.key();
        self.validators
            .get(&key)
            .ok_or(ConfigError::NoValidatorRegistered(key))
    }

    fn report_failure(&self, endpoint: &EndPointConfiguration, service: &ServiceKey) {
        tracing::warn!(
            service = %service,
            endpoint = %endpoint.name,
            "endpoint failed liveness check"
        );
        (self.sink)(&format!(
            "Failed to connect to EndPoint named {} when resolving a client of type {}.",
            endpoint.name, service
        ));
    }
}
