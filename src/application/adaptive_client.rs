//! Adaptive Client
//!
//! Caller-facing facade: resolves a live endpoint for a service, builds the
//! client and runs the caller's operation against it.

use crate::application::runtime::AdaptiveClientRuntime;
use crate::domain::entities::EndPointConfiguration;
use crate::domain::error::AdaptiveClientError;
use crate::domain::value_objects::ServiceKey;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// Per-scope record of the endpoint most recently resolved.
///
/// Only the owning scope writes it. It is set as soon as evaluation picks an
/// endpoint, before the client is built; a failed evaluation leaves it
/// unchanged.
#[derive(Debug, Clone, Default)]
pub struct EndPointContext {
    current: Option<Arc<EndPointConfiguration>>,
}

impl EndPointContext {
    pub fn current_endpoint(&self) -> Option<&EndPointConfiguration> {
        self.current.as_deref()
    }

    pub(crate) fn set(&mut self, endpoint: Arc<EndPointConfiguration>) {
        self.current = Some(endpoint);
    }
}

/// Client scope for service `S`.
///
/// Obtain one with [`AdaptiveClientRuntime::client`]. Scopes are cheap; open
/// one per unit of work. All scopes of a runtime share its endpoint cache.
///
/// # Example
/// ```ignore
/// let mut client = runtime.client::<dyn OrdersService>();
/// let order = client
///     .call(|orders| async move { orders.get_order(42).await })
///     .await?;
/// println!("served by {:?}", client.current_endpoint().map(|e| &e.name));
/// ```
pub struct AdaptiveClient<S: ?Sized + 'static> {
    runtime: Arc<AdaptiveClientRuntime>,
    context: EndPointContext,
    _service: PhantomData<fn() -> Arc<S>>,
}

impl<S: ?Sized + 'static> AdaptiveClient<S> {
    pub(crate) fn new(runtime: Arc<AdaptiveClientRuntime>) -> Self {
        Self {
            runtime,
            context: EndPointContext::default(),
            _service: PhantomData,
        }
    }

    /// Run `op` against a client bound to a live endpoint.
    ///
    /// The endpoint comes from the cache if present, otherwise from probing
    /// the perimeter in order. Errors from `op` are returned unchanged and
    /// do not trigger failover.
    pub async fn call<T, E, F, Fut>(&mut self, op: F) -> Result<T, E>
    where
        F: FnOnce(Arc<S>) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<AdaptiveClientError>,
    {
        let client = self.resolve(None).await?;
        op(client).await
    }

    /// Run `op` against the named endpoint only.
    ///
    /// The cache is bypassed for lookup but updated on success. If the
    /// endpoint is down no other member is tried.
    pub async fn call_on<T, E, F, Fut>(&mut self, endpoint_name: &str, op: F) -> Result<T, E>
    where
        F: FnOnce(Arc<S>) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<AdaptiveClientError>,
    {
        let client = self.resolve(Some(endpoint_name)).await?;
        op(client).await
    }

    /// Resolve a client without running an operation.
    pub async fn try_resolve(&mut self) -> Result<Arc<S>, AdaptiveClientError> {
        self.resolve(None).await
    }

    /// Endpoint chosen by the most recent successful evaluation in this scope.
    pub fn current_endpoint(&self) -> Option<&EndPointConfiguration> {
        self.context.current_endpoint()
    }

    pub fn context(&self) -> &EndPointContext {
        &self.context
    }

    async fn resolve(&mut self, endpoint_name: Option<&str>) -> Result<Arc<S>, AdaptiveClientError> {
        let service = ServiceKey::of::<S>();
        let perimeter = self.runtime.perimeter_for(&service)?;

        let endpoint = self
            .runtime
            .evaluator()
            .evaluate(perimeter, &service, endpoint_name)
            .await?;
        self.context.set(endpoint.clone());

        Ok(self.runtime.registry().resolve::<S>(&endpoint)?)
    }
}

/// Builds `S` clients for a named endpoint without probing it.
///
/// For callers that manage their own endpoint choice. The cache and any
/// scope context are left untouched.
pub struct ClientFactory<S: ?Sized + 'static> {
    runtime: Arc<AdaptiveClientRuntime>,
    _service: PhantomData<fn() -> Arc<S>>,
}

impl<S: ?Sized + 'static> ClientFactory<S> {
    pub(crate) fn new(runtime: Arc<AdaptiveClientRuntime>) -> Self {
        Self {
            runtime,
            _service: PhantomData,
        }
    }

    pub fn create(&self, endpoint_name: &str) -> Result<Arc<S>, AdaptiveClientError> {
        let perimeter = self.runtime.perimeter_for(&ServiceKey::of::<S>())?;
        let endpoint = perimeter
            .find(endpoint_name)
            .ok_or_else(|| AdaptiveClientError::UnknownEndPoint {
                name: endpoint_name.to_string(),
                perimeter: perimeter.name().to_string(),
            })?;

        Ok(self.runtime.registry().resolve::<S>(endpoint)?)
    }
}
