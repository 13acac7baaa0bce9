//! EndPoint Validator Port
//!
//! Defines the liveness check used before an endpoint is handed out.

use async_trait::async_trait;

/// Liveness check for one kind of endpoint.
///
/// Validators are registered per `(endpoint type, provider)` key. A probe may
/// block on I/O; bounding it with a timeout is the validator's job, the
/// resolution engine waits for as long as the probe takes.
#[async_trait]
pub trait EndPointValidator: Send + Sync {
    /// Return true if the endpoint at `connection_string` can serve requests now.
    async fn validate(&self, connection_string: &str) -> bool;
}
