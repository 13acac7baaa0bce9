//! Network Utilities Port
//!
//! Low-level reachability primitives used by the stock validators.

use async_trait::async_trait;

/// Reachability checks against database and HTTP servers.
///
/// This is an outbound port so tests can substitute the network entirely.
#[async_trait]
pub trait NetworkUtilities: Send + Sync {
    /// Check that the database server named in a connection string accepts connections.
    async fn verify_db_server_connectivity(&self, connection_string: &str) -> bool;

    /// Check that an HTTP server answers at `url`.
    async fn verify_http_server_availability(&self, url: &str) -> bool;
}
