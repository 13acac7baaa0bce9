//! Network EndPoint Validators
//!
//! Stock validators that delegate liveness checks to NetworkUtilities.

use crate::domain::ports::{EndPointValidator, NetworkUtilities};
use async_trait::async_trait;
use std::sync::Arc;

/// Validates endpoints whose connection string names a database server.
///
/// Typically registered for in-process clients that talk to a database
/// directly (`InProcess` + `MSSQL`, `InProcess` + `MySQL`, ...).
pub struct DbServerValidator {
    network: Arc<dyn NetworkUtilities>,
}

impl DbServerValidator {
    pub fn new(network: Arc<dyn NetworkUtilities>) -> Self {
        Self { network }
    }
}

#[async_trait]
impl EndPointValidator for DbServerValidator {
    async fn validate(&self, connection_string: &str) -> bool {
        self.network
            .verify_db_server_connectivity(connection_string)
            .await
    }
}

/// Validates endpoints whose connection string is an HTTP base address.
pub struct HttpServerValidator {
    network: Arc<dyn NetworkUtilities>,
}

impl HttpServerValidator {
    pub fn new(network: Arc<dyn NetworkUtilities>) -> Self {
        Self { network }
    }
}

#[async_trait]
impl EndPointValidator for HttpServerValidator {
    async fn validate(&self, connection_string: &str) -> bool {
        self.network
            .verify_http_server_availability(connection_string)
            .await
    }
}
