//! Value Objects - Immutable lookup keys
//!
//! Value objects are identified by their value rather than identity.
//! They key every registration table in the crate.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Stable identity token for a service interface.
///
/// Built from the `TypeId` of the interface type, usually a trait object
/// such as `dyn OrdersService`. The type name is kept for diagnostics only
/// and does not take part in equality.
#[derive(Debug, Clone, Copy)]
pub struct ServiceKey {
    type_id: TypeId,
    type_name: &'static str,
}

impl ServiceKey {
    /// Identity token for the service interface `S`.
    pub fn of<S: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<S>(),
            type_name: std::any::type_name::<S>(),
        }
    }

    /// Human readable name of the interface.
    pub fn name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for ServiceKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ServiceKey {}

impl Hash for ServiceKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

/// Composite `(endpoint type, provider)` key.
///
/// Validators and client factories are both looked up by this key. The
/// provider is optional and normalizes to an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndPointKey {
    endpoint_type: String,
    provider_name: String,
}

impl EndPointKey {
    pub fn new(endpoint_type: impl Into<String>, provider_name: impl Into<String>) -> Self {
        Self {
            endpoint_type: endpoint_type.into(),
            provider_name: provider_name.into(),
        }
    }

    pub fn endpoint_type(&self) -> &str {
        &self.endpoint_type
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }
}

impl fmt::Display for EndPointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.provider_name.is_empty() {
            write!(f, "{}", self.endpoint_type)
        } else {
            write!(f, "{}/{}", self.endpoint_type, self.provider_name)
        }
    }
}

/// Well-known endpoint types.
///
/// Endpoint types are free-form strings; these are the ones the stock
/// validators are normally registered under.
pub struct EndPointType;

impl EndPointType {
    pub const IN_PROCESS: &'static str = "InProcess";
    pub const WEB_API: &'static str = "WebAPI";
    pub const WCF: &'static str = "WCF";
    pub const ESB: &'static str = "ESB";
}

/// Well-known provider names.
pub struct ProviderName;

impl ProviderName {
    pub const MSSQL: &'static str = "MSSQL";
    pub const MYSQL: &'static str = "MySQL";
    pub const SQLITE: &'static str = "SQLite";
    pub const POSTGRESQL: &'static str = "PostgreSQL";
}
