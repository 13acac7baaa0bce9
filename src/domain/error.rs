//! Resolution errors.

use crate::domain::value_objects::EndPointKey;

/// Configuration errors.
///
/// Raised either at startup registration or when a call needs a table entry
/// that was never registered. None of them are retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("one or more endpoint configurations has a blank name; a name is required for every endpoint")]
    BlankEndPointName,
    #[error("endpoint configuration {0:?} has a blank API_Name")]
    BlankApiName(String),
    #[error("duplicate endpoint configuration {0:?}; names must be unique across all APIs (set is_active to false to bypass an entry)")]
    DuplicateEndPointName(String),
    #[error("endpoints for API {0:?} were already registered")]
    DuplicatePerimeter(String),
    #[error("no perimeter named {0:?}; register its endpoints before binding services to it")]
    PerimeterNotFound(String),
    #[error("endpoint type is required")]
    BlankEndPointType,
    #[error("service {service} is already bound to perimeter {existing:?}, cannot bind it to {requested:?}")]
    ConflictingPerimeterBinding {
        service: String,
        existing: String,
        requested: String,
    },
    #[error("no perimeter is bound to service {0}")]
    NoPerimeterBound(String),
    #[error("no client registered for service {service} with endpoint type {key}")]
    NoClientRegistered { service: String, key: EndPointKey },
    #[error("no validator registered for endpoint type {0}")]
    NoValidatorRegistered(EndPointKey),
}

/// Errors surfaced by endpoint resolution.
///
/// Failures raised by the caller's own operation never pass through this
/// type; they reach the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdaptiveClientError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
    #[error("endpoint {name:?} is not a member of perimeter {perimeter:?}")]
    UnknownEndPoint { name: String, perimeter: String },
    #[error("unable to reach any endpoint for service {service}; attempted: {}", .attempted.join(", "))]
    ConnectivityExhausted {
        service: String,
        attempted: Vec<String>,
    },
}
