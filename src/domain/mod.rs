//! Domain Layer
//!
//! Endpoint model, resolution errors, ports and the selection algorithm.
//! Nothing here knows about concrete transports.

pub mod entities;
pub mod error;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{build_perimeters, EndPointConfiguration, Perimeter};
pub use error::{AdaptiveClientError, ConfigError};
pub use value_objects::{EndPointKey, EndPointType, ProviderName, ServiceKey};
