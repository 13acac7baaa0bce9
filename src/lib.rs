//! Adaptive Client Library
//!
//! Resolves a live endpoint for a service interface from an ordered set of
//! candidates, fails over in order, and remembers the last good choice.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;

// Re-export commonly used types
pub use adapters::outbound::{
    DashMapEndPointCache, DbServerValidator, HttpServerValidator, ProbeConfig,
    TcpNetworkUtilities,
};
pub use application::{
    AdaptiveClient, AdaptiveClientModule, AdaptiveClientRuntime, ClientFactory, EndPointContext,
    RegistrationHelper,
};
pub use config::{load_config, load_endpoints};
pub use domain::entities::{build_perimeters, EndPointConfiguration, Perimeter};
pub use domain::error::{AdaptiveClientError, ConfigError};
pub use domain::ports::{EndPointCache, EndPointValidator, NetworkUtilities};
pub use domain::services::{discard_sink, ClientEvaluator, DiagnosticSink};
pub use domain::value_objects::{EndPointKey, EndPointType, ProviderName, ServiceKey};
