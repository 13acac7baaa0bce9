//! Application Layer
//!
//! Registration, the frozen runtime built from it, and the caller-facing
//! client scopes.

pub mod adaptive_client;
pub mod client_registry;
pub mod registration;
pub mod runtime;

pub use adaptive_client::{AdaptiveClient, ClientFactory, EndPointContext};
pub use client_registry::{ClientFactoryFn, ClientRegistry};
pub use registration::{AdaptiveClientModule, RegistrationHelper};
pub use runtime::AdaptiveClientRuntime;
