mod dashmap_endpoint_cache;
mod network_validators;
mod tcp_network_utilities;

pub use dashmap_endpoint_cache::DashMapEndPointCache;
pub use network_validators::{DbServerValidator, HttpServerValidator};
pub use tcp_network_utilities::{db_server_address, ProbeConfig, TcpNetworkUtilities};
