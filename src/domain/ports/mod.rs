mod endpoint_cache;
mod endpoint_validator;
mod network_utilities;

pub use endpoint_cache::EndPointCache;
pub use endpoint_validator::EndPointValidator;
pub use network_utilities::NetworkUtilities;
