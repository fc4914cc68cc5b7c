//! AWS client configuration for EKS tooling

// Public modules
pub mod config;
pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod utils;

// Re-export commonly used types
pub use config::{ClientConfigBuilder, ClientConfiguration, ProviderConfig};
pub use endpoint::{EndpointOverrideResolver, ServiceId};
pub use error::ConfigError;

/// Version reported in the user agent of every AWS request
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
