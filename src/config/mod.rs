//! Configuration management module
//!
//! Provider settings come from environment variables and .env files; the
//! AWS client configuration is built from them once per session.

pub mod aws;
pub mod settings;

pub use aws::{build_client_config, ClientConfigBuilder, ClientConfiguration};
pub use settings::ProviderConfig;
