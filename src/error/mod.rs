//! Error handling

pub mod types;

pub use crate::endpoint::EndpointNotFound;
pub use types::{ConfigError, TokenError};
