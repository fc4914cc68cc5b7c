//! Error types

use thiserror::Error;

/// Errors building a client configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The shared config/credentials chain could not be loaded
    #[error("Failed to load AWS configuration: {0}")]
    Load(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    /// A setting had an unusable value
    #[error("Invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}

impl ConfigError {
    pub fn load(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        ConfigError::Load(err.into())
    }

    pub fn invalid_setting(name: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidSetting {
            name,
            reason: reason.into(),
        }
    }
}

/// Errors reading an MFA token code
#[derive(Error, Debug)]
pub enum TokenError {
    /// Input ended before a token code was entered
    #[error("MFA token input closed before a code was entered")]
    Closed,

    #[error("Failed to read MFA token code: {0}")]
    Io(#[from] std::io::Error),
}
