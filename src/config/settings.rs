//! Provider settings
//!
//! Region, profile and verbosity, loaded from environment variables with
//! sensible defaults. Command-line flags override them in the binary.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

use crate::error::ConfigError;
use crate::logging::DEFAULT_VERBOSITY;

/// Which account, region and verbosity AWS clients are built for
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Target region; empty means the SDK's default region chain
    pub region: String,

    /// Named credential profile; empty means the SDK's default selection
    pub profile: String,

    /// Logging verbosity, 0 (silent) to 5 (AWS request/response debugging)
    pub verbose: u8,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            region: String::new(),
            profile: String::new(),
            verbose: DEFAULT_VERBOSITY,
        }
    }
}

impl ProviderConfig {
    /// Load settings from environment variables with defaults
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let settings = Self {
            region: env::var("AWS_REGION")
                .or_else(|_| env::var("AWS_DEFAULT_REGION"))
                .unwrap_or_default(),
            profile: env::var("AWS_PROFILE").unwrap_or_default(),
            verbose: env_or_default("EKSCTL_VERBOSE", &DEFAULT_VERBOSITY.to_string())
                .parse()
                .map_err(|e: std::num::ParseIntError| {
                    ConfigError::invalid_setting("EKSCTL_VERBOSE", e.to_string())
                })?,
        };

        settings.validate()?;

        Ok(settings)
    }

    /// Validate settings
    fn validate(&self) -> Result<(), ConfigError> {
        if self.region.chars().any(char::is_whitespace) {
            return Err(ConfigError::invalid_setting(
                "region",
                format!("cannot contain whitespace: {:?}", self.region),
            ));
        }
        if self.profile.chars().any(char::is_whitespace) {
            return Err(ConfigError::invalid_setting(
                "profile",
                format!("cannot contain whitespace: {:?}", self.profile),
            ));
        }
        Ok(())
    }

    /// Set the region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set the profile
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set the verbosity
    pub fn with_verbose(mut self, verbose: u8) -> Self {
        self.verbose = verbose;
        self
    }

    /// Profile name to display
    pub fn profile_name(&self) -> &str {
        if self.profile.is_empty() {
            "default"
        } else {
            &self.profile
        }
    }
}

/// Helper function to get environment variable with default
fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
