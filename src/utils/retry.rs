//! Retry policy
//!
//! The backoff itself is done by the SDK's standard retry strategy; this
//! module only decides how that strategy is configured. A [`RetryPolicy`] is
//! installed as the only retry strategy of a client configuration.

use std::time::Duration;

use aws_smithy_types::retry::{RetryConfig, RetryMode};

/// Maximum attempts (initial attempt included) used for EKS tooling.
///
/// Cluster operations poll CloudFormation and EKS heavily and are frequently
/// throttled, so this is well above the SDK default of 3.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 13;

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the initial one
    pub max_attempts: u32,

    /// Base delay of the exponential backoff
    pub initial_backoff: Duration,

    /// Maximum delay between attempts (caps exponential growth)
    pub max_backoff: Duration,

    /// Use the adaptive (client-side rate limiting) mode instead of standard
    pub adaptive: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(20),
            adaptive: false,
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum attempts (initial attempt included)
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set initial backoff
    pub fn with_initial_backoff(mut self, delay: Duration) -> Self {
        self.initial_backoff = delay;
        self
    }

    /// Set maximum backoff
    pub fn with_max_backoff(mut self, delay: Duration) -> Self {
        self.max_backoff = delay;
        self
    }

    /// Enable or disable adaptive retry mode
    pub fn with_adaptive(mut self, adaptive: bool) -> Self {
        self.adaptive = adaptive;
        self
    }

    /// SDK retry configuration for this policy
    pub fn to_retry_config(&self) -> RetryConfig {
        if self.max_attempts <= 1 {
            return RetryConfig::disabled();
        }

        let config = if self.adaptive {
            RetryConfig::adaptive()
        } else {
            RetryConfig::standard()
        };

        config
            .with_max_attempts(self.max_attempts)
            .with_initial_backoff(self.initial_backoff)
            .with_max_backoff(self.max_backoff)
    }
}

impl From<&RetryPolicy> for RetryConfig {
    fn from(policy: &RetryPolicy) -> Self {
        policy.to_retry_config()
    }
}

/// Retry policy presets
pub mod presets {
    use super::*;

    /// Policy used for EKS tooling
    pub fn eks() -> RetryPolicy {
        RetryPolicy::default()
    }

    /// Single attempt, no retries
    pub fn no_retry() -> RetryPolicy {
        RetryPolicy::new().with_max_attempts(1)
    }
}
