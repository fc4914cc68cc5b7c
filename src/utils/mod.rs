//! Utility modules

pub mod retry;

pub use retry::{presets as retry_presets, RetryPolicy, DEFAULT_MAX_ATTEMPTS};
