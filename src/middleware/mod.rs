//! Middleware module
//!
//! Interceptors installed on every AWS service client.

pub mod user_agent;

pub use user_agent::{UserAgentTag, TOOL_NAME};
