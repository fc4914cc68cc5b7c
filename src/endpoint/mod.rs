//! Per-service endpoint overrides
//!
//! `AWS_<SERVICE>_ENDPOINT` redirects the calls of one service without
//! touching the others.

pub mod env;
pub mod resolver;
pub mod sdk;
pub mod service;

pub use env::{EnvLookup, ProcessEnv, StaticEnv};
pub use resolver::{EndpointNotFound, EndpointOverrideResolver, ResolvedEndpoint};
pub use sdk::OverrideEndpointResolver;
pub use service::{ServiceId, UnknownService};
