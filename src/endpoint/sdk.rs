//! SDK endpoint resolver adapter
//!
//! Every service crate defines its own `config::endpoint::ResolveEndpoint`
//! trait. [`OverrideEndpointResolver`] implements it for each supported
//! service: an override from [`EndpointOverrideResolver`] wins, and
//! [`EndpointNotFound`](super::EndpointNotFound) falls through to the service's
//! generated default resolver.

use std::sync::Arc;

use aws_smithy_types::endpoint::Endpoint;

use super::resolver::EndpointOverrideResolver;
use super::service::ServiceId;

/// Endpoint resolver installed on every service client
#[derive(Debug)]
pub struct OverrideEndpointResolver<D> {
    service: ServiceId,
    overrides: Arc<EndpointOverrideResolver>,
    fallback: D,
}

impl<D> OverrideEndpointResolver<D> {
    pub fn new(service: ServiceId, overrides: Arc<EndpointOverrideResolver>, fallback: D) -> Self {
        Self {
            service,
            overrides,
            fallback,
        }
    }

    pub fn service(&self) -> ServiceId {
        self.service
    }

    /// Override endpoint for this call, if one is configured
    fn override_for(&self, region: Option<&str>) -> Option<Endpoint> {
        self.overrides
            .resolve(self.service.as_str(), region.unwrap_or_default())
            .ok()
            .map(|resolved| resolved.into_endpoint(self.service.signing_name()))
    }
}

macro_rules! impl_resolve_endpoint {
    ($($sdk:ident),+ $(,)?) => {
        $(
            impl $sdk::config::endpoint::ResolveEndpoint
                for OverrideEndpointResolver<$sdk::config::endpoint::DefaultResolver>
            {
                fn resolve_endpoint<'a>(
                    &'a self,
                    params: &'a $sdk::config::endpoint::Params,
                ) -> $sdk::config::endpoint::EndpointFuture<'a> {
                    match self.override_for(params.region()) {
                        Some(endpoint) => $sdk::config::endpoint::EndpointFuture::ready(Ok(endpoint)),
                        None => <$sdk::config::endpoint::DefaultResolver as $sdk::config::endpoint::ResolveEndpoint>::resolve_endpoint(
                            &self.fallback,
                            params,
                        ),
                    }
                }
            }
        )+
    };
}

impl_resolve_endpoint!(
    aws_sdk_cloudformation,
    aws_sdk_cloudtrail,
    aws_sdk_ec2,
    aws_sdk_eks,
    aws_sdk_elasticloadbalancing,
    aws_sdk_elasticloadbalancingv2,
    aws_sdk_iam,
    aws_sdk_sts,
);
