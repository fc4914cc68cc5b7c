//! Endpoint override resolver
//!
//! Lets operators redirect the calls for a single service (to a local test
//! double, an air-gapped mirror, ...) by setting `AWS_<SERVICE>_ENDPOINT`.
//! The table of services is fixed when the resolver is built; the variable
//! itself is read on every call, so changing it takes effect without
//! rebuilding the client configuration.

use std::collections::HashMap;
use std::sync::Arc;

use aws_smithy_types::endpoint::Endpoint;
use aws_smithy_types::Document;

use super::env::{EnvLookup, ProcessEnv};
use super::service::ServiceId;

/// An endpoint override for one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    /// Endpoint URL, passed through exactly as configured
    pub url: String,
    /// Region the request is signed for
    pub signing_region: String,
}

impl ResolvedEndpoint {
    /// Convert into an SDK endpoint carrying a SigV4 auth scheme
    pub fn into_endpoint(self, signing_name: &str) -> Endpoint {
        let mut auth_scheme = HashMap::<String, Document>::new();
        auth_scheme.insert("name".to_string(), "sigv4".to_string().into());
        auth_scheme.insert("signingName".to_string(), signing_name.to_string().into());
        auth_scheme.insert("signingRegion".to_string(), self.signing_region.into());

        Endpoint::builder()
            .url(self.url)
            .property("authSchemes", vec![Document::from(auth_scheme)])
            .build()
    }
}

/// No override applies; use the SDK's default endpoint resolution
///
/// This is the expected outcome for most calls and is not a failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("No endpoint override for service '{service}' in region '{region}'")]
pub struct EndpointNotFound {
    pub service: String,
    pub region: String,
}

/// Resolves per-service endpoint overrides from the environment
#[derive(Debug)]
pub struct EndpointOverrideResolver {
    /// service identifier -> environment variable name
    table: HashMap<&'static str, &'static str>,
    env: Arc<dyn EnvLookup>,
}

impl EndpointOverrideResolver {
    /// Build a resolver over the given environment
    ///
    /// Any override already set is logged at debug level. That log reflects
    /// the environment at construction time only: resolution re-reads the
    /// variables on every call, so the log goes stale if they change later.
    pub fn new(env: Arc<dyn EnvLookup>) -> Self {
        let table = ServiceId::ALL
            .iter()
            .map(|service| (service.as_str(), service.env_var()))
            .collect();

        let resolver = Self { table, env };
        for (service, endpoint) in resolver.active_overrides() {
            tracing::debug!(
                service = %service,
                endpoint = %endpoint,
                "Setting {} endpoint to {}",
                service,
                endpoint
            );
        }
        resolver
    }

    /// Build a resolver over the process environment
    pub fn from_process_env() -> Self {
        Self::new(Arc::new(ProcessEnv))
    }

    /// Resolve the endpoint for `service` in `region`
    ///
    /// Returns [`EndpointNotFound`] when the service is not supported or its
    /// override variable is unset.
    pub fn resolve(&self, service: &str, region: &str) -> Result<ResolvedEndpoint, EndpointNotFound> {
        self.table
            .get(service)
            .and_then(|env_name| self.env.get(env_name))
            .map(|url| ResolvedEndpoint {
                url,
                signing_region: region.to_string(),
            })
            .ok_or_else(|| EndpointNotFound {
                service: service.to_string(),
                region: region.to_string(),
            })
    }

    /// Overrides currently present in the environment, in [`ServiceId::ALL`] order
    pub fn active_overrides(&self) -> Vec<(ServiceId, String)> {
        ServiceId::ALL
            .iter()
            .filter_map(|service| {
                self.env
                    .get(service.env_var())
                    .map(|endpoint| (*service, endpoint))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::env::StaticEnv;
    use std::thread;

    fn resolver_with(env: StaticEnv) -> (Arc<StaticEnv>, EndpointOverrideResolver) {
        let env = Arc::new(env);
        let resolver = EndpointOverrideResolver::new(env.clone());
        (env, resolver)
    }

    #[test]
    fn test_known_services_without_override_are_not_found() {
        let (_, resolver) = resolver_with(StaticEnv::new());
        for service in ServiceId::ALL {
            let err = resolver.resolve(service.as_str(), "us-west-2").unwrap_err();
            assert_eq!(err.service, service.as_str());
            assert_eq!(err.region, "us-west-2");
        }
    }

    #[test]
    fn test_known_services_with_override_resolve_to_value() {
        let env = StaticEnv::from_pairs(
            ServiceId::ALL
                .iter()
                .map(|s| (s.env_var(), format!("http://{}.local:4566", s.signing_name()))),
        );
        let (_, resolver) = resolver_with(env);

        for service in ServiceId::ALL {
            let resolved = resolver.resolve(service.as_str(), "eu-central-1").unwrap();
            assert_eq!(resolved.url, format!("http://{}.local:4566", service.signing_name()));
            assert_eq!(resolved.signing_region, "eu-central-1");
        }
    }

    #[test]
    fn test_unknown_service_is_never_overridden() {
        let env = StaticEnv::from_pairs(
            ServiceId::ALL.iter().map(|s| (s.env_var(), "http://localhost:1234")),
        );
        env.set("AWS_FOO-SERVICE_ENDPOINT", "http://localhost:1234");
        let (_, resolver) = resolver_with(env);

        assert!(resolver.resolve("foo-service", "us-west-2").is_err());
        // identifiers are case sensitive
        assert!(resolver.resolve("eks", "us-west-2").is_err());
    }

    #[test]
    fn test_eks_example() {
        let (env, resolver) = resolver_with(StaticEnv::new());
        assert_eq!(
            resolver.resolve("EKS", "us-west-2"),
            Err(EndpointNotFound {
                service: "EKS".to_string(),
                region: "us-west-2".to_string(),
            })
        );

        env.set("AWS_EKS_ENDPOINT", "http://localhost:9999");
        assert_eq!(
            resolver.resolve("EKS", "us-west-2"),
            Ok(ResolvedEndpoint {
                url: "http://localhost:9999".to_string(),
                signing_region: "us-west-2".to_string(),
            })
        );
    }

    #[test]
    fn test_resolution_reads_environment_at_call_time() {
        let (env, resolver) = resolver_with(StaticEnv::from_pairs([(
            "AWS_STS_ENDPOINT",
            "http://sts.before",
        )]));
        assert_eq!(resolver.resolve("STS", "us-east-1").unwrap().url, "http://sts.before");

        env.set("AWS_STS_ENDPOINT", "http://sts.after");
        assert_eq!(resolver.resolve("STS", "us-east-1").unwrap().url, "http://sts.after");

        env.remove("AWS_STS_ENDPOINT");
        assert!(resolver.resolve("STS", "us-east-1").is_err());
    }

    #[test]
    fn test_signing_region_follows_each_call() {
        let (_, resolver) =
            resolver_with(StaticEnv::from_pairs([("AWS_EC2_ENDPOINT", "http://ec2.local")]));
        assert_eq!(resolver.resolve("EC2", "us-east-1").unwrap().signing_region, "us-east-1");
        assert_eq!(resolver.resolve("EC2", "ap-south-1").unwrap().signing_region, "ap-south-1");
    }

    #[test]
    fn test_active_overrides_in_stable_order() {
        let (_, resolver) = resolver_with(StaticEnv::from_pairs([
            ("AWS_IAM_ENDPOINT", "http://iam.local"),
            ("AWS_EKS_ENDPOINT", "http://eks.local"),
        ]));
        assert_eq!(
            resolver.active_overrides(),
            vec![
                (ServiceId::Eks, "http://eks.local".to_string()),
                (ServiceId::Iam, "http://iam.local".to_string()),
            ]
        );
    }

    #[test]
    fn test_concurrent_resolution() {
        let (_, resolver) =
            resolver_with(StaticEnv::from_pairs([("AWS_CLOUDTRAIL_ENDPOINT", "http://trail.local")]));
        let resolver = Arc::new(resolver);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let resolver = resolver.clone();
                thread::spawn(move || {
                    let region = format!("region-{}", i);
                    for _ in 0..100 {
                        let resolved = resolver.resolve("CloudTrail", &region).unwrap();
                        assert_eq!(resolved.signing_region, region);
                        assert!(resolver.resolve("EKS", &region).is_err());
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn test_into_endpoint_carries_sigv4_auth_scheme() {
        let endpoint = ResolvedEndpoint {
            url: "http://localhost:9999".to_string(),
            signing_region: "us-west-2".to_string(),
        }
        .into_endpoint("eks");

        assert_eq!(endpoint.url(), "http://localhost:9999");
        let schemes = match endpoint.properties().get("authSchemes") {
            Some(Document::Array(schemes)) => schemes,
            other => panic!("unexpected authSchemes: {:?}", other),
        };
        let scheme = match &schemes[0] {
            Document::Object(scheme) => scheme,
            other => panic!("unexpected auth scheme: {:?}", other),
        };
        assert_eq!(scheme.get("name"), Some(&Document::String("sigv4".to_string())));
        assert_eq!(scheme.get("signingName"), Some(&Document::String("eks".to_string())));
        assert_eq!(
            scheme.get("signingRegion"),
            Some(&Document::String("us-west-2".to_string()))
        );
    }
}
