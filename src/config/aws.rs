//! AWS SDK configuration
//!
//! Builds the client configuration shared by every AWS service client the
//! tool creates: region, profile credentials (with MFA-aware role
//! assumption), retry policy, SDK log mode, user agent tagging and
//! per-service endpoint overrides.

use std::sync::Arc;

use aws_config::profile::profile_file::ProfileFiles;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_smithy_runtime_api::client::http::{HttpClient, SharedHttpClient};

use crate::config::ProviderConfig;
use crate::credentials::{
    load_role_profile, source_credentials, AssumeRoleOptions, MfaAssumeRoleProvider, RoleProfile,
    StdinTokenProvider, TokenProvider,
};
use crate::endpoint::{EndpointOverrideResolver, EnvLookup, OverrideEndpointResolver, ProcessEnv, ServiceId};
use crate::error::ConfigError;
use crate::logging::ClientLogMode;
use crate::middleware::UserAgentTag;
use crate::utils::RetryPolicy;

/// AWS client configuration builder
///
/// Created once per session from the provider settings and a target region.
pub struct ClientConfigBuilder<'a> {
    provider: &'a ProviderConfig,
    region: String,
    env: Arc<dyn EnvLookup>,
    retry_policy: RetryPolicy,
    token_provider: Arc<dyn TokenProvider>,
    profile_files: Option<ProfileFiles>,
    credentials: Option<SharedCredentialsProvider>,
    http_client: Option<SharedHttpClient>,
}

impl<'a> ClientConfigBuilder<'a> {
    /// Create a new builder for `region`
    ///
    /// An empty region leaves region selection to the SDK's default chain.
    pub fn new(provider: &'a ProviderConfig, region: impl Into<String>) -> Self {
        Self {
            provider,
            region: region.into(),
            env: Arc::new(ProcessEnv),
            retry_policy: RetryPolicy::default(),
            token_provider: Arc::new(StdinTokenProvider),
            profile_files: None,
            credentials: None,
            http_client: None,
        }
    }

    /// Environment consulted for endpoint overrides
    pub fn env(mut self, env: Arc<dyn EnvLookup>) -> Self {
        self.env = env;
        self
    }

    /// Retry policy installed as the only retry strategy
    pub fn retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Source of MFA token codes for role assumption
    pub fn token_provider(mut self, token_provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = token_provider;
        self
    }

    /// Shared config/credentials files to read instead of the defaults
    pub fn profile_files(mut self, profile_files: ProfileFiles) -> Self {
        self.profile_files = Some(profile_files);
        self
    }

    /// Base credentials, replacing the SDK's default credential chain
    ///
    /// When the profile assumes a role these become the source credentials.
    pub fn credentials_provider(mut self, credentials: impl ProvideCredentials + 'static) -> Self {
        self.credentials = Some(SharedCredentialsProvider::new(credentials));
        self
    }

    /// HTTP client used by every service client
    pub fn http_client(mut self, http_client: impl HttpClient + 'static) -> Self {
        self.http_client = Some(SharedHttpClient::new(http_client));
        self
    }

    /// Build the client configuration
    ///
    /// Errors from the shared config/credentials chain are returned as
    /// [`ConfigError::Load`].
    pub async fn build(self) -> Result<ClientConfiguration, ConfigError> {
        let log_mode = ClientLogMode::for_verbosity(self.provider.verbose);
        let endpoints = Arc::new(EndpointOverrideResolver::new(self.env.clone()));
        let user_agent = UserAgentTag::for_tool();
        let assume_role = AssumeRoleOptions::new(self.token_provider.clone());
        let profile_files = self.profile_files.clone().unwrap_or_default();

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .retry_config(self.retry_policy.to_retry_config())
            .profile_files(profile_files.clone());

        if !self.region.is_empty() {
            loader = loader.region(Region::new(self.region.clone()));
        }
        if !self.provider.profile.is_empty() {
            loader = loader.profile_name(&self.provider.profile);
        }
        if let Some(http_client) = self.http_client.clone() {
            loader = loader.http_client(http_client);
        }
        if let Some(credentials) = self.credentials.clone() {
            loader = loader.credentials_provider(credentials);
        }

        let role = load_role_profile(&self.provider.profile, &profile_files).await?;
        let base = loader.load().await;

        let sdk_config = match &role {
            Some(role) => {
                tracing::debug!(
                    profile = %role.profile,
                    role_arn = %role.role_arn,
                    mfa = role.mfa_serial.is_some(),
                    "Profile assumes a role"
                );

                let source = match self.credentials.clone() {
                    Some(credentials) => credentials,
                    None => source_credentials(role, &profile_files)?,
                };
                let sts_config = aws_sdk_sts::config::Builder::from(&base)
                    .credentials_provider(source)
                    .endpoint_resolver(OverrideEndpointResolver::new(
                        ServiceId::Sts,
                        endpoints.clone(),
                        aws_sdk_sts::config::endpoint::DefaultResolver::new(),
                    ))
                    .interceptor(user_agent.clone())
                    .build();
                let provider = MfaAssumeRoleProvider::new(
                    role.clone(),
                    assume_role.clone(),
                    aws_sdk_sts::Client::from_conf(sts_config),
                );

                base.into_builder()
                    .credentials_provider(SharedCredentialsProvider::new(provider))
                    .build()
            }
            None => base,
        };

        tracing::debug!(
            region = ?sdk_config.region(),
            profile = %self.provider.profile_name(),
            log_mode = %log_mode,
            max_attempts = self.retry_policy.max_attempts,
            "Built AWS client configuration"
        );

        Ok(ClientConfiguration {
            sdk_config,
            log_mode,
            retry_policy: self.retry_policy,
            assume_role,
            role,
            user_agent,
            endpoints,
        })
    }
}

/// Client configuration for one session
///
/// Every service client created from it resolves endpoints through the
/// override resolver and tags its user agent.
#[derive(Debug, Clone)]
pub struct ClientConfiguration {
    sdk_config: SdkConfig,
    log_mode: ClientLogMode,
    retry_policy: RetryPolicy,
    assume_role: AssumeRoleOptions,
    role: Option<RoleProfile>,
    user_agent: UserAgentTag,
    endpoints: Arc<EndpointOverrideResolver>,
}

macro_rules! service_client {
    ($(#[$doc:meta])* $name:ident, $sdk:ident, $service:expr) => {
        $(#[$doc])*
        pub fn $name(&self) -> $sdk::Client {
            let config = $sdk::config::Builder::from(&self.sdk_config)
                .endpoint_resolver(OverrideEndpointResolver::new(
                    $service,
                    self.endpoints.clone(),
                    $sdk::config::endpoint::DefaultResolver::new(),
                ))
                .interceptor(self.user_agent.clone())
                .build();
            $sdk::Client::from_conf(config)
        }
    };
}

impl ClientConfiguration {
    /// Underlying SDK configuration
    pub fn sdk_config(&self) -> &SdkConfig {
        &self.sdk_config
    }

    /// Resolved region, if any
    pub fn region(&self) -> Option<&Region> {
        self.sdk_config.region()
    }

    pub fn log_mode(&self) -> ClientLogMode {
        self.log_mode
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    pub fn assume_role_options(&self) -> &AssumeRoleOptions {
        &self.assume_role
    }

    /// Role assumed for the selected profile, if it assumes one
    pub fn role(&self) -> Option<&RoleProfile> {
        self.role.as_ref()
    }

    pub fn user_agent(&self) -> &UserAgentTag {
        &self.user_agent
    }

    pub fn endpoint_resolver(&self) -> &Arc<EndpointOverrideResolver> {
        &self.endpoints
    }

    service_client!(
        /// CloudFormation client
        cloudformation, aws_sdk_cloudformation, ServiceId::CloudFormation
    );
    service_client!(
        /// CloudTrail client
        cloudtrail, aws_sdk_cloudtrail, ServiceId::CloudTrail
    );
    service_client!(
        /// EC2 client
        ec2, aws_sdk_ec2, ServiceId::Ec2
    );
    service_client!(
        /// EKS client
        eks, aws_sdk_eks, ServiceId::Eks
    );
    service_client!(
        /// Classic load balancing client
        elb, aws_sdk_elasticloadbalancing, ServiceId::Elb
    );
    service_client!(
        /// Load balancing v2 (ALB/NLB) client
        elbv2, aws_sdk_elasticloadbalancingv2, ServiceId::Elbv2
    );
    service_client!(
        /// IAM client
        iam, aws_sdk_iam, ServiceId::Iam
    );
    service_client!(
        /// STS client
        sts, aws_sdk_sts, ServiceId::Sts
    );
}

/// Build the client configuration for the provider's own region (convenience function)
pub async fn build_client_config(provider: &ProviderConfig) -> Result<ClientConfiguration, ConfigError> {
    ClientConfigBuilder::new(provider, provider.region.clone()).build().await
}
