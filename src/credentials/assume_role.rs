//! Role assumption with MFA
//!
//! Exchanges base credentials for a temporary session of the profile's role
//! through STS `AssumeRole`, reading the MFA code from a [`TokenProvider`]
//! when the profile sets `mfa_serial`.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use aws_credential_types::provider::{self, error::CredentialsError, future, ProvideCredentials};
use aws_credential_types::Credentials;

use super::mfa::{StdinTokenProvider, TokenProvider};
use super::profile::RoleProfile;

/// Lifetime of assumed-role sessions
pub const ASSUMED_ROLE_DURATION: Duration = Duration::from_secs(30 * 60);

const PROVIDER_NAME: &str = "MfaAssumeRole";

/// How assumed-role sessions are requested
#[derive(Debug, Clone)]
pub struct AssumeRoleOptions {
    duration: Duration,
    token_provider: Arc<dyn TokenProvider>,
}

impl AssumeRoleOptions {
    /// Options reading MFA codes from `token_provider`
    ///
    /// The session duration is always [`ASSUMED_ROLE_DURATION`].
    pub fn new(token_provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            duration: ASSUMED_ROLE_DURATION,
            token_provider,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn token_provider(&self) -> &Arc<dyn TokenProvider> {
        &self.token_provider
    }
}

impl Default for AssumeRoleOptions {
    fn default() -> Self {
        Self::new(Arc::new(StdinTokenProvider))
    }
}

/// Credentials provider assuming the role of a profile
#[derive(Debug)]
pub struct MfaAssumeRoleProvider {
    role: RoleProfile,
    options: AssumeRoleOptions,
    sts: aws_sdk_sts::Client,
}

impl MfaAssumeRoleProvider {
    /// `sts` must be configured with the base (source) credentials
    pub fn new(role: RoleProfile, options: AssumeRoleOptions, sts: aws_sdk_sts::Client) -> Self {
        Self { role, options, sts }
    }

    pub fn role(&self) -> &RoleProfile {
        &self.role
    }

    fn session_name(&self) -> String {
        self.role
            .role_session_name
            .clone()
            .unwrap_or_else(|| format!("eksctl-{}", chrono::Utc::now().timestamp_millis()))
    }

    async fn token_code(&self, mfa_serial: &str) -> Result<String, CredentialsError> {
        let token_provider = self.options.token_provider.clone();
        let mfa_serial = mfa_serial.to_string();
        // the provider may block on terminal input
        tokio::task::spawn_blocking(move || token_provider.token_code(&mfa_serial))
            .await
            .map_err(CredentialsError::provider_error)?
            .map_err(CredentialsError::provider_error)
    }

    async fn assume_role(&self) -> provider::Result {
        let mut request = self
            .sts
            .assume_role()
            .role_arn(&self.role.role_arn)
            .role_session_name(self.session_name())
            .duration_seconds(self.options.duration.as_secs() as i32);

        if let Some(external_id) = &self.role.external_id {
            request = request.external_id(external_id);
        }
        if let Some(mfa_serial) = &self.role.mfa_serial {
            let code = self.token_code(mfa_serial).await?;
            request = request.serial_number(mfa_serial).token_code(code);
        }

        tracing::debug!(
            role_arn = %self.role.role_arn,
            profile = %self.role.profile,
            duration_secs = self.options.duration.as_secs(),
            "Assuming role"
        );

        let output = request.send().await.map_err(|err| {
            tracing::warn!(role_arn = %self.role.role_arn, error = %err, "Failed to assume role");
            CredentialsError::provider_error(err)
        })?;

        let creds = output
            .credentials()
            .ok_or_else(|| CredentialsError::unhandled("AssumeRole response did not contain credentials"))?;
        let expiry = SystemTime::try_from(*creds.expiration()).map_err(CredentialsError::unhandled)?;

        Ok(Credentials::new(
            creds.access_key_id(),
            creds.secret_access_key(),
            Some(creds.session_token().to_string()),
            Some(expiry),
            PROVIDER_NAME,
        ))
    }
}

impl ProvideCredentials for MfaAssumeRoleProvider {
    fn provide_credentials<'a>(&'a self) -> future::ProvideCredentials<'a>
    where
        Self: 'a,
    {
        future::ProvideCredentials::new(self.assume_role())
    }
}
