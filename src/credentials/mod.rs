//! Credential assumption
//!
//! Profiles that assume a role are served by [`MfaAssumeRoleProvider`], which
//! prompts for MFA codes and always requests 30 minute sessions.

pub mod assume_role;
pub mod mfa;
pub mod profile;

use aws_config::ecs::EcsCredentialsProvider;
use aws_config::environment::EnvironmentVariableCredentialsProvider;
use aws_config::imds::credentials::ImdsCredentialsProvider;
use aws_config::profile::profile_file::ProfileFiles;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_credential_types::provider::SharedCredentialsProvider;

use crate::error::ConfigError;

pub use assume_role::{AssumeRoleOptions, MfaAssumeRoleProvider, ASSUMED_ROLE_DURATION};
pub use mfa::{read_token_code, StaticTokenProvider, StdinTokenProvider, TokenProvider, TOKEN_PROMPT};
pub use profile::{load_role_profile, RoleProfile, RoleSource};

/// Base credentials used to assume the role of `role`
pub fn source_credentials(
    role: &RoleProfile,
    profile_files: &ProfileFiles,
) -> Result<SharedCredentialsProvider, ConfigError> {
    let provider = match &role.source {
        Some(RoleSource::SourceProfile(name)) => SharedCredentialsProvider::new(
            ProfileFileCredentialsProvider::builder()
                .profile_name(name)
                .profile_files(profile_files.clone())
                .build(),
        ),
        Some(RoleSource::Environment) => {
            SharedCredentialsProvider::new(EnvironmentVariableCredentialsProvider::new())
        }
        Some(RoleSource::Ec2InstanceMetadata) => {
            SharedCredentialsProvider::new(ImdsCredentialsProvider::builder().build())
        }
        Some(RoleSource::EcsContainer) => {
            SharedCredentialsProvider::new(EcsCredentialsProvider::builder().build())
        }
        None => {
            return Err(ConfigError::load(format!(
                "profile {} sets role_arn but neither source_profile nor credential_source",
                role.profile
            )))
        }
    };
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(source: Option<RoleSource>) -> RoleProfile {
        RoleProfile {
            profile: "admin".to_string(),
            role_arn: "arn:aws:iam::123456789012:role/Admin".to_string(),
            source,
            mfa_serial: None,
            role_session_name: None,
            external_id: None,
        }
    }

    #[test]
    fn test_role_without_source_is_rejected() {
        let err = source_credentials(&role(None), &ProfileFiles::default()).unwrap_err();
        assert!(err.to_string().contains("neither source_profile nor credential_source"));
    }

    #[tokio::test]
    async fn test_sources_build_providers() {
        for source in [
            RoleSource::SourceProfile("base".to_string()),
            RoleSource::Environment,
            RoleSource::Ec2InstanceMetadata,
            RoleSource::EcsContainer,
        ] {
            assert!(source_credentials(&role(Some(source)), &ProfileFiles::default()).is_ok());
        }
    }
}
