//! Role assumption settings from the shared config files
//!
//! A profile that sets `role_arn` requires role assumption. The SDK's own
//! profile provider cannot prompt for MFA codes, so such profiles are detected
//! here and served by [`MfaAssumeRoleProvider`](super::MfaAssumeRoleProvider).

use std::borrow::Cow;

use aws_config::profile::profile_file::ProfileFiles;
use aws_config::profile::Profile;
use aws_types::os_shim_internal::{Env, Fs};

use crate::error::ConfigError;

/// Where the base credentials for role assumption come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleSource {
    /// `source_profile = <name>`
    SourceProfile(String),
    /// `credential_source = Environment`
    Environment,
    /// `credential_source = Ec2InstanceMetadata`
    Ec2InstanceMetadata,
    /// `credential_source = EcsContainer`
    EcsContainer,
}

/// Role assumption settings of one profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleProfile {
    pub profile: String,
    pub role_arn: String,
    pub source: Option<RoleSource>,
    pub mfa_serial: Option<String>,
    pub role_session_name: Option<String>,
    pub external_id: Option<String>,
}

impl RoleProfile {
    /// Role settings of `profile`, or `None` when it does not assume a role
    pub fn from_profile(profile: &Profile) -> Result<Option<Self>, ConfigError> {
        let role_arn = match profile.get("role_arn") {
            Some(arn) if !arn.trim().is_empty() => arn.trim().to_string(),
            _ => return Ok(None),
        };

        let source = match (profile.get("source_profile"), profile.get("credential_source")) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::load(format!(
                    "profile {} sets both source_profile and credential_source",
                    profile.name()
                )))
            }
            (Some(source_profile), None) => Some(RoleSource::SourceProfile(source_profile.to_string())),
            (None, Some(credential_source)) => Some(parse_credential_source(credential_source)?),
            (None, None) => None,
        };

        Ok(Some(Self {
            profile: profile.name().to_string(),
            role_arn,
            source,
            mfa_serial: non_empty(profile.get("mfa_serial")),
            role_session_name: non_empty(profile.get("role_session_name")),
            external_id: non_empty(profile.get("external_id")),
        }))
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_credential_source(value: &str) -> Result<RoleSource, ConfigError> {
    match value {
        "Environment" => Ok(RoleSource::Environment),
        "Ec2InstanceMetadata" => Ok(RoleSource::Ec2InstanceMetadata),
        "EcsContainer" => Ok(RoleSource::EcsContainer),
        other => Err(ConfigError::load(format!(
            "unsupported credential_source: {}",
            other
        ))),
    }
}

/// Load the role settings of the selected profile
///
/// `profile` overrides the selection; when empty, `AWS_PROFILE` or `default`
/// is used as the SDK would. Missing config files are not an error.
pub async fn load_role_profile(
    profile: &str,
    profile_files: &ProfileFiles,
) -> Result<Option<RoleProfile>, ConfigError> {
    let selected = if profile.is_empty() {
        None
    } else {
        Some(Cow::Owned(profile.to_string()))
    };

    let profiles = aws_config::profile::load(&Fs::real(), &Env::real(), profile_files, selected)
        .await
        .map_err(ConfigError::load)?;

    match profiles.get_profile(profiles.selected_profile()) {
        Some(profile) => RoleProfile::from_profile(profile),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_config::profile::profile_file::ProfileFileKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(contents: &str) -> (NamedTempFile, ProfileFiles) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        let files = ProfileFiles::builder()
            .with_file(ProfileFileKind::Config, file.path())
            .build();
        (file, files)
    }

    #[tokio::test]
    async fn test_profile_without_role() {
        let (_file, files) = config_file("[profile dev]\nregion = us-west-2\n");
        assert_eq!(load_role_profile("dev", &files).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_profile_has_no_role() {
        let (_file, files) = config_file("[profile dev]\nregion = us-west-2\n");
        assert_eq!(load_role_profile("nope", &files).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_role_with_mfa_and_source_profile() {
        let (_file, files) = config_file(
            "[profile base]\nregion = us-west-2\n\n\
             [profile admin]\n\
             role_arn = arn:aws:iam::123456789012:role/Admin\n\
             source_profile = base\n\
             mfa_serial = arn:aws:iam::123456789012:mfa/jane\n\
             role_session_name = jane-session\n\
             external_id = ext-1\n",
        );

        let role = load_role_profile("admin", &files).await.unwrap().unwrap();
        assert_eq!(role.profile, "admin");
        assert_eq!(role.role_arn, "arn:aws:iam::123456789012:role/Admin");
        assert_eq!(role.source, Some(RoleSource::SourceProfile("base".to_string())));
        assert_eq!(role.mfa_serial.as_deref(), Some("arn:aws:iam::123456789012:mfa/jane"));
        assert_eq!(role.role_session_name.as_deref(), Some("jane-session"));
        assert_eq!(role.external_id.as_deref(), Some("ext-1"));
    }

    #[tokio::test]
    async fn test_role_with_credential_source() {
        let (_file, files) = config_file(
            "[profile ci]\n\
             role_arn = arn:aws:iam::123456789012:role/Ci\n\
             credential_source = Ec2InstanceMetadata\n",
        );

        let role = load_role_profile("ci", &files).await.unwrap().unwrap();
        assert_eq!(role.source, Some(RoleSource::Ec2InstanceMetadata));
        assert_eq!(role.mfa_serial, None);
    }

    #[tokio::test]
    async fn test_conflicting_sources_fail_to_load() {
        let (_file, files) = config_file(
            "[profile bad]\n\
             role_arn = arn:aws:iam::123456789012:role/Bad\n\
             source_profile = base\n\
             credential_source = Environment\n",
        );

        let err = load_role_profile("bad", &files).await.unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[tokio::test]
    async fn test_unknown_credential_source_fails_to_load() {
        let (_file, files) = config_file(
            "[profile bad]\n\
             role_arn = arn:aws:iam::123456789012:role/Bad\n\
             credential_source = Floppy\n",
        );

        assert!(load_role_profile("bad", &files).await.is_err());
    }
}
