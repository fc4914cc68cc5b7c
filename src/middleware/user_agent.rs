//! User agent tagging
//!
//! Appends `<key>/<value>` to the `User-Agent` header of every request sent by
//! a client the interceptor is installed on. SigV4 does not sign the
//! `User-Agent` header, so the tag is added right before transmission.

use aws_smithy_runtime_api::box_error::BoxError;
use aws_smithy_runtime_api::client::interceptors::context::BeforeTransmitInterceptorContextMut;
use aws_smithy_runtime_api::client::interceptors::Intercept;
use aws_smithy_runtime_api::client::runtime_components::RuntimeComponents;
use aws_smithy_types::config_bag::ConfigBag;

/// Key identifying the tool in the user agent
pub const TOOL_NAME: &str = "eksctl";

const USER_AGENT: &str = "user-agent";

/// Interceptor adding a fixed key/value pair to the user agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgentTag {
    key: String,
    value: String,
}

impl UserAgentTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Tag identifying this tool and its version
    pub fn for_tool() -> Self {
        Self::new(TOOL_NAME, crate::version())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// The `key/value` token appended to the header
    pub fn token(&self) -> String {
        format!("{}/{}", self.key, self.value)
    }

    /// Header value with the tag appended to `existing`
    pub fn apply(&self, existing: Option<&str>) -> String {
        match existing {
            Some(existing) if !existing.is_empty() => format!("{} {}", existing, self.token()),
            _ => self.token(),
        }
    }
}

impl Intercept for UserAgentTag {
    fn name(&self) -> &'static str {
        "UserAgentTag"
    }

    fn modify_before_transmit(
        &self,
        context: &mut BeforeTransmitInterceptorContextMut<'_>,
        _runtime_components: &RuntimeComponents,
        _cfg: &mut ConfigBag,
    ) -> Result<(), BoxError> {
        let headers = context.request_mut().headers_mut();
        let value = self.apply(headers.get(USER_AGENT));
        headers.insert(USER_AGENT, value);
        Ok(())
    }
}
