//! Supported AWS services
//!
//! The set of services whose endpoints can be overridden is fixed at build
//! time. Each service is keyed by the stable service identifier the AWS SDKs
//! use, and carries the environment variable that overrides it.

use std::fmt;
use std::str::FromStr;

/// A logical AWS service used by the tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceId {
    CloudFormation,
    Eks,
    Ec2,
    Elb,
    Elbv2,
    Sts,
    Iam,
    CloudTrail,
}

impl ServiceId {
    /// Every supported service, in a stable order
    pub const ALL: [ServiceId; 8] = [
        ServiceId::CloudFormation,
        ServiceId::Eks,
        ServiceId::Ec2,
        ServiceId::Elb,
        ServiceId::Elbv2,
        ServiceId::Sts,
        ServiceId::Iam,
        ServiceId::CloudTrail,
    ];

    /// Stable SDK service identifier
    pub const fn as_str(&self) -> &'static str {
        match self {
            ServiceId::CloudFormation => "CloudFormation",
            ServiceId::Eks => "EKS",
            ServiceId::Ec2 => "EC2",
            ServiceId::Elb => "Elastic Load Balancing",
            ServiceId::Elbv2 => "Elastic Load Balancing v2",
            ServiceId::Sts => "STS",
            ServiceId::Iam => "IAM",
            ServiceId::CloudTrail => "CloudTrail",
        }
    }

    /// Environment variable holding the endpoint override for this service
    pub const fn env_var(&self) -> &'static str {
        match self {
            ServiceId::CloudFormation => "AWS_CLOUDFORMATION_ENDPOINT",
            ServiceId::Eks => "AWS_EKS_ENDPOINT",
            ServiceId::Ec2 => "AWS_EC2_ENDPOINT",
            ServiceId::Elb => "AWS_ELB_ENDPOINT",
            ServiceId::Elbv2 => "AWS_ELBV2_ENDPOINT",
            ServiceId::Sts => "AWS_STS_ENDPOINT",
            ServiceId::Iam => "AWS_IAM_ENDPOINT",
            ServiceId::CloudTrail => "AWS_CLOUDTRAIL_ENDPOINT",
        }
    }

    /// SigV4 signing name used when an overridden endpoint is signed
    pub const fn signing_name(&self) -> &'static str {
        match self {
            ServiceId::CloudFormation => "cloudformation",
            ServiceId::Eks => "eks",
            ServiceId::Ec2 => "ec2",
            ServiceId::Elb | ServiceId::Elbv2 => "elasticloadbalancing",
            ServiceId::Sts => "sts",
            ServiceId::Iam => "iam",
            ServiceId::CloudTrail => "cloudtrail",
        }
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a supported service identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported service identifier: {0}")]
pub struct UnknownService(pub String);

impl FromStr for ServiceId {
    type Err = UnknownService;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceId::ALL
            .iter()
            .copied()
            .find(|service| service.as_str() == s)
            .ok_or_else(|| UnknownService(s.to_string()))
    }
}
