//! EKS API config
//!
//! Builds the AWS client configuration EKS tooling would use and reports
//! what it resolved to: region, profile, SDK log mode and the endpoint each
//! service's calls will go to.

use anyhow::Result;
use clap::Parser;
use eks_api_config::{
    config::{build_client_config, ProviderConfig},
    logging::{init_tracing, ClientLogMode},
    ServiceId,
};

/// EKS API config
///
/// Show the AWS client configuration resolved for the current environment.
#[derive(Parser, Debug)]
#[command(name = "eks-api-config")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// AWS region (overrides AWS_REGION env var)
    #[arg(short, long)]
    region: Option<String>,

    /// Credential profile (overrides AWS_PROFILE env var)
    #[arg(short, long)]
    profile: Option<String>,

    /// Verbosity 0-5; 5 enables AWS request/response logging (overrides EKSCTL_VERBOSE env var)
    #[arg(short, long)]
    verbose: Option<u8>,

    /// Log as JSON instead of plain text
    #[arg(long)]
    json: bool,

    /// Call STS GetCallerIdentity with the resolved credentials
    #[arg(long)]
    whoami: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration first (before logging, so we can use the verbosity)
    let mut provider = ProviderConfig::load()?;

    // Override settings with CLI arguments
    if let Some(region) = args.region {
        provider.region = region;
    }
    if let Some(profile) = args.profile {
        provider.profile = profile;
    }
    if let Some(verbose) = args.verbose {
        provider.verbose = verbose;
    }

    init_tracing(
        provider.verbose,
        ClientLogMode::for_verbosity(provider.verbose),
        args.json,
    )?;

    tracing::info!(
        version = %eks_api_config::version(),
        region = %provider.region,
        profile = %provider.profile_name(),
        verbose = provider.verbose,
        "Building AWS client configuration"
    );

    let config = build_client_config(&provider).await?;

    let region = config
        .region()
        .map(|r| r.to_string())
        .unwrap_or_else(|| "<none>".to_string());

    println!("region:      {}", region);
    println!("profile:     {}", provider.profile_name());
    println!("log mode:    {}", config.log_mode());
    println!("user agent:  {}", config.user_agent().token());
    println!("max retries: {}", config.retry_policy().max_attempts);
    if let Some(role) = config.role() {
        println!(
            "role:        {} (mfa: {})",
            role.role_arn,
            role.mfa_serial.as_deref().unwrap_or("none")
        );
    }

    println!("\nendpoints:");
    for service in ServiceId::ALL {
        let target = match config.endpoint_resolver().resolve(service.as_str(), &region) {
            Ok(endpoint) => endpoint.url,
            Err(_) => "default".to_string(),
        };
        println!("  {:<28} {:<36} {}", service.as_str(), service.env_var(), target);
    }

    if args.whoami {
        let identity = config.sts().get_caller_identity().send().await?;
        println!("\ncaller identity:");
        println!("  account: {}", identity.account().unwrap_or_default());
        println!("  arn:     {}", identity.arn().unwrap_or_default());
        println!("  user id: {}", identity.user_id().unwrap_or_default());
    }

    Ok(())
}
