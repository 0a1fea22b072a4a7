use std::time::Duration;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_sts::Client as StsClient;
use log::{debug, info};

use crate::aws::{with_timeout, AwsError, AwsResult};

/// Session name recorded in CloudTrail for every assumed role.
const SESSION_NAME: &str = "org-compute-inventory";

/// Return the current caller account ID using STS GetCallerIdentity.
///
/// This is used to validate the management identity before any account
/// processing starts.
///
/// # Arguments
///
/// * `client` - STS client to use for the API call
/// * `timeout` - per-call timeout
pub async fn caller_account_id(client: &StsClient, timeout: Duration) -> AwsResult<String> {
    let out = with_timeout(timeout, async {
        client
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| AwsError::SdkError(format!("STS GetCallerIdentity failed: {}", e)))
    })
    .await?;
    let acct = out
        .account()
        .map(|s| s.to_string())
        .ok_or_else(|| AwsError::SdkError("STS GetCallerIdentity missing Account".to_string()))?;
    Ok(acct)
}

/// Load a base SDK config for the given named profile (or the default
/// credential chain when `profile` is `None`), pinned to `region`.
pub async fn base_config(profile: Option<&str>, region: &str) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()));
    if let Some(name) = profile {
        loader = loader.profile_name(name);
    }
    loader.load().await
}

/// Build an SDK config holding temporary credentials for one member account.
///
/// Uses `AssumeRoleProvider` layered over the base identity, so the SDK
/// refreshes the temporary credentials itself. The returned `SdkConfig` is
/// an owned value scoped to the account's scan; dropping it is what
/// guarantees the credentials never outlive the account iteration.
///
/// A provider build failure or a first-call credential failure surfaces as
/// `AwsError::AssumeRoleError`, which the orchestrator treats as "skip this
/// account", never as a fatal error.
pub async fn assumed_role_config(
    base: &SdkConfig,
    account_id: &str,
    role_arn: &str,
    region: &str,
    timeout: Duration,
) -> AwsResult<SdkConfig> {
    info!(
        "Assuming role {} for account {} in region {}",
        role_arn, account_id, region
    );

    let provider = aws_config::sts::AssumeRoleProvider::builder(role_arn)
        .configure(base)
        .region(Region::new(region.to_string()))
        .session_name(SESSION_NAME)
        .build()
        .await;

    let config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .credentials_provider(provider)
        .load()
        .await;

    // AssumeRoleProvider resolves credentials lazily, so force the exchange
    // now: a dead or unassumable role must be detected here, while the
    // caller can still skip the account cleanly.
    let sts = StsClient::new(&config);
    let exchange = with_timeout(timeout, async {
        sts.get_caller_identity()
            .send()
            .await
            .map_err(|e| AwsError::AssumeRoleError {
                account_id: account_id.to_string(),
                message: e.to_string(),
            })
    })
    .await;

    match exchange {
        Ok(identity) => {
            debug!(
                "Assumed {} as {}",
                role_arn,
                identity.arn().unwrap_or("unknown")
            );
            Ok(config)
        }
        Err(AwsError::Timeout(limit)) => Err(AwsError::AssumeRoleError {
            account_id: account_id.to_string(),
            message: format!("credential exchange timed out after {:?}", limit),
        }),
        Err(e) => Err(e),
    }
}
