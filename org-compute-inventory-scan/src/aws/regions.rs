use std::time::Duration;

use aws_config::SdkConfig;
use aws_sdk_ec2::Client as Ec2Client;

use crate::aws::{with_timeout, AwsError, AwsResult};

/// List the region names enabled for the account behind `config`.
///
/// No filtering is applied; whatever DescribeRegions returns for the
/// account's credentials is what gets scanned. The caller treats a failure
/// here as "no regions for this account" rather than aborting the run.
pub async fn list_region_names(config: &SdkConfig, timeout: Duration) -> AwsResult<Vec<String>> {
    let client = Ec2Client::new(config);
    let out = with_timeout(timeout, async {
        client
            .describe_regions()
            .send()
            .await
            .map_err(|e| AwsError::SdkError(format!("EC2 DescribeRegions failed: {}", e)))
    })
    .await?;

    Ok(out
        .regions()
        .iter()
        .filter_map(|r| r.region_name().map(|s| s.to_string()))
        .collect())
}
