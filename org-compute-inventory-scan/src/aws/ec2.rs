//! Running-instance collection

use std::time::Duration;

use aws_config::SdkConfig;
use aws_sdk_ec2::config::Region;
use aws_sdk_ec2::types::Filter;
use aws_sdk_ec2::Client;
use log::debug;

use crate::aws::{with_timeout, AwsError, AwsResult};
use crate::model::InstanceRecord;

/// Build an EC2 client for one region on top of an account-scoped config.
///
/// The config is shared read-only by every region worker of the account; the
/// region override lives only in the derived client config.
pub fn region_client(config: &SdkConfig, region: &str) -> Client {
    let conf = aws_sdk_ec2::config::Builder::from(config)
        .region(Region::new(region.to_string()))
        .build();
    Client::from_conf(conf)
}

/// Collect the running instances in one region, paginating DescribeInstances.
///
/// Returns one record per running instance with its CPU topology. A region
/// with no running instances is a normal empty result, not an error. The
/// timeout applies per page.
pub async fn running_instances(
    client: &Client,
    region: &str,
    timeout: Duration,
) -> AwsResult<Vec<InstanceRecord>> {
    let state_filter = Filter::builder()
        .name("instance-state-name")
        .values("running")
        .build();

    let mut records = Vec::<InstanceRecord>::new();
    let mut next_token: Option<String> = None;

    loop {
        let mut query = client.describe_instances().filters(state_filter.clone());
        if let Some(token) = &next_token {
            query = query.next_token(token);
        }

        let out = with_timeout(timeout, async {
            query.send().await.map_err(|e| {
                AwsError::SdkError(format!("EC2 DescribeInstances failed in {}: {}", region, e))
            })
        })
        .await?;

        for reservation in out.reservations() {
            for instance in reservation.instances() {
                let instance_type = match instance.instance_type() {
                    Some(t) => t.as_str().to_string(),
                    None => continue,
                };

                // Missing CpuOptions is effectively unheard of for a running
                // instance; fall back to a single hardware thread so the
                // instance still shows up in the count.
                let (cores, threads) = instance
                    .cpu_options()
                    .map(|opts| {
                        (
                            opts.core_count().unwrap_or(1).max(0) as u32,
                            opts.threads_per_core().unwrap_or(1).max(0) as u32,
                        )
                    })
                    .unwrap_or((1, 1));

                records.push(InstanceRecord {
                    instance_type,
                    core_count: cores,
                    threads_per_core: threads,
                });
            }
        }

        next_token = out.next_token().map(|s| s.to_string());
        if next_token.is_none() {
            break;
        }
    }

    debug!("Found {} running instances in {}", records.len(), region);
    Ok(records)
}
