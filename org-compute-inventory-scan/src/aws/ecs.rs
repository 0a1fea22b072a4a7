//! Cluster and Fargate task collection

use std::time::Duration;

use aws_config::SdkConfig;
use aws_sdk_ecs::config::Region;
use aws_sdk_ecs::Client;
use log::{debug, warn};

use crate::aws::{with_timeout, AwsError, AwsResult};
use crate::model::FargateTaskRecord;

/// DescribeTasks accepts at most 100 task ARNs per call.
const DESCRIBE_TASKS_CHUNK: usize = 100;

/// Cluster count plus the Fargate tasks collected from one region.
#[derive(Debug, Default)]
pub struct EcsRegionListing {
    /// Number of clusters seen in the region (all clusters, not only those
    /// with Fargate tasks)
    pub cluster_count: u64,
    /// Raw task records; the aggregator applies the FARGATE/RUNNING filter
    pub tasks: Vec<FargateTaskRecord>,
}

/// Build an ECS client for one region on top of an account-scoped config.
pub fn region_client(config: &SdkConfig, region: &str) -> Client {
    let conf = aws_sdk_ecs::config::Builder::from(config)
        .region(Region::new(region.to_string()))
        .build();
    Client::from_conf(conf)
}

/// Collect clusters and their tasks in one region.
///
/// ListClusters failure propagates (the region then contributes no ECS
/// data); failures below cluster level are logged and degrade to "no data
/// for this cluster" so sibling clusters still get counted. The timeout
/// applies to each individual API call, not the whole region.
pub async fn cluster_tasks(
    client: &Client,
    region: &str,
    timeout: Duration,
) -> AwsResult<EcsRegionListing> {
    let cluster_arns = list_cluster_arns(client, region, timeout).await?;

    let mut listing = EcsRegionListing {
        cluster_count: cluster_arns.len() as u64,
        tasks: Vec::new(),
    };

    for cluster_arn in &cluster_arns {
        let task_arns = match list_task_arns(client, cluster_arn, region, timeout).await {
            Ok(arns) => arns,
            Err(e) => {
                warn!(
                    "Skipping cluster {} in {}: task listing failed: {}",
                    cluster_arn, region, e
                );
                continue;
            }
        };

        for chunk in task_arns.chunks(DESCRIBE_TASKS_CHUNK) {
            match describe_task_chunk(client, cluster_arn, chunk, timeout).await {
                Ok(mut records) => listing.tasks.append(&mut records),
                Err(e) => {
                    warn!(
                        "Skipping {} tasks in cluster {} ({}): describe failed: {}",
                        chunk.len(),
                        cluster_arn,
                        region,
                        e
                    );
                }
            }
        }
    }

    debug!(
        "Found {} clusters and {} tasks in {}",
        listing.cluster_count,
        listing.tasks.len(),
        region
    );
    Ok(listing)
}

/// Paginate ListClusters into a flat ARN list.
async fn list_cluster_arns(
    client: &Client,
    region: &str,
    timeout: Duration,
) -> AwsResult<Vec<String>> {
    let mut arns = Vec::<String>::new();
    let mut next_token: Option<String> = None;

    loop {
        let mut query = client.list_clusters();
        if let Some(token) = &next_token {
            query = query.next_token(token);
        }

        let out = with_timeout(timeout, async {
            query.send().await.map_err(|e| {
                AwsError::SdkError(format!("ECS ListClusters failed in {}: {}", region, e))
            })
        })
        .await?;

        arns.extend(out.cluster_arns().iter().cloned());

        next_token = out.next_token().map(|s| s.to_string());
        if next_token.is_none() {
            break;
        }
    }

    Ok(arns)
}

/// Paginate ListTasks for one cluster into a flat ARN list.
async fn list_task_arns(
    client: &Client,
    cluster_arn: &str,
    region: &str,
    timeout: Duration,
) -> AwsResult<Vec<String>> {
    let mut arns = Vec::<String>::new();
    let mut next_token: Option<String> = None;

    loop {
        let mut query = client.list_tasks().cluster(cluster_arn);
        if let Some(token) = &next_token {
            query = query.next_token(token);
        }

        let out = with_timeout(timeout, async {
            query.send().await.map_err(|e| {
                AwsError::SdkError(format!("ECS ListTasks failed in {}: {}", region, e))
            })
        })
        .await?;

        arns.extend(out.task_arns().iter().cloned());

        next_token = out.next_token().map(|s| s.to_string());
        if next_token.is_none() {
            break;
        }
    }

    Ok(arns)
}

/// Describe up to `DESCRIBE_TASKS_CHUNK` tasks and normalize into records.
async fn describe_task_chunk(
    client: &Client,
    cluster_arn: &str,
    task_arns: &[String],
    timeout: Duration,
) -> AwsResult<Vec<FargateTaskRecord>> {
    if task_arns.is_empty() {
        return Ok(Vec::new());
    }

    let out = with_timeout(timeout, async {
        client
            .describe_tasks()
            .cluster(cluster_arn)
            .set_tasks(Some(task_arns.to_vec()))
            .send()
            .await
            .map_err(|e| AwsError::SdkError(format!("ECS DescribeTasks failed: {}", e)))
    })
    .await?;

    Ok(out
        .tasks()
        .iter()
        .map(|task| FargateTaskRecord {
            launch_type: task
                .launch_type()
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
            last_status: task.last_status().unwrap_or_default().to_string(),
            cpu: task.cpu().map(|s| s.to_string()),
        })
        .collect())
}
