//! Scan orchestration: one organization pass, bounded fan-out, merged tallies.
//!
//! Accounts are scanned by a bounded worker pool; each worker owns its own
//! assumed-role `SdkConfig` and its own `AccountInventory`, and finished
//! inventories are merged into the organization rollup on the collecting
//! task. Regions within an account fan out the same way, sharing the
//! account config read-only.

use std::time::Duration;

use aws_config::SdkConfig;
use aws_sdk_organizations::Client as OrganizationsClient;
use aws_sdk_sts::Client as StsClient;
use futures::stream::{self, StreamExt};
use log::{info, warn};

use crate::aggregate::{AccountInventory, OrgInventory};
use crate::aws::{ec2, ecs, organizations, regions, sts, AwsResult};
use crate::errors::{InventoryError, InventoryResult};
use crate::model::{AccountId, FargateTaskRecord, InstanceRecord};

/// Region used for organization-level API calls unless overridden.
pub const DEFAULT_ORG_REGION: &str = "us-east-1";

/// Role assumed in each member account unless a template overrides it.
pub const DEFAULT_ROLE_NAME: &str = "OrganizationAccountAccessRole";

/// Placeholder substituted with the member account ID in role ARN templates.
const ACCOUNT_ID_PLACEHOLDER: &str = "{account_id}";

/// Everything the scan needs to know up front.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Named profile for organization-level calls (None = default chain)
    pub org_profile: Option<String>,
    /// Named profile used as the base identity for AssumeRole; falls back
    /// to the organization profile when unset
    pub assume_profile: Option<String>,
    /// Region for organization-level calls
    pub org_region: String,
    /// Role name assumed in each member account
    pub role_name: String,
    /// Full role ARN template with an `{account_id}` placeholder; overrides
    /// the ARN derived from `role_name`
    pub role_arn_template: Option<String>,
    /// Bounded width of the account worker pool
    pub max_concurrent_accounts: usize,
    /// Bounded width of the per-account region worker pool
    pub max_concurrent_regions: usize,
    /// Timeout applied to every external call
    pub call_timeout: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            org_profile: None,
            assume_profile: None,
            org_region: DEFAULT_ORG_REGION.to_string(),
            role_name: DEFAULT_ROLE_NAME.to_string(),
            role_arn_template: None,
            max_concurrent_accounts: 4,
            max_concurrent_regions: 8,
            call_timeout: Duration::from_secs(30),
        }
    }
}

impl ScanConfig {
    /// Role ARN for one member account, from the template or the role name.
    pub fn role_arn_for(&self, account_id: &AccountId) -> String {
        match &self.role_arn_template {
            Some(template) => template.replace(ACCOUNT_ID_PLACEHOLDER, account_id.as_str()),
            None => format!(
                "arn:aws:iam::{}:role/{}",
                account_id.as_str(),
                self.role_name
            ),
        }
    }

    /// Reject templates that could silently assume the same role everywhere.
    fn validate(&self) -> InventoryResult<()> {
        if let Some(template) = &self.role_arn_template {
            if !template.contains(ACCOUNT_ID_PLACEHOLDER) {
                return Err(InventoryError::configuration(format!(
                    "role ARN template '{}' does not contain the {} placeholder",
                    template, ACCOUNT_ID_PLACEHOLDER
                )));
            }
        }
        if self.max_concurrent_accounts == 0 || self.max_concurrent_regions == 0 {
            return Err(InventoryError::configuration(
                "worker pool widths must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Run one full organization scan.
///
/// Fatal errors (bad configuration, unreachable management identity, zero
/// active accounts) surface before any account is processed. Everything
/// after that degrades per account or per call and is only logged.
pub async fn run_scan(config: &ScanConfig) -> InventoryResult<OrgInventory> {
    config.validate()?;

    let org_config = sts::base_config(config.org_profile.as_deref(), &config.org_region).await;

    let management_account =
        sts::caller_account_id(&StsClient::new(&org_config), config.call_timeout).await?;
    info!(
        "Scanning organization as management account {}",
        management_account
    );

    let org_client = OrganizationsClient::new(&org_config);
    let accounts = organizations::list_active_accounts(&org_client, config.call_timeout).await?;
    if accounts.is_empty() {
        return Err(InventoryError::NoActiveAccounts);
    }
    info!("Scanning {} active accounts", accounts.len());

    // Base identity for role assumption; may differ from the org identity.
    let assume_base = match &config.assume_profile {
        Some(profile) => sts::base_config(Some(profile), &config.org_region).await,
        None => org_config.clone(),
    };

    let mut org = OrgInventory::new();
    let mut account_scans = stream::iter(accounts.into_iter().map(|account_id| {
        let base = &assume_base;
        async move {
            let result = scan_account(config, base, &account_id).await;
            (account_id, result)
        }
    }))
    .buffer_unordered(config.max_concurrent_accounts);

    // Single merge point: account/org tallies never update concurrently.
    while let Some((account_id, result)) = account_scans.next().await {
        match result {
            Ok(inventory) => org.absorb_account(inventory),
            Err(e) => {
                warn!("Skipping account {}: {}", account_id, e);
                org.record_skip(account_id, e.to_string());
            }
        }
    }

    org.finalize();
    Ok(org)
}

/// Scan one member account: assume its role, list its regions, fan out over
/// them. The only error that escapes is role assumption failure; everything
/// else degrades to gaps in coverage.
async fn scan_account(
    config: &ScanConfig,
    base: &SdkConfig,
    account_id: &AccountId,
) -> AwsResult<AccountInventory> {
    let role_arn = config.role_arn_for(account_id);
    let account_config = sts::assumed_role_config(
        base,
        account_id.as_str(),
        &role_arn,
        &config.org_region,
        config.call_timeout,
    )
    .await?;

    let region_names = match regions::list_region_names(&account_config, config.call_timeout).await
    {
        Ok(names) => names,
        Err(e) => {
            warn!(
                "Account {}: region listing failed, scanning no regions: {}",
                account_id, e
            );
            Vec::new()
        }
    };

    let mut inventory = AccountInventory::new(account_id.clone());
    let mut region_scans = stream::iter(region_names.into_iter().map(|region| {
        let account_config = &account_config;
        async move { scan_region(config, account_config, account_id, &region).await }
    }))
    .buffer_unordered(config.max_concurrent_regions);

    while let Some((instances, cluster_count, tasks)) = region_scans.next().await {
        inventory.absorb_region(&instances, cluster_count, &tasks);
    }

    // `account_config` drops here; the account's temporary credentials do
    // not survive its own scan.
    Ok(inventory)
}

/// Collect both resource paths for one (account, region) pair.
///
/// Each path that fails or times out contributes nothing and logs the gap.
async fn scan_region(
    config: &ScanConfig,
    account_config: &SdkConfig,
    account_id: &AccountId,
    region: &str,
) -> (Vec<InstanceRecord>, u64, Vec<FargateTaskRecord>) {
    let ec2_client = ec2::region_client(account_config, region);
    let ecs_client = ecs::region_client(account_config, region);

    let (instances, listing) = tokio::join!(
        ec2::running_instances(&ec2_client, region, config.call_timeout),
        ecs::cluster_tasks(&ecs_client, region, config.call_timeout),
    );

    let instances = instances.unwrap_or_else(|e| {
        warn!(
            "Account {} region {}: EC2 collection skipped: {}",
            account_id, region, e
        );
        Vec::new()
    });

    let listing = listing.unwrap_or_else(|e| {
        warn!(
            "Account {} region {}: ECS collection skipped: {}",
            account_id, region, e
        );
        ecs::EcsRegionListing::default()
    });

    (instances, listing.cluster_count, listing.tasks)
}
