//! Two-level aggregation: per-account and organization-wide inventories.
//!
//! Collectors hand raw records to an `AccountInventory`; finished account
//! inventories are folded into the `OrgInventory` on a single task, so the
//! account/org update pair is never observed partially.

use serde::Serialize;

use crate::model::{AccountId, CountTable, FargateTaskRecord, InstanceRecord, Totals};

/// Everything tallied for one account.
#[derive(Debug, Clone, Serialize)]
pub struct AccountInventory {
    /// Account the tallies belong to
    pub account_id: AccountId,
    /// Running-instance counts keyed by instance type
    pub instance_counts: CountTable,
    /// Additive tallies for the account
    pub totals: Totals,
}

impl AccountInventory {
    /// Empty inventory for one account
    pub fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            instance_counts: CountTable::new(),
            totals: Totals::default(),
        }
    }

    /// Tally one running EC2 instance: type count, instance count, vCPUs.
    pub fn record_instance(&mut self, record: &InstanceRecord) {
        self.instance_counts.record(&record.instance_type);
        self.totals.ec2_instances += 1;
        self.totals.ec2_vcpus += record.vcpus();
    }

    /// Tally ECS clusters seen in one region.
    pub fn record_clusters(&mut self, count: u64) {
        self.totals.ecs_clusters += count;
    }

    /// Tally one ECS task. Tasks that are not running Fargate tasks are
    /// dropped; an unparsable CPU field counts the task but adds zero units.
    pub fn record_task(&mut self, record: &FargateTaskRecord) {
        if !record.is_running_fargate() {
            return;
        }
        self.totals.ecs_running_tasks += 1;
        if let Some(units) = record.cpu_units() {
            self.totals.ecs_cpu_units += units;
        }
    }

    /// Fold a region's worth of records into this inventory.
    pub fn absorb_region(
        &mut self,
        instances: &[InstanceRecord],
        cluster_count: u64,
        tasks: &[FargateTaskRecord],
    ) {
        for instance in instances {
            self.record_instance(instance);
        }
        self.record_clusters(cluster_count);
        for task in tasks {
            self.record_task(task);
        }
    }
}

/// An account the scan could not reach, kept for the audit trail.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedAccount {
    /// Account that was skipped
    pub account_id: AccountId,
    /// Why it was skipped (role assumption failure detail)
    pub reason: String,
}

/// Organization-wide rollup plus the per-account inventories it was built
/// from.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrgInventory {
    /// Per-account inventories, sorted by account ID
    pub accounts: Vec<AccountInventory>,
    /// Accounts skipped because their role could not be assumed
    pub skipped: Vec<SkippedAccount>,
    /// Organization-wide instance-type counts
    pub instance_counts: CountTable,
    /// Organization-wide tallies
    pub totals: Totals,
}

impl OrgInventory {
    /// Empty organization rollup
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one finished account inventory into the organization totals.
    pub fn absorb_account(&mut self, account: AccountInventory) {
        self.instance_counts.merge(&account.instance_counts);
        self.totals.merge(&account.totals);
        self.accounts.push(account);
    }

    /// Record an unreachable account. Contributes zero to every total.
    pub fn record_skip(&mut self, account_id: AccountId, reason: impl Into<String>) {
        self.skipped.push(SkippedAccount {
            account_id,
            reason: reason.into(),
        });
    }

    /// Sort account sections for deterministic reporting. Account futures
    /// resolve in completion order, so this runs once after the scan.
    pub fn finalize(&mut self) {
        self.accounts.sort_by(|a, b| a.account_id.cmp(&b.account_id));
        self.skipped.sort_by(|a, b| a.account_id.cmp(&b.account_id));
    }
}
