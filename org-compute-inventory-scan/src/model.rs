//! Inventory data model: accounts, raw records, count tables, totals.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// AWS's fixed Fargate convention: 1 vCPU = 1024 CPU units.
pub const CPU_UNITS_PER_VCPU: u64 = 1024;

/// Strongly-typed AWS account ID (12-digit string)
///
/// This newtype prevents accidentally mixing account IDs with other strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AccountId(String);

impl AccountId {
    /// Wrap a raw account ID string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the account ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One running EC2 instance, reduced to what the tally needs.
///
/// Ephemeral: produced by the collector and consumed immediately by the
/// aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRecord {
    /// Instance type string, e.g. "t2.micro"
    pub instance_type: String,
    /// Physical cores
    pub core_count: u32,
    /// Hardware threads per core
    pub threads_per_core: u32,
}

impl InstanceRecord {
    /// vCPUs exposed by this instance
    pub fn vcpus(&self) -> u64 {
        u64::from(self.core_count) * u64::from(self.threads_per_core)
    }
}

/// One ECS task as returned by DescribeTasks, before filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FargateTaskRecord {
    /// Launch type string, e.g. "FARGATE" or "EC2"
    pub launch_type: String,
    /// Last reported status, e.g. "RUNNING"
    pub last_status: String,
    /// CPU units as the raw string field from the task definition
    pub cpu: Option<String>,
}

impl FargateTaskRecord {
    /// Whether this task counts toward Fargate totals
    pub fn is_running_fargate(&self) -> bool {
        self.launch_type == "FARGATE" && self.last_status == "RUNNING"
    }

    /// CPU units validated as a non-negative integer.
    ///
    /// Non-numeric or missing values yield `None`: the task still counts as
    /// running but contributes zero units (never fails the scan).
    pub fn cpu_units(&self) -> Option<u64> {
        self.cpu.as_deref().and_then(|s| s.trim().parse::<u64>().ok())
    }
}

/// Mapping from instance-type string to running-instance count.
///
/// In-memory replacement for the file-per-type counters of the original
/// tool. Keys accumulate monotonically during a scan; BTreeMap keeps
/// iteration lexicographic, which is the report order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CountTable(BTreeMap<String, u64>);

impl CountTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one instance of `instance_type`
    pub fn record(&mut self, instance_type: &str) {
        *self.0.entry(instance_type.to_string()).or_insert(0) += 1;
    }

    /// Fold another table into this one
    pub fn merge(&mut self, other: &Self) {
        for (instance_type, count) in &other.0 {
            *self.0.entry(instance_type.clone()).or_insert(0) += count;
        }
    }

    /// Count for one instance type, zero when absent
    pub fn get(&self, instance_type: &str) -> u64 {
        self.0.get(instance_type).copied().unwrap_or(0)
    }

    /// Lexicographically ordered (type, count) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// True when no instance has been recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Additive tallies for one account or for the whole organization.
///
/// ECS vCPU is deliberately not a field: it is derived from the final
/// CPU-unit sum (`ecs_vcpus()`), so two 512-unit tasks make one vCPU instead
/// of two floored zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    /// Running EC2 instances
    pub ec2_instances: u64,
    /// Sum of per-instance vCPUs (cores × threads)
    pub ec2_vcpus: u64,
    /// ECS clusters seen
    pub ecs_clusters: u64,
    /// Running Fargate tasks
    pub ecs_running_tasks: u64,
    /// Sum of validated CPU units over running Fargate tasks
    pub ecs_cpu_units: u64,
}

impl Totals {
    /// Fargate vCPUs: floor division of the summed units
    pub fn ecs_vcpus(&self) -> u64 {
        self.ecs_cpu_units / CPU_UNITS_PER_VCPU
    }

    /// EC2 plus derived Fargate vCPUs
    pub fn combined_vcpus(&self) -> u64 {
        self.ec2_vcpus + self.ecs_vcpus()
    }

    /// Field-wise addition of another tally into this one
    pub fn merge(&mut self, other: &Self) {
        self.ec2_instances += other.ec2_instances;
        self.ec2_vcpus += other.ec2_vcpus;
        self.ecs_clusters += other.ecs_clusters;
        self.ecs_running_tasks += other.ecs_running_tasks;
        self.ecs_cpu_units += other.ecs_cpu_units;
    }

    /// Whether nothing at all was found
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_display() {
        let account = AccountId::new("123456789012");
        assert_eq!(account.to_string(), "123456789012");
        assert_eq!(account.as_str(), "123456789012");
    }

    #[test]
    fn test_instance_vcpus() {
        let record = InstanceRecord {
            instance_type: "c5.4xlarge".to_string(),
            core_count: 8,
            threads_per_core: 2,
        };
        assert_eq!(record.vcpus(), 16);
    }

    #[test]
    fn test_fargate_filter() {
        let running = FargateTaskRecord {
            launch_type: "FARGATE".to_string(),
            last_status: "RUNNING".to_string(),
            cpu: Some("256".to_string()),
        };
        let stopped = FargateTaskRecord {
            last_status: "STOPPED".to_string(),
            ..running.clone()
        };
        let ec2_launch = FargateTaskRecord {
            launch_type: "EC2".to_string(),
            ..running.clone()
        };
        assert!(running.is_running_fargate());
        assert!(!stopped.is_running_fargate());
        assert!(!ec2_launch.is_running_fargate());
    }

    #[test]
    fn test_cpu_units_validation() {
        let task = |cpu: Option<&str>| FargateTaskRecord {
            launch_type: "FARGATE".to_string(),
            last_status: "RUNNING".to_string(),
            cpu: cpu.map(|s| s.to_string()),
        };
        assert_eq!(task(Some("512")).cpu_units(), Some(512));
        assert_eq!(task(Some(" 1024 ")).cpu_units(), Some(1024));
        assert_eq!(task(Some("0")).cpu_units(), Some(0));
        assert_eq!(task(Some("half")).cpu_units(), None);
        assert_eq!(task(Some("-256")).cpu_units(), None);
        assert_eq!(task(None).cpu_units(), None);
    }

    #[test]
    fn test_count_table_is_order_independent() {
        let mut forward = CountTable::new();
        for t in ["t2.micro", "t2.micro", "t2.nano"] {
            forward.record(t);
        }
        let mut backward = CountTable::new();
        for t in ["t2.nano", "t2.micro", "t2.micro"] {
            backward.record(t);
        }
        assert_eq!(forward, backward);
        assert_eq!(forward.get("t2.micro"), 2);
        assert_eq!(forward.get("t2.nano"), 1);
    }

    #[test]
    fn test_count_table_iterates_lexicographically() {
        let mut table = CountTable::new();
        for t in ["m5.large", "c5.large", "t2.micro"] {
            table.record(t);
        }
        let types: Vec<&str> = table.iter().map(|(t, _)| t).collect();
        assert_eq!(types, vec!["c5.large", "m5.large", "t2.micro"]);
    }

    #[test]
    fn test_ecs_vcpus_floor_after_sum() {
        // Two 512-unit tasks: 1024 summed units -> 1 vCPU, not 0+0.
        let totals = Totals {
            ecs_cpu_units: 512 + 512,
            ..Totals::default()
        };
        assert_eq!(totals.ecs_vcpus(), 1);

        let fractional = Totals {
            ecs_cpu_units: 1023,
            ..Totals::default()
        };
        assert_eq!(fractional.ecs_vcpus(), 0);
    }

    #[test]
    fn test_totals_merge() {
        let mut org = Totals::default();
        let a = Totals {
            ec2_instances: 2,
            ec2_vcpus: 4,
            ecs_clusters: 1,
            ecs_running_tasks: 3,
            ecs_cpu_units: 768,
        };
        let b = Totals {
            ec2_instances: 1,
            ec2_vcpus: 8,
            ecs_clusters: 2,
            ecs_running_tasks: 1,
            ecs_cpu_units: 256,
        };
        org.merge(&a);
        org.merge(&b);
        assert_eq!(org.ec2_instances, 3);
        assert_eq!(org.ec2_vcpus, 12);
        assert_eq!(org.ecs_clusters, 3);
        assert_eq!(org.ecs_running_tasks, 4);
        assert_eq!(org.ecs_cpu_units, 1024);
        assert_eq!(org.ecs_vcpus(), 1);
        assert_eq!(org.combined_vcpus(), 13);
    }
}
