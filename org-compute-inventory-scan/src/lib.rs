//! This crate provides the core logic for the organization compute inventory:
//! - Cross-account credential chaining (STS AssumeRole per member account)
//! - Active-account enumeration via AWS Organizations
//! - Per-region collection of running EC2 instances and ECS Fargate tasks
//! - Two-level aggregation (per account and organization-wide)
//! - Report rendering
//!

pub mod aggregate;
pub mod aws;
pub mod errors;
pub mod model;
pub mod report;
pub mod scan;

// Re-exports for a small, focused public API
pub use aggregate::{AccountInventory, OrgInventory, SkippedAccount};
pub use aws::AwsError;
pub use errors::{InventoryError, InventoryResult};
pub use model::{AccountId, CountTable, FargateTaskRecord, InstanceRecord, Totals};
pub use report::render_report;
pub use scan::{run_scan, ScanConfig};
