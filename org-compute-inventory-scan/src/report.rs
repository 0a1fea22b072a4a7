//! Report rendering: pure functions from inventories to text.

use std::fmt::Write;

use crate::aggregate::OrgInventory;
use crate::model::{CountTable, Totals};

/// Render the full human-readable report.
///
/// Section order: one section per scanned account (EC2 listing + totals,
/// ECS summary, combined vCPUs), the organization-wide equivalents, then the
/// combined EC2+ECS grand total. Skipped accounts are listed so the totals
/// stay auditable.
pub fn render_report(org: &OrgInventory) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Organization compute inventory");
    let _ = writeln!(out, "==============================");

    for account in &org.accounts {
        let _ = writeln!(out);
        let _ = writeln!(out, "Account {}", account.account_id);
        render_section(&mut out, &account.instance_counts, &account.totals);
    }

    if !org.skipped.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Skipped accounts (no contribution to totals):");
        for skip in &org.skipped {
            let _ = writeln!(out, "  {}: {}", skip.account_id, skip.reason);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Organization ({} accounts scanned, {} skipped)",
        org.accounts.len(),
        org.skipped.len()
    );
    render_section(&mut out, &org.instance_counts, &org.totals);

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Grand total vCPUs (EC2 + ECS Fargate): {}",
        org.totals.combined_vcpus()
    );

    out
}

/// One account-or-organization section. Shared so both levels render
/// identically.
fn render_section(out: &mut String, counts: &CountTable, totals: &Totals) {
    if counts.is_empty() && totals.is_empty() {
        let _ = writeln!(out, "  no instances or clusters found");
        return;
    }

    if counts.is_empty() {
        let _ = writeln!(out, "  Running EC2 instances: none");
    } else {
        let _ = writeln!(out, "  Running EC2 instances:");
        for (instance_type, count) in counts.iter() {
            let _ = writeln!(out, "    {:<24} {:>6}", instance_type, count);
        }
    }
    let _ = writeln!(
        out,
        "  EC2 total: {} instances, {} vCPUs",
        totals.ec2_instances, totals.ec2_vcpus
    );
    let _ = writeln!(
        out,
        "  ECS Fargate: {} clusters, {} running tasks, {} CPU units, {} vCPUs",
        totals.ecs_clusters,
        totals.ecs_running_tasks,
        totals.ecs_cpu_units,
        totals.ecs_vcpus()
    );
    let _ = writeln!(out, "  Combined vCPUs: {}", totals.combined_vcpus());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AccountInventory;
    use crate::model::{AccountId, FargateTaskRecord, InstanceRecord};

    fn sample_org() -> OrgInventory {
        let mut org = OrgInventory::new();

        let mut a = AccountInventory::new(AccountId::new("111111111111"));
        for (instance_type, cores, threads) in
            [("t2.micro", 1, 1), ("t2.micro", 1, 1), ("c5.xlarge", 2, 2)]
        {
            a.record_instance(&InstanceRecord {
                instance_type: instance_type.to_string(),
                core_count: cores,
                threads_per_core: threads,
            });
        }
        a.record_clusters(1);
        a.record_task(&FargateTaskRecord {
            launch_type: "FARGATE".to_string(),
            last_status: "RUNNING".to_string(),
            cpu: Some("512".to_string()),
        });
        a.record_task(&FargateTaskRecord {
            launch_type: "FARGATE".to_string(),
            last_status: "RUNNING".to_string(),
            cpu: Some("512".to_string()),
        });
        org.absorb_account(a);
        org.finalize();
        org
    }

    #[test]
    fn test_report_sections_and_order() {
        let report = render_report(&sample_org());

        let account_pos = report.find("Account 111111111111").expect("account section");
        let org_pos = report.find("Organization (1 accounts scanned").expect("org section");
        let grand_pos = report.find("Grand total vCPUs").expect("grand total");
        assert!(account_pos < org_pos);
        assert!(org_pos < grand_pos);

        // 2 + 4 EC2 vCPUs, 1024 units -> 1 Fargate vCPU
        assert!(report.contains("EC2 total: 3 instances, 6 vCPUs"));
        assert!(report.contains("ECS Fargate: 1 clusters, 2 running tasks, 1024 CPU units, 1 vCPUs"));
        assert!(report.contains("Grand total vCPUs (EC2 + ECS Fargate): 7"));
    }

    #[test]
    fn test_instance_types_listed_lexicographically() {
        let report = render_report(&sample_org());
        let c5 = report.find("c5.xlarge").expect("c5 row");
        let t2 = report.find("t2.micro").expect("t2 row");
        assert!(c5 < t2);
    }

    #[test]
    fn test_empty_account_prints_placeholder() {
        let mut org = OrgInventory::new();
        org.absorb_account(AccountInventory::new(AccountId::new("111111111111")));
        org.finalize();
        let report = render_report(&org);

        assert!(report.contains("no instances or clusters found"));
        // Organization totals are equally empty
        assert!(report.contains("Grand total vCPUs (EC2 + ECS Fargate): 0"));
    }

    #[test]
    fn test_skipped_account_listed_and_org_summary_still_renders() {
        let mut org = sample_org();
        org.record_skip(AccountId::new("222222222222"), "AccessDenied");
        org.finalize();
        let report = render_report(&org);

        assert!(report.contains("Skipped accounts"));
        assert!(report.contains("222222222222: AccessDenied"));
        assert!(report.contains("Organization (1 accounts scanned, 1 skipped)"));
        assert!(report.contains("Grand total vCPUs (EC2 + ECS Fargate): 7"));
    }
}
