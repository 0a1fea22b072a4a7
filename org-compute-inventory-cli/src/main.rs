//! Command-line entry point for the organization compute inventory.
//!
//! Exit behavior: fatal configuration errors (bad role template, unreachable
//! management identity, zero active accounts) exit non-zero before any
//! account is processed. Per-account and per-region failures are logged
//! warnings and never change the exit status.

mod output;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use org_compute_inventory_scan::scan::{DEFAULT_ORG_REGION, DEFAULT_ROLE_NAME};
use org_compute_inventory_scan::{render_report, run_scan, ScanConfig};

#[derive(Parser, Debug)]
#[command(
    name = "org-compute-inventory",
    version,
    about = "Inventory running EC2 instances and ECS Fargate tasks across an AWS Organization"
)]
struct Cli {
    /// Named profile for organization-level calls (ListAccounts); the
    /// default credential chain is used when unset
    #[arg(long, env = "ORG_INVENTORY_ORG_PROFILE")]
    org_profile: Option<String>,

    /// Named profile used as the base identity for AssumeRole; falls back
    /// to --org-profile
    #[arg(long, env = "ORG_INVENTORY_ASSUME_PROFILE")]
    assume_profile: Option<String>,

    /// Region for organization-level API calls
    #[arg(long, env = "ORG_INVENTORY_ORG_REGION", default_value = DEFAULT_ORG_REGION)]
    org_region: String,

    /// Role assumed in each member account
    #[arg(long, default_value = DEFAULT_ROLE_NAME)]
    role_name: String,

    /// Full role ARN template with an {account_id} placeholder; overrides
    /// --role-name
    #[arg(long)]
    role_arn_template: Option<String>,

    /// How many accounts to scan concurrently
    #[arg(long, default_value_t = 4)]
    max_concurrent_accounts: usize,

    /// How many regions to scan concurrently within one account
    #[arg(long, default_value_t = 8)]
    max_concurrent_regions: usize,

    /// Timeout in seconds applied to every AWS call
    #[arg(long, default_value_t = 30)]
    call_timeout_secs: u64,

    /// Emit the inventories as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Pretty-print the JSON output
    #[arg(long, requires = "json")]
    pretty: bool,
}

impl Cli {
    fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            org_profile: self.org_profile.clone(),
            assume_profile: self.assume_profile.clone(),
            org_region: self.org_region.clone(),
            role_name: self.role_name.clone(),
            role_arn_template: self.role_arn_template.clone(),
            max_concurrent_accounts: self.max_concurrent_accounts,
            max_concurrent_regions: self.max_concurrent_regions,
            call_timeout: Duration::from_secs(self.call_timeout_secs),
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(Cli::parse()).await {
        output::fatal(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.scan_config();

    output::note("scanning organization, this may take a while");
    let org = run_scan(&config)
        .await
        .context("organization scan failed")?;

    if cli.json {
        output::output_json(&org, cli.pretty)?;
    } else {
        print!("{}", render_report(&org));
    }

    Ok(())
}
