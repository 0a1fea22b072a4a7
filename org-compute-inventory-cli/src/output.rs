use anyhow::{Context, Result};
use log::debug;
use org_compute_inventory_scan::OrgInventory;
use std::io::{self, Write};

pub(crate) fn note(msg: &str) {
    let _ = writeln!(io::stderr(), "org-compute-inventory: {}", msg);
}

pub(crate) fn fatal(msg: &str) {
    let _ = writeln!(io::stderr(), "org-compute-inventory (fatal): {}", msg);
}

/// Output the inventories as JSON to stdout
pub(crate) fn output_json(org: &OrgInventory, pretty: bool) -> Result<()> {
    debug!("Formatting inventory output as JSON (pretty: {})", pretty);

    let json_output = if pretty {
        serde_json::to_string_pretty(org).context("Failed to serialize inventory to pretty JSON")?
    } else {
        serde_json::to_string(org).context("Failed to serialize inventory to JSON")?
    };

    // Output to stdout (not using println! to avoid extra newline in compact mode)
    print!("{}", json_output);
    if pretty {
        println!();
    }

    Ok(())
}
