use std::time::Duration;

use aws_sdk_organizations::types::AccountStatus;
use aws_sdk_organizations::Client as OrganizationsClient;
use log::debug;

use crate::aws::{with_timeout, AwsError, AwsResult};
use crate::model::AccountId;

/// List the ACTIVE accounts in the organization by paginating ListAccounts.
///
/// Suspended and pending-closure accounts are dropped here; they are not
/// scannable and must not appear as zero rows in the report. The timeout
/// applies per page, not to the whole pagination.
pub async fn list_active_accounts(
    client: &OrganizationsClient,
    timeout: Duration,
) -> AwsResult<Vec<AccountId>> {
    let mut accounts = Vec::<AccountId>::new();
    let mut next_token: Option<String> = None;

    loop {
        let mut query = client.list_accounts();
        if let Some(token) = &next_token {
            query = query.next_token(token);
        }

        let out = with_timeout(timeout, async {
            query.send().await.map_err(|e| {
                AwsError::OrganizationsError(format!("Failed to call ListAccounts: {}", e))
            })
        })
        .await?;

        for account in out.accounts() {
            let active = matches!(account.status(), Some(AccountStatus::Active));
            match account.id() {
                Some(id) if active => accounts.push(AccountId::new(id)),
                Some(id) => debug!("Skipping non-active account {}", id),
                None => {}
            }
        }

        next_token = out.next_token().map(|s| s.to_string());
        if next_token.is_none() {
            break;
        }
    }

    debug!("Organization has {} active accounts", accounts.len());
    Ok(accounts)
}
