//! AWS SDK integration: credential chaining, account enumeration, collectors.

/// ec2 region listing and running-instance collection
pub mod ec2;

/// ecs cluster and fargate task collection
pub mod ecs;

/// organizations account listing
pub mod organizations;

/// region listing
pub mod regions;

/// sts calls and assume-role config
pub mod sts;

use thiserror::Error;

#[derive(Error, Debug)]
/// AWS Errors from AWS SDK calls
pub enum AwsError {
    #[error("AWS configuration error: {0}")]
    /// config error
    ConfigError(String),
    #[error("Organizations error: {0}")]
    /// errors from calls to AWS Organizations
    OrganizationsError(String),
    #[error("AssumeRole error for account {account_id}: {message}")]
    /// role assumption failures; the caller treats these as a per-account skip
    AssumeRoleError {
        /// target account
        account_id: String,
        /// failure detail
        message: String,
    },
    #[error("AWS SDK error: {0}")]
    /// errors from SDK output
    SdkError(String),
    #[error("Call timed out after {0:?}")]
    /// an external call exceeded the per-call timeout
    Timeout(std::time::Duration),
}

/// Type of AWS Result extending Result
pub type AwsResult<T> = Result<T, AwsError>;

/// Wrap a single external call in the per-call timeout.
///
/// The limit applies to one `send()`, not to a whole pagination loop, so a
/// slow page costs only that page's contribution.
pub(crate) async fn with_timeout<T, F>(limit: std::time::Duration, fut: F) -> AwsResult<T>
where
    F: std::future::Future<Output = AwsResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(AwsError::Timeout(limit)),
    }
}
