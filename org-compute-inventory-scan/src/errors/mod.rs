//! Error handling module

use thiserror::Error;

/// Result type alias for operations that can fail with `InventoryError`
pub type InventoryResult<T> = std::result::Result<T, InventoryError>;

/// Fatal error type for the inventory run.
///
/// Only configuration-level problems surface through this type; per-account
/// and per-call failures are handled inside their enclosing loop iteration
/// and never reach it (they degrade to logged skips instead).
#[derive(Error, Debug)]
pub enum InventoryError {
    /// Configuration validation and setup errors
    #[error("Configuration error: {message}")]
    Configuration {
        /// Detailed error message about the configuration issue
        message: String,
        /// Optional underlying error that caused the configuration failure
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The organization listing succeeded but returned no ACTIVE accounts.
    ///
    /// An empty organization indicates a permission or configuration problem
    /// on the management identity, not a fleet with zero capacity.
    #[error("No active accounts found in the organization; check the management identity and its organizations:ListAccounts permission")]
    NoActiveAccounts,

    /// Organization-level AWS calls that must succeed before any account is
    /// processed (ListAccounts itself, management caller identity)
    #[error("Organization-level AWS call failed: {0}")]
    OrganizationCall(#[from] crate::aws::AwsError),
}

impl InventoryError {
    /// Create a configuration error
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

}
