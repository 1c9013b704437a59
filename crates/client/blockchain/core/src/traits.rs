//! Transfer operation trait and its error type.

use async_trait::async_trait;

use crate::types::TransferRequest;

// ============================================================================
// Error Types
// ============================================================================

/// Failures reported by a transfer backend.
///
/// The submission controller does not branch on the variant; it keeps the
/// rendered message as an opaque failure reason.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Transaction rejected: {0}")]
    Rejected(String),

    #[error("Remote validation failed: {0}")]
    Validation(String),

    #[error("Backend-specific error: {0}")]
    Backend(String),
}

// ============================================================================
// Transfer Operation
// ============================================================================

/// Irreversible withdrawal of items and tokens to an external account.
///
/// A call either settles completely or fails as a whole; atomicity of the
/// on-chain transfer is the backend's responsibility.
#[async_trait]
pub trait TokenTransfer: Send + Sync {
    /// Submit a withdrawal and wait for its settlement.
    ///
    /// There is no timeout and no cancellation: the future resolves only when
    /// the backend reports success or failure.
    async fn withdraw(&self, request: TransferRequest) -> Result<(), TransferError>;

    /// Backend name for logs (e.g. "dry-run", "mock").
    fn name(&self) -> &str;
}
