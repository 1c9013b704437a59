//! Transfer backend that never leaves the process.

use async_trait::async_trait;
use client_blockchain_core::{TokenTransfer, TransferError, TransferRequest};

use crate::config::DryRunConfig;

/// Logs the payload a wallet bridge would receive, then settles after a
/// configurable delay.
#[derive(Clone, Debug)]
pub struct DryRunTransfer {
    config: DryRunConfig,
}

impl DryRunTransfer {
    pub fn new(config: DryRunConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl TokenTransfer for DryRunTransfer {
    async fn withdraw(&self, request: TransferRequest) -> Result<(), TransferError> {
        let payload = serde_json::to_string(&request)
            .map_err(|err| TransferError::Validation(err.to_string()))?;
        tracing::info!(%payload, "dry-run withdrawal");

        tokio::time::sleep(self.config.delay).await;

        if self.config.fail {
            tracing::warn!("dry-run backend configured to reject");
            return Err(TransferError::Rejected("dry-run rejection".into()));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}
