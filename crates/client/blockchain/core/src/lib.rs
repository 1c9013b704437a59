//! Transfer abstraction for the withdrawal panel.
//!
//! The on-chain withdrawal call is a black box: this crate fixes only its
//! request/response contract so that the submission controller can be driven
//! by any backend (wallet bridge, dry run, in-memory mock).
//!
//! # Architecture
//!
//! ```text
//! WithdrawalRequest (withdraw-core, domain)
//!        │  From<&WithdrawalRequest>
//!        ▼
//! TransferRequest   (wire shape: farmId, amounts, ids, to, tokens)
//!        │
//!        ▼
//! TokenTransfer::withdraw  ──►  Ok(()) | Err(TransferError)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use client_blockchain_core::{TokenTransfer, TransferRequest};
//!
//! async fn send(transfer: &dyn TokenTransfer, request: &WithdrawalRequest) {
//!     transfer.withdraw(TransferRequest::from(request)).await?;
//! }
//! ```
//!
//! Remote idempotency is not guaranteed: callers must not submit the same
//! request twice concurrently.

pub mod traits;
pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use traits::{TokenTransfer, TransferError};
pub use types::TransferRequest;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockTransfer;
