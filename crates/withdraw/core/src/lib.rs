//! Selection and accounting core for the withdrawal panel.
//!
//! `withdraw-core` keeps the pending withdrawal basket and the "remaining
//! available" view of the source inventory mutually consistent, and turns a
//! frozen basket into an exact [`WithdrawalRequest`]. Everything here is pure
//! and synchronous; the asynchronous submission lives in `withdraw-runtime`.
//!
//! All basket mutation flows through [`BasketManager`], which swaps whole
//! [`BasketState`] values instead of editing shared maps in place.
pub mod basket;
pub mod ids;
pub mod inventory;
pub mod metadata;
pub mod request;

pub use basket::{
    Basket, BasketEntry, BasketError, BasketManager, BasketOp, BasketSnapshot, BasketState,
    TOKEN_DISPLAY_DP, display_amount,
};
pub use ids::{Address, ContractId, FarmId, ItemId};
pub use inventory::{InventoryError, InventorySnapshot};
pub use metadata::{ItemMetadata, ItemOracle, StaticItemOracle};
pub use request::{RequestError, WithdrawalItem, WithdrawalRequest};

/// Re-exported so downstream crates agree on a single decimal type.
pub use rust_decimal::Decimal;
