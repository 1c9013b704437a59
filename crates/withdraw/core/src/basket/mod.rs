//! Pending withdrawal basket and its remaining-inventory view.
//!
//! - [`Basket`]: insertion-ordered staged entries
//! - [`BasketState`]: immutable `(original, basket)` pair, remaining derived on read
//! - [`BasketManager`]: session owner that swaps states on each edit
//! - [`BasketSnapshot`]: frozen view handed to renderers and the request builder

mod entry;
mod manager;
mod state;

pub use entry::{Basket, BasketEntry};
pub use manager::{BasketError, BasketManager, BasketSnapshot, TOKEN_DISPLAY_DP, display_amount};
pub use state::{BasketOp, BasketState};
