//! Data-driven content for the withdrawal panel.
//!
//! Provides RON loaders for:
//! - Item catalogs (item name -> contract id, display image)
//! - Game-state fixtures (farm id, token balance, wallet address, inventory)
//!
//! Content feeds the item oracle and game-state provider; it is never written
//! back by the panel.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{GameStateLoader, GameStateRecord, ItemCatalog, ItemLoader, LoadResult};
