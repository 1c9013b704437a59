//! Game-state fixture loader.
//!
//! Stands in for the live game container: the panel only ever reads a farm
//! id, a token balance, a wallet address and an inventory snapshot from it.

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use withdraw_core::{Address, FarmId, InventoryError, InventorySnapshot, ItemId};

use crate::loaders::{LoadResult, read_file};

/// Game-state structure for RON files.
///
/// Decimals may be written as strings (`"12.75"`) to keep full precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateRecord {
    pub farm_id: FarmId,
    pub balance: Decimal,
    pub address: Address,
    #[serde(default)]
    pub inventory: BTreeMap<ItemId, Decimal>,
}

impl GameStateRecord {
    pub fn inventory_snapshot(&self) -> Result<InventorySnapshot, InventoryError> {
        InventorySnapshot::new(
            self.inventory
                .iter()
                .map(|(item, quantity)| (item.clone(), *quantity)),
        )
    }
}

/// Loader for game-state fixtures from RON files.
pub struct GameStateLoader;

impl GameStateLoader {
    /// Load a game-state record, validating its inventory.
    pub fn load(path: &Path) -> LoadResult<GameStateRecord> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GameStateRecord> {
        let record: GameStateRecord = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse game state RON: {}", e))?;

        if record.balance < Decimal::ZERO {
            anyhow::bail!("Token balance must not be negative: {}", record.balance);
        }
        record.inventory_snapshot()?;

        Ok(record)
    }
}
