//! Read-only inventory snapshot taken from the game state when the panel opens.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::ids::ItemId;

/// Errors raised while assembling an [`InventorySnapshot`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("item {item} has negative quantity {quantity}")]
    NegativeQuantity { item: ItemId, quantity: Decimal },
}

/// Item quantities owned by the farm at open time.
///
/// Quantities are decimals to match the token balance type, even though game
/// items are integer-valued in practice. Zero-quantity items are kept so that
/// display order stays stable, but they are never selectable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct InventorySnapshot {
    items: BTreeMap<ItemId, Decimal>,
}

impl InventorySnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a snapshot, rejecting negative quantities.
    ///
    /// Duplicate ids are merged by keeping the last quantity seen.
    pub fn new<I>(items: I) -> Result<Self, InventoryError>
    where
        I: IntoIterator<Item = (ItemId, Decimal)>,
    {
        let mut map = BTreeMap::new();
        for (item, quantity) in items {
            if quantity < Decimal::ZERO {
                return Err(InventoryError::NegativeQuantity { item, quantity });
            }
            map.insert(item, quantity);
        }
        Ok(Self { items: map })
    }

    /// Quantity owned, zero for unknown items.
    pub fn quantity(&self, item: &ItemId) -> Decimal {
        self.items.get(item).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn contains(&self, item: &ItemId) -> bool {
        self.items.contains_key(item)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, Decimal)> {
        self.items.iter().map(|(item, quantity)| (item, *quantity))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rejects_negative_quantities() {
        let err = InventorySnapshot::new([(ItemId::from("wood"), dec!(-1))]).unwrap_err();
        assert_eq!(
            err,
            InventoryError::NegativeQuantity {
                item: ItemId::from("wood"),
                quantity: dec!(-1),
            }
        );
    }

    #[test]
    fn unknown_items_read_as_zero() {
        let inventory = InventorySnapshot::new([(ItemId::from("wood"), dec!(5))]).unwrap();
        assert_eq!(inventory.quantity(&ItemId::from("wood")), dec!(5));
        assert_eq!(inventory.quantity(&ItemId::from("gold")), Decimal::ZERO);
        assert!(!inventory.contains(&ItemId::from("gold")));
    }
}
