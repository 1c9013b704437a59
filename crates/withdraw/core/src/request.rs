//! Conversion of a frozen basket into an exact withdrawal request.

use rust_decimal::Decimal;

use crate::basket::BasketSnapshot;
use crate::ids::{Address, ContractId, FarmId, ItemId};
use crate::metadata::ItemOracle;

/// Configuration problems detected before anything is sent.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("item {0} has no contract id in the item catalog")]
    UnknownItem(ItemId),
}

/// One withdrawn item type, as the transfer call expects it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WithdrawalItem {
    pub contract_id: ContractId,
    pub amount: Decimal,
}

/// Finalized withdrawal payload. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WithdrawalRequest {
    destination: Address,
    farm_id: FarmId,
    token_amount: Decimal,
    items: Vec<WithdrawalItem>,
}

impl WithdrawalRequest {
    /// Builds the request from `snapshot`, keeping basket order.
    ///
    /// Every basket entry must resolve to a contract id; the first unknown item
    /// aborts the build so a partial request is never produced. An empty
    /// basket with a zero token amount is still a well-formed request.
    pub fn build(
        snapshot: &BasketSnapshot,
        farm_id: FarmId,
        oracle: &dyn ItemOracle,
    ) -> Result<Self, RequestError> {
        let items = snapshot
            .entries()
            .iter()
            .map(|entry| {
                let contract_id = oracle
                    .contract_id(&entry.item)
                    .ok_or_else(|| RequestError::UnknownItem(entry.item.clone()))?;
                Ok(WithdrawalItem {
                    contract_id,
                    amount: Decimal::from(entry.quantity.get()),
                })
            })
            .collect::<Result<Vec<_>, RequestError>>()?;

        Ok(Self {
            destination: snapshot.destination().clone(),
            farm_id,
            token_amount: snapshot.token_amount(),
            items,
        })
    }

    pub fn destination(&self) -> &Address {
        &self.destination
    }

    pub fn farm_id(&self) -> FarmId {
        self.farm_id
    }

    pub fn token_amount(&self) -> Decimal {
        self.token_amount
    }

    pub fn items(&self) -> &[WithdrawalItem] {
        &self.items
    }

    /// Contract ids in basket order, index-aligned with [`Self::amounts`].
    pub fn ids(&self) -> Vec<ContractId> {
        self.items.iter().map(|item| item.contract_id).collect()
    }

    /// Amounts in basket order, index-aligned with [`Self::ids`].
    pub fn amounts(&self) -> Vec<Decimal> {
        self.items.iter().map(|item| item.amount).collect()
    }
}
