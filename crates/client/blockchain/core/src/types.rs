//! Wire shape of the transfer call.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use withdraw_core::{Address, ContractId, FarmId, WithdrawalRequest};

/// Request passed to [`crate::TokenTransfer::withdraw`].
///
/// `ids` and `amounts` are parallel sequences: `amounts[i]` units of the item
/// with contract id `ids[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub farm_id: FarmId,
    pub amounts: Vec<Decimal>,
    pub ids: Vec<ContractId>,
    pub to: Address,
    pub tokens: Decimal,
}

impl From<&WithdrawalRequest> for TransferRequest {
    fn from(request: &WithdrawalRequest) -> Self {
        let (ids, amounts) = request
            .items()
            .iter()
            .map(|item| (item.contract_id, item.amount))
            .unzip();

        Self {
            farm_id: request.farm_id(),
            amounts,
            ids,
            to: request.destination().clone(),
            tokens: request.token_amount(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use withdraw_core::{BasketManager, InventorySnapshot, ItemId, ItemMetadata, StaticItemOracle};

    fn request() -> WithdrawalRequest {
        let inventory = InventorySnapshot::new([
            (ItemId::from("wood"), dec!(5)),
            (ItemId::from("stone"), dec!(2)),
        ])
        .unwrap();
        let mut manager = BasketManager::new(inventory, Address::from("0xABC"), dec!(10.5));
        manager.add(&ItemId::from("wood"));
        manager.add(&ItemId::from("wood"));
        manager.add(&ItemId::from("stone"));

        let oracle = StaticItemOracle::new([
            ItemMetadata::new(ItemId::from("wood"), ContractId(601)),
            ItemMetadata::new(ItemId::from("stone"), ContractId(602)),
        ]);
        WithdrawalRequest::build(&manager.snapshot(), FarmId(42), &oracle).unwrap()
    }

    #[test]
    fn splits_items_into_aligned_sequences() {
        let wire = TransferRequest::from(&request());

        assert_eq!(wire.ids, [ContractId(601), ContractId(602)]);
        assert_eq!(wire.amounts, [dec!(2), dec!(1)]);
        assert_eq!(wire.to, Address::from("0xABC"));
        assert_eq!(wire.tokens, dec!(10.5));
        assert_eq!(wire.farm_id, FarmId(42));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(TransferRequest::from(&request())).unwrap();

        assert_eq!(json["farmId"], 42);
        assert_eq!(json["ids"], serde_json::json!([601, 602]));
        assert_eq!(json["amounts"], serde_json::json!(["2", "1"]));
        assert_eq!(json["to"], "0xABC");
        assert_eq!(json["tokens"], "10.5");
    }
}
