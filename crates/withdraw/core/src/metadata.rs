//! Item metadata lookup used to resolve on-chain contract ids.

use std::collections::BTreeMap;

use crate::ids::{ContractId, ItemId};

/// Read-only item catalog.
///
/// The request builder only needs [`ItemMetadata::contract_id`]; the image is
/// carried for renderers.
pub trait ItemOracle: Send + Sync {
    fn metadata(&self, item: &ItemId) -> Option<ItemMetadata>;

    fn contract_id(&self, item: &ItemId) -> Option<ContractId> {
        self.metadata(item).map(|meta| meta.contract_id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemMetadata {
    pub item: ItemId,
    pub contract_id: ContractId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub image: Option<String>,
}

impl ItemMetadata {
    pub fn new(item: ItemId, contract_id: ContractId) -> Self {
        Self {
            item,
            contract_id,
            image: None,
        }
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// In-memory catalog keyed by item id.
#[derive(Clone, Debug, Default)]
pub struct StaticItemOracle {
    items: BTreeMap<ItemId, ItemMetadata>,
}

impl StaticItemOracle {
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator<Item = ItemMetadata>,
    {
        Self {
            items: items
                .into_iter()
                .map(|meta| (meta.item.clone(), meta))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ItemOracle for StaticItemOracle {
    fn metadata(&self, item: &ItemId) -> Option<ItemMetadata> {
        self.items.get(item).cloned()
    }
}
