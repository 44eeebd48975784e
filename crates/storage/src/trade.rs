//! Merchant trades and their item-type signatures.

use serde::{Deserialize, Serialize};
use stackshift_core::{ItemId, ItemRegistry, ItemStack};

/// One offer as displayed by a merchant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TradeOffer {
    /// First price stack.
    pub buy_first: ItemStack,
    /// Optional second price stack (empty when unused).
    pub buy_second: ItemStack,
    /// What the trade sells.
    pub sell: ItemStack,
}

impl TradeOffer {
    /// Create an offer.
    pub fn new(buy_first: ItemStack, buy_second: ItemStack, sell: ItemStack) -> Self {
        Self {
            buy_first,
            buy_second,
            sell,
        }
    }

    /// Non-empty price stacks, first price first.
    pub fn prices(&self) -> impl Iterator<Item = &ItemStack> {
        [&self.buy_first, &self.buy_second]
            .into_iter()
            .filter(|stack| !stack.is_empty())
    }
}

/// Item-type signature of a trade, used to recognize a favorite trade across
/// merchants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TradeType {
    /// First price item.
    pub buy_first: ItemId,
    /// Second price item ([`ItemId::NONE`] when unused).
    pub buy_second: ItemId,
    /// Sold item.
    pub sell: ItemId,
}

/// Persisted form of a [`TradeType`]: item names instead of runtime ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeTypeRecord {
    /// First price item name.
    pub buy_first: String,
    /// Second price item name.
    pub buy_second: String,
    /// Sold item name.
    pub sell: String,
}

const UNKNOWN_ITEM_NAME: &str = "?";

impl TradeType {
    /// Signature of an offer.
    pub fn of(offer: &TradeOffer) -> Self {
        Self {
            buy_first: item_of(&offer.buy_first),
            buy_second: item_of(&offer.buy_second),
            sell: item_of(&offer.sell),
        }
    }

    /// Check whether `offer` has this signature.
    pub fn matches(&self, offer: &TradeOffer) -> bool {
        *self == Self::of(offer)
    }

    /// Convert to the by-name form.
    pub fn to_record(&self, registry: &ItemRegistry) -> TradeTypeRecord {
        let name = |id: ItemId| {
            registry
                .key_of(id)
                .map(|key| key.to_string())
                .unwrap_or_else(|| UNKNOWN_ITEM_NAME.to_string())
        };
        TradeTypeRecord {
            buy_first: name(self.buy_first),
            buy_second: name(self.buy_second),
            sell: name(self.sell),
        }
    }

    /// Resolve a by-name record. Unknown names become [`ItemId::NONE`]; a record
    /// in which no name resolves is dropped.
    pub fn from_record(record: &TradeTypeRecord, registry: &ItemRegistry) -> Option<Self> {
        let resolve = |name: &str| registry.resolve(name).unwrap_or(ItemId::NONE);
        let trade = Self {
            buy_first: resolve(&record.buy_first),
            buy_second: resolve(&record.buy_second),
            sell: resolve(&record.sell),
        };
        (trade.buy_first != ItemId::NONE
            || trade.buy_second != ItemId::NONE
            || trade.sell != ItemId::NONE)
            .then_some(trade)
    }
}

fn item_of(stack: &ItemStack) -> ItemId {
    if stack.is_empty() {
        ItemId::NONE
    } else {
        stack.item
    }
}
