//! Slots: addressable stack holders inside a container.

use crate::item::{ItemId, ItemStack};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Slot number, unique within its container and equal to its position in the
/// container's slot list.
pub type SlotId = usize;

/// Number of hot-bar slots at the start of the player inventory.
pub const HOTBAR_SIZE: usize = 9;

/// Player inventory index of the offhand-equivalent slot.
pub const OFFHAND_INDEX: usize = 40;

/// Identifies the inventory that owns a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InventoryId(pub u32);

impl fmt::Display for InventoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "inv{}", self.0)
    }
}

/// Behavioral class of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SlotKind {
    /// Regular storage: items can be inserted and taken.
    #[default]
    Storage,
    /// Crafting result: take-only, taking consumes the grid.
    CraftingOutput,
    /// Merchant trade result: take-only.
    TradeOutput,
    /// Display-only slot, neither insertable nor takeable.
    Locked,
}

/// One addressable holder of a stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Slot number within the container.
    pub id: SlotId,
    /// Owning inventory.
    pub inventory: InventoryId,
    /// Index within the owning inventory.
    pub index: usize,
    /// Screen x position (used for hit testing only).
    pub x: i32,
    /// Screen y position (used for vertical ordering).
    pub y: i32,
    /// Current contents.
    pub stack: ItemStack,
    /// Behavioral class.
    pub kind: SlotKind,
    /// If set, only these item types may be inserted.
    pub filter: Option<Vec<ItemId>>,
    /// Per-slot stack limit. Replaces the item's own limit, so bulk slots may
    /// hold over-sized stacks.
    pub limit: Option<u32>,
}

impl Slot {
    /// Create an empty storage slot.
    pub fn new(id: SlotId, inventory: InventoryId, index: usize, x: i32, y: i32) -> Self {
        Self {
            id,
            inventory,
            index,
            x,
            y,
            stack: ItemStack::empty(),
            kind: SlotKind::Storage,
            filter: None,
            limit: None,
        }
    }

    /// Builder: set the slot kind.
    pub fn with_kind(mut self, kind: SlotKind) -> Self {
        self.kind = kind;
        self
    }

    /// Builder: restrict insertable item types.
    pub fn with_filter(mut self, items: Vec<ItemId>) -> Self {
        self.filter = Some(items);
        self
    }

    /// Builder: set the per-slot stack size.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check whether the slot holds anything.
    pub fn has_stack(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Capability predicate: may `stack` be placed here?
    pub fn can_insert(&self, stack: &ItemStack) -> bool {
        if stack.is_empty() {
            return false;
        }
        match self.kind {
            SlotKind::Storage => self
                .filter
                .as_ref()
                .map_or(true, |items| items.contains(&stack.item)),
            SlotKind::CraftingOutput | SlotKind::TradeOutput | SlotKind::Locked => false,
        }
    }

    /// Capability predicate: may the actor take items from here?
    pub fn can_take(&self) -> bool {
        self.kind != SlotKind::Locked
    }

    /// Largest count of `stack` this slot will hold.
    pub fn max_stack_for(&self, stack: &ItemStack) -> u32 {
        let item_max = if stack.is_empty() {
            crate::item::DEFAULT_MAX_STACK
        } else {
            stack.max_stack
        };
        self.limit.unwrap_or(item_max)
    }

    /// Check if the slot is a take-only output.
    pub fn is_output(&self) -> bool {
        matches!(self.kind, SlotKind::CraftingOutput | SlotKind::TradeOutput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_predicates_follow_kind() {
        let iron = ItemStack::new(ItemId(1), 3);
        let storage = Slot::new(0, InventoryId(0), 0, 0, 0);
        assert!(storage.can_insert(&iron));
        assert!(storage.can_take());

        let output = storage.clone().with_kind(SlotKind::CraftingOutput);
        assert!(!output.can_insert(&iron));
        assert!(output.can_take());

        let locked = storage.clone().with_kind(SlotKind::Locked);
        assert!(!locked.can_insert(&iron));
        assert!(!locked.can_take());
    }

    #[test]
    fn filter_and_limit_apply() {
        let slot = Slot::new(0, InventoryId(0), 0, 0, 0)
            .with_filter(vec![ItemId(2)])
            .with_limit(1);
        assert!(!slot.can_insert(&ItemStack::new(ItemId(1), 1)));
        assert!(slot.can_insert(&ItemStack::new(ItemId(2), 1)));
        assert_eq!(slot.max_stack_for(&ItemStack::new(ItemId(2), 1)), 1);
        assert!(!slot.can_insert(&ItemStack::empty()));
    }
}
