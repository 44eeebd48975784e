//! Container model: the ordered slot list of one on-screen session plus the
//! cursor holder.
//!
//! The container is a *mirror* of state owned by a remote peer. Writes go
//! through [`Container::set_stack`] / [`Container::set_cursor`], which only the
//! operation dispatcher (and test fixtures building an initial state) call.

use crate::item::ItemStack;
use crate::slot::{InventoryId, Slot, SlotId, HOTBAR_SIZE, OFFHAND_INDEX};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Inclusive range of slot ids forming a crafting grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRange {
    /// First slot id in the grid.
    pub first: SlotId,
    /// Last slot id in the grid (inclusive).
    pub last: SlotId,
}

impl SlotRange {
    /// Create a range from its first and last slot ids.
    pub fn new(first: SlotId, last: SlotId) -> Self {
        debug_assert!(first <= last, "slot range must not be reversed");
        Self { first, last }
    }

    /// Create a range of `count` slots starting at `first`.
    pub fn from_count(first: SlotId, count: usize) -> Self {
        Self::new(first, first + count.max(1) - 1)
    }

    /// Number of slots in the range.
    pub fn count(&self) -> usize {
        self.last - self.first + 1
    }

    /// Check whether `slot` lies inside the range.
    pub fn contains(&self, slot: SlotId) -> bool {
        (self.first..=self.last).contains(&slot)
    }

    /// Iterate over the slot ids of the range.
    pub fn iter(&self) -> impl Iterator<Item = SlotId> {
        self.first..=self.last
    }
}

/// Copy of every slot's stack, indexed by slot id.
pub type Snapshot = Vec<ItemStack>;

/// The full ordered set of slots visible in one on-screen session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    sync_id: u32,
    generation: u64,
    slots: Vec<Slot>,
    cursor: ItemStack,
    player_inventory: Option<InventoryId>,
}

impl Container {
    /// Create a container from its slots. Slot ids are renumbered to match
    /// their position in the list.
    pub fn new(sync_id: u32, slots: Vec<Slot>) -> Self {
        let slots = slots
            .into_iter()
            .enumerate()
            .map(|(id, mut slot)| {
                slot.id = id;
                slot
            })
            .collect();
        Self {
            sync_id,
            generation: 0,
            slots,
            cursor: ItemStack::empty(),
            player_inventory: None,
        }
    }

    /// Builder: mark which inventory is the player's own.
    pub fn with_player_inventory(mut self, inventory: InventoryId) -> Self {
        self.player_inventory = Some(inventory);
        self
    }

    /// Window id shared with the peer.
    pub fn sync_id(&self) -> u32 {
        self.sync_id
    }

    /// Layout generation. Bumped whenever the displayed layout changes so that
    /// remembered slot references can be invalidated.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Advance the layout generation.
    pub fn bump_generation(&mut self) {
        self.generation += 1;
    }

    /// The player inventory, if this screen shows one.
    pub fn player_inventory(&self) -> Option<InventoryId> {
        self.player_inventory
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the container has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All slots in id order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Get a slot by id.
    pub fn slot(&self, id: SlotId) -> Option<&Slot> {
        self.slots.get(id)
    }

    /// Stack in a slot (empty for unknown ids).
    pub fn stack(&self, id: SlotId) -> ItemStack {
        self.slots
            .get(id)
            .map(|slot| slot.stack.clone())
            .unwrap_or_default()
    }

    /// Count in a slot (zero for unknown ids or empty slots).
    pub fn count(&self, id: SlotId) -> u32 {
        self.slots.get(id).map_or(0, |slot| slot.stack.size())
    }

    /// Check whether a slot holds anything.
    pub fn has_stack(&self, id: SlotId) -> bool {
        self.count(id) > 0
    }

    /// Current cursor contents.
    pub fn cursor(&self) -> &ItemStack {
        &self.cursor
    }

    /// Mirror write: replace a slot's stack. Unknown ids are ignored.
    pub fn set_stack(&mut self, id: SlotId, stack: ItemStack) {
        if let Some(slot) = self.slots.get_mut(id) {
            slot.stack = normalize(stack);
        }
    }

    /// Mirror write: replace the cursor contents.
    pub fn set_cursor(&mut self, stack: ItemStack) {
        self.cursor = normalize(stack);
    }

    /// "Same inventory" partitioning predicate.
    ///
    /// With `treat_hotbar_as_different`, player inventory hot-bar slots form a
    /// separate pseudo-inventory from the main grid; the offhand slot is never
    /// split out.
    pub fn same_inventory(&self, a: SlotId, b: SlotId, treat_hotbar_as_different: bool) -> bool {
        let (Some(slot_a), Some(slot_b)) = (self.slot(a), self.slot(b)) else {
            return false;
        };
        if slot_a.inventory != slot_b.inventory {
            return false;
        }
        if treat_hotbar_as_different && Some(slot_a.inventory) == self.player_inventory {
            let (index_a, index_b) = (slot_a.index, slot_b.index);
            return index_a == OFFHAND_INDEX
                || index_b == OFFHAND_INDEX
                || (index_a < HOTBAR_SIZE) == (index_b < HOTBAR_SIZE);
        }
        true
    }

    /// Check if slot `id` belongs to the player inventory.
    pub fn is_player_slot(&self, id: SlotId) -> bool {
        self.player_inventory.is_some()
            && self.slot(id).map(|slot| slot.inventory) == self.player_inventory
    }

    /// Checks if any slot of another inventory sits above `id` on screen.
    pub fn inventory_exists_above(&self, id: SlotId) -> bool {
        let Some(slot) = self.slot(id) else {
            return false;
        };
        self.slots
            .iter()
            .any(|other| other.y < slot.y && other.inventory != slot.inventory)
    }

    /// Container slot id of player hot-bar entry `button` (0-8) or the offhand
    /// (40).
    pub fn hotbar_slot(&self, button: usize) -> Option<SlotId> {
        let player = self.player_inventory?;
        self.slots
            .iter()
            .find(|slot| slot.inventory == player && slot.index == button)
            .map(|slot| slot.id)
    }

    /// Copy every slot's stack.
    pub fn snapshot(&self) -> Snapshot {
        self.slots.iter().map(|slot| slot.stack.clone()).collect()
    }

    /// Restore stacks from a snapshot, rewriting only slots that differ.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        for (id, original) in snapshot.iter().enumerate() {
            if let Some(slot) = self.slots.get_mut(id) {
                if !slot.stack.matches_exactly(original)
                    && !(slot.stack.is_empty() && original.is_empty())
                {
                    slot.stack = original.clone();
                }
            }
        }
    }

    /// Vertical ordering of two slots.
    ///
    /// `top_to_bottom` sorts ascending by y with same-row ties by ascending id;
    /// otherwise descending by y with ties by descending id.
    pub fn vertical_order(&self, a: SlotId, b: SlotId, top_to_bottom: bool) -> Ordering {
        let (Some(slot_a), Some(slot_b)) = (self.slot(a), self.slot(b)) else {
            return a.cmp(&b);
        };
        let ordering = slot_a.y.cmp(&slot_b.y).then(slot_a.id.cmp(&slot_b.id));
        if top_to_bottom {
            ordering
        } else {
            ordering.reverse()
        }
    }

    /// Total units of all slots plus the cursor.
    pub fn total_units(&self) -> u64 {
        self.slots
            .iter()
            .map(|slot| u64::from(slot.stack.size()))
            .sum::<u64>()
            + u64::from(self.cursor.size())
    }
}

fn normalize(stack: ItemStack) -> ItemStack {
    if stack.is_empty() {
        ItemStack::empty()
    } else {
        stack
    }
}
