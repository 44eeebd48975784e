//! Layout boundary: screen-specific knowledge the host provides.

use stackshift_core::{Container, ItemStack, SlotId, SlotKind, SlotRange};
use stackshift_storage::TradeOffer;

/// Side length of a slot's hit box in screen units.
pub const SLOT_SIZE: i32 = 16;

/// What the engine needs to know about the screen that is showing a
/// container. Every method has a default suitable for a plain chest-like
/// screen without crafting or trading.
pub trait Layout {
    /// Grid range fed by crafting output `slot`, or `None` if `slot` is not a
    /// crafting output.
    fn crafting_grid(&self, _container: &Container, _slot: SlotId) -> Option<SlotRange> {
        None
    }

    /// First crafting output slot of the screen.
    fn first_crafting_output(&self, container: &Container) -> Option<SlotId> {
        container
            .slots()
            .iter()
            .find(|slot| {
                slot.kind == SlotKind::CraftingOutput
                    && self.crafting_grid(container, slot.id).is_some()
            })
            .map(|slot| slot.id)
    }

    /// Slots a quick-transfer from `from` tries, in order.
    ///
    /// Defaults to every storage slot of the other inventories in index
    /// order. Results taken from an output only go to the player inventory.
    fn quick_move_targets(&self, container: &Container, from: SlotId) -> Vec<SlotId> {
        let Some(source) = container.slot(from) else {
            return Vec::new();
        };
        let player = container.player_inventory();
        container
            .slots()
            .iter()
            .filter(|slot| slot.inventory != source.inventory && slot.kind == SlotKind::Storage)
            .filter(|slot| !source.is_output() || player.map_or(true, |player| slot.inventory == player))
            .map(|slot| slot.id)
            .collect()
    }

    /// Result the peer computes for the current contents of `range`.
    fn craft_result(&self, _container: &Container, _range: SlotRange) -> ItemStack {
        ItemStack::empty()
    }

    /// Slot under screen position `(x, y)`.
    fn slot_at(&self, container: &Container, x: i32, y: i32) -> Option<SlotId> {
        container
            .slots()
            .iter()
            .find(|slot| {
                (slot.x..slot.x + SLOT_SIZE).contains(&x) && (slot.y..slot.y + SLOT_SIZE).contains(&y)
            })
            .map(|slot| slot.id)
    }

    /// Whether the hot-bar counts as its own inventory on this screen.
    fn treat_hotbar_as_different(&self) -> bool {
        false
    }

    /// Offer currently selected on a merchant screen.
    fn selected_trade(&self) -> Option<TradeOffer> {
        None
    }

    /// The two merchant price slots.
    fn merchant_buy_slots(&self) -> [SlotId; 2] {
        [0, 1]
    }

    /// Check if `slot` is the crafting output of a known grid.
    fn is_crafting_slot(&self, container: &Container, slot: SlotId) -> bool {
        self.crafting_grid(container, slot).is_some()
    }
}

/// Plain screen with no crafting grid and no merchant.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainLayout;

impl Layout for PlainLayout {}

#[cfg(test)]
mod tests {
    use super::*;
    use stackshift_core::{InventoryId, Slot};

    fn chest() -> Container {
        let slots = vec![
            Slot::new(0, InventoryId(0), 0, 8, 18),
            Slot::new(0, InventoryId(0), 1, 26, 18),
            Slot::new(0, InventoryId(1), 0, 8, 84),
            Slot::new(0, InventoryId(1), 1, 26, 84).with_kind(SlotKind::Locked),
        ];
        Container::new(1, slots).with_player_inventory(InventoryId(1))
    }

    #[test]
    fn default_quick_move_targets_other_inventory() {
        let container = chest();
        assert_eq!(PlainLayout.quick_move_targets(&container, 0), vec![2]);
        assert_eq!(PlainLayout.quick_move_targets(&container, 2), vec![0, 1]);
    }

    #[test]
    fn hit_test_uses_slot_box() {
        let container = chest();
        assert_eq!(PlainLayout.slot_at(&container, 8, 18), Some(0));
        assert_eq!(PlainLayout.slot_at(&container, 23, 33), Some(0));
        assert_eq!(PlainLayout.slot_at(&container, 24, 18), None);
        assert_eq!(PlainLayout.slot_at(&container, 30, 90), Some(3));
    }

    #[test]
    fn plain_layout_has_no_crafting() {
        let container = chest();
        assert_eq!(PlainLayout.first_crafting_output(&container), None);
        assert!(!PlainLayout.is_crafting_slot(&container, 0));
    }
}
