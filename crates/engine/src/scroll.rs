//! The scroll-wheel entry point.

use crate::config::EngineConfig;
use crate::dispatch::ClickDispatcher;
use crate::{crafting, merchant, transfer};
use serde::{Deserialize, Serialize};
use stackshift_core::{Container, SlotId, SlotKind};
use stackshift_storage::RecipePattern;
use tracing::debug;

/// Modifier keys held while scrolling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollModifiers {
    pub everything: bool,
    pub matching: bool,
    pub stacks: bool,
}

impl ScrollModifiers {
    pub fn non_single(&self) -> bool {
        self.everything || self.matching || self.stacks
    }
}

/// Whether a scroll over `slot` moves items to the other inventory.
///
/// Position awareness is applied first: scrolling up moves towards the
/// other inventory only when one sits above the slot. The reverse toggles
/// then flip the result.
pub fn resolve_direction(
    container: &Container,
    slot: SlotId,
    scrolling_up: bool,
    non_single: bool,
    config: &EngineConfig,
) -> bool {
    let mut to_other = scrolling_up;
    if config.slot_position_aware_scroll_direction {
        to_other = container.inventory_exists_above(slot) == scrolling_up;
    }
    let reverse = if non_single {
        config.reverse_scroll_direction_stacks
    } else {
        config.reverse_scroll_direction_single
    };
    to_other != reverse
}

/// Handle one scroll step over `slot`.
pub fn try_move_items(
    d: &mut ClickDispatcher<'_>,
    config: &EngineConfig,
    recipe: &RecipePattern,
    slot: Option<SlotId>,
    scrolling_up: bool,
    modifiers: ScrollModifiers,
) -> bool {
    let Some(slot) = slot else {
        return false;
    };
    if !d.cursor().is_empty() {
        return false;
    }
    let container = d.container();
    let Some(hovered) = container.slot(slot) else {
        return false;
    };

    let villager = config.scroll_villager
        && hovered.kind == SlotKind::TradeOutput
        && d.layout().selected_trade().is_some();
    let crafting = config.crafting_features && d.layout().is_crafting_slot(container, slot);
    let non_single = modifiers.non_single();
    let to_other = resolve_direction(container, slot, scrolling_up, non_single, config);

    if !crafting && !villager && (!hovered.has_stack() || !hovered.can_take()) {
        return false;
    }
    debug!(slot, to_other, ?modifiers, crafting, villager, "scroll");

    if crafting {
        return crafting::scroll_crafting(d, recipe, slot, to_other, modifiers.stacks, modifiers.everything);
    }
    if villager {
        return merchant::scroll_merchant(d, slot, to_other, modifiers.stacks);
    }

    if (!non_single && !config.scroll_single)
        || (modifiers.stacks && !config.scroll_stacks)
        || (modifiers.matching && !config.scroll_matching)
        || (modifiers.everything && !config.scroll_everything)
    {
        return false;
    }

    let fallback = config.scroll_stacks_fallback;
    if modifiers.everything {
        transfer::move_stacks(d, slot, false, to_other, false, fallback)
    } else if modifiers.matching {
        transfer::move_stacks(d, slot, true, to_other, false, fallback);
        true
    } else if modifiers.stacks {
        transfer::move_stacks(d, slot, true, to_other, true, fallback)
    } else if to_other {
        transfer::move_single_item_to_other_inventory(d, slot)
    } else {
        transfer::move_single_item_to_this_inventory(d, slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::click::ClickOp;
    use crate::layout::PlainLayout;
    use stackshift_core::{InventoryId, ItemId, ItemStack, Slot};

    const IRON: ItemId = ItemId(1);

    fn chest_over_player() -> Container {
        let mut slots = Vec::new();
        for index in 0..9 {
            slots.push(Slot::new(0, InventoryId(0), index, 8 + index as i32 * 18, 18));
        }
        for index in 0..9 {
            slots.push(Slot::new(0, InventoryId(1), index, 8 + index as i32 * 18, 142));
        }
        Container::new(1, slots).with_player_inventory(InventoryId(1))
    }

    fn scroll(container: &mut Container, config: &EngineConfig, slot: SlotId, up: bool, modifiers: ScrollModifiers) -> bool {
        let mut sent: Vec<ClickOp> = Vec::new();
        let mut d = ClickDispatcher::new(container, &PlainLayout, &mut sent);
        try_move_items(&mut d, config, &RecipePattern::new(), Some(slot), up, modifiers)
    }

    #[test]
    fn direction_precedence() {
        let container = chest_over_player();
        let mut config = EngineConfig::default();
        assert!(resolve_direction(&container, 9, true, false, &config));

        config.slot_position_aware_scroll_direction = true;
        assert!(resolve_direction(&container, 9, true, false, &config));
        assert!(!resolve_direction(&container, 0, true, false, &config));

        config.reverse_scroll_direction_single = true;
        assert!(resolve_direction(&container, 0, true, false, &config));
        assert!(!resolve_direction(&container, 0, true, true, &config));
    }

    #[test]
    fn single_scroll_both_ways() {
        let mut container = chest_over_player();
        container.set_stack(0, ItemStack::new(IRON, 5));
        let config = EngineConfig::default();

        assert!(scroll(&mut container, &config, 0, true, ScrollModifiers::default()));
        assert_eq!(container.count(0), 4);
        assert_eq!(container.count(9), 1);

        assert!(scroll(&mut container, &config, 0, false, ScrollModifiers::default()));
        assert_eq!(container.count(0), 5);
        assert!(!container.has_stack(9));
    }

    #[test]
    fn disabled_toggle_blocks_scroll() {
        let mut container = chest_over_player();
        container.set_stack(0, ItemStack::new(IRON, 5));
        let config = EngineConfig {
            scroll_single: false,
            ..EngineConfig::default()
        };
        assert!(!scroll(&mut container, &config, 0, true, ScrollModifiers::default()));
        assert_eq!(container.count(0), 5);
    }

    #[test]
    fn everything_moves_all_stacks() {
        let mut container = chest_over_player();
        container.set_stack(0, ItemStack::new(IRON, 5));
        container.set_stack(4, ItemStack::new(ItemId(2), 5));
        let modifiers = ScrollModifiers {
            everything: true,
            ..ScrollModifiers::default()
        };
        assert!(scroll(&mut container, &EngineConfig::default(), 0, true, modifiers));
        assert!((0..9).all(|id| !container.has_stack(id)));
        assert_eq!(container.total_units(), 10);
    }

    #[test]
    fn empty_slot_is_ignored() {
        let mut container = chest_over_player();
        assert!(!scroll(&mut container, &EngineConfig::default(), 3, true, ScrollModifiers::default()));
    }
}
