//! Filling and emptying the price slots of a merchant screen.

use crate::dispatch::ClickDispatcher;
use crate::transfer;
use stackshift_core::{ItemStack, SlotId};
use tracing::debug;

/// Scroll over the trade output.
///
/// Towards this inventory the price slots are filled for the selected offer,
/// one unit or whole stacks. Towards the other inventory the result is taken,
/// one set or shift-clicked, and an empty output sends the prices back.
pub fn scroll_merchant(d: &mut ClickDispatcher<'_>, slot: SlotId, to_other: bool, full_stacks: bool) -> bool {
    if !to_other {
        return fill_merchant_buy_slots(d, full_stacks);
    }

    let has_result = d.container().has_stack(slot);
    match (full_stacks, has_result) {
        (true, true) => transfer::move_stacks(d, slot, true, true, true, false),
        (true, false) => transfer::move_stacks(d, slot, false, true, false, false),
        (false, true) => transfer::move_one_set_to_player_inventory(d, slot),
        (false, false) => false,
    }
}

/// Put the selected offer's prices into the two price slots.
pub fn fill_merchant_buy_slots(d: &mut ClickDispatcher<'_>, fill_stacks: bool) -> bool {
    let Some(offer) = d.layout().selected_trade() else {
        debug!("no trade selected");
        return false;
    };
    let [first, second] = d.layout().merchant_buy_slots();

    let filled_first = fill_buy_slot(d, first, &offer.buy_first, fill_stacks);
    let filled_second = fill_buy_slot(d, second, &offer.buy_second, fill_stacks);
    filled_first || filled_second
}

fn fill_buy_slot(d: &mut ClickDispatcher<'_>, slot: SlotId, price: &ItemStack, fill_stacks: bool) -> bool {
    let current = d.container().stack(slot);
    if !current.is_empty() && !current.matches(price) {
        d.shift_click(slot);
    }
    if price.is_empty() {
        return false;
    }
    move_items_from_player_inventory(d, slot, price, fill_stacks)
}

/// Move items equal to `template` from the player inventory into `slot_to`:
/// as much as fits with `fill_stacks`, else a single unit.
pub fn move_items_from_player_inventory(
    d: &mut ClickDispatcher<'_>,
    slot_to: SlotId,
    template: &ItemStack,
    fill_stacks: bool,
) -> bool {
    let sources: Vec<SlotId> = d
        .container()
        .slots()
        .iter()
        .filter(|slot| slot.id != slot_to && slot.stack.matches(template))
        .map(|slot| slot.id)
        .filter(|&id| d.container().is_player_slot(id))
        .collect();

    let mut moved = false;
    for id in sources {
        if fill_stacks {
            if !transfer::click_to_move_items(d, id, slot_to) {
                break;
            }
            moved = true;
        } else {
            return transfer::click_to_move_single_item(d, id, slot_to);
        }
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::click::ClickOp;
    use crate::layout::Layout;
    use crate::predict::refresh_outputs;
    use stackshift_core::{Container, InventoryId, ItemId, Slot, SlotKind};
    use stackshift_storage::TradeOffer;

    const EMERALD: ItemId = ItemId(1);
    const BOOK: ItemId = ItemId(2);
    const DIRT: ItemId = ItemId(3);

    struct Librarian;

    impl Layout for Librarian {
        fn selected_trade(&self) -> Option<TradeOffer> {
            Some(TradeOffer::new(
                ItemStack::new(EMERALD, 5),
                ItemStack::empty(),
                ItemStack::with_max_stack(BOOK, 1, 1),
            ))
        }
    }

    fn merchant() -> Container {
        let mut slots = vec![
            Slot::new(0, InventoryId(0), 0, 136, 37),
            Slot::new(0, InventoryId(0), 1, 162, 37),
            Slot::new(0, InventoryId(0), 2, 220, 37).with_kind(SlotKind::TradeOutput),
        ];
        for index in 0..9 {
            slots.push(Slot::new(0, InventoryId(1), index, 108 + index as i32 * 18, 142));
        }
        Container::new(1, slots).with_player_inventory(InventoryId(1))
    }

    fn run<R>(container: &mut Container, f: impl FnOnce(&mut ClickDispatcher<'_>) -> R) -> R {
        refresh_outputs(container, &Librarian);
        let mut sent: Vec<ClickOp> = Vec::new();
        let mut dispatcher = ClickDispatcher::new(container, &Librarian, &mut sent);
        f(&mut dispatcher)
    }

    #[test]
    fn fill_price_with_stacks() {
        let mut container = merchant();
        container.set_stack(3, ItemStack::new(EMERALD, 40));
        container.set_stack(4, ItemStack::new(EMERALD, 40));
        assert!(run(&mut container, |d| scroll_merchant(d, 2, false, true)));

        assert_eq!(container.count(0), 64);
        assert_eq!(container.count(3) + container.count(4), 16);
        assert_eq!(container.stack(2).item, BOOK);
    }

    #[test]
    fn single_unit_fill_and_foreign_price_cleared() {
        let mut container = merchant();
        container.set_stack(0, ItemStack::new(DIRT, 3));
        container.set_stack(3, ItemStack::new(EMERALD, 40));
        run(&mut container, |d| scroll_merchant(d, 2, false, false));

        assert_eq!(container.stack(0).item, EMERALD);
        assert_eq!(container.count(0), 1);
        assert_eq!(container.count(3), 39);
        assert_eq!(container.stack(4).item, DIRT);
    }

    #[test]
    fn empty_output_returns_prices() {
        let mut container = merchant();
        container.set_stack(0, ItemStack::new(EMERALD, 2));
        run(&mut container, |d| scroll_merchant(d, 2, true, true));

        assert!(!container.has_stack(0));
        assert_eq!(container.count(3), 2);
    }

    #[test]
    fn one_set_takes_a_trade() {
        let mut container = merchant();
        container.set_stack(0, ItemStack::new(EMERALD, 12));
        run(&mut container, |d| scroll_merchant(d, 2, true, false));

        assert_eq!(container.stack(3).item, BOOK);
        assert_eq!(container.count(0), 7);
        assert_eq!(container.stack(2).item, BOOK);
    }
}
