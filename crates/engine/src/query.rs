//! Read-only slot selection over a mirrored container.

use stackshift_core::{Container, ItemStack, SlotId, Snapshot};

/// Slots whose stack matches `reference`, restricted to the inventory of
/// `slot_reference` (`same_inventory`) or to every other inventory.
///
/// With `prefer_partial`, stacks that still have room come first. With
/// `reverse`, slots are scanned from the highest id down.
pub fn matching_stacks(
    container: &Container,
    slot_reference: SlotId,
    reference: &ItemStack,
    same_inventory: bool,
    treat_hotbar_as_different: bool,
    prefer_partial: bool,
    reverse: bool,
) -> Vec<SlotId> {
    let mut partial = Vec::new();
    let mut rest = Vec::new();

    for id in scan_order(container, reverse) {
        let Some(slot) = container.slot(id) else {
            continue;
        };
        if container.same_inventory(id, slot_reference, treat_hotbar_as_different) != same_inventory
            || !slot.stack.matches(reference)
        {
            continue;
        }
        if prefer_partial && slot.stack.count < slot.max_stack_for(&slot.stack) {
            partial.push(id);
        } else {
            rest.push(id);
        }
    }

    partial.extend(rest);
    partial
}

/// Every slot of the container holding a stack equal to `reference`.
pub fn all_matching_stacks(container: &Container, reference: &ItemStack, prefer_partial: bool) -> Vec<SlotId> {
    let (mut partial, rest): (Vec<SlotId>, Vec<SlotId>) = container
        .slots()
        .iter()
        .filter(|slot| slot.stack.matches(reference))
        .map(|slot| slot.id)
        .partition(|&id| prefer_partial && !container.stack(id).is_full());
    partial.extend(rest);
    partial
}

/// Empty slots inside (`same_inventory`) or outside the inventory of
/// `slot_reference`.
pub fn empty_slots(
    container: &Container,
    slot_reference: SlotId,
    same_inventory: bool,
    treat_hotbar_as_different: bool,
    reverse: bool,
) -> Vec<SlotId> {
    scan_order(container, reverse)
        .filter(|&id| {
            !container.has_stack(id)
                && container.same_inventory(id, slot_reference, treat_hotbar_as_different)
                    == same_inventory
        })
        .collect()
}

/// Empty storage slots of the player inventory.
pub fn empty_player_slots(container: &Container, reverse: bool) -> Vec<SlotId> {
    scan_order(container, reverse)
        .filter(|&id| container.is_player_slot(id) && !container.has_stack(id))
        .filter(|&id| container.slot(id).is_some_and(|slot| !slot.is_output()))
        .collect()
}

/// Largest stack equal to `ingredient` outside the inventory of `grid_slot`.
/// Ties go to the lowest id.
pub fn largest_matching_elsewhere(container: &Container, grid_slot: SlotId, ingredient: &ItemStack) -> Option<SlotId> {
    let mut best: Option<(SlotId, u32)> = None;
    for slot in container.slots() {
        if !is_ingredient_source(container, slot.id, grid_slot, ingredient) {
            continue;
        }
        if best.map_or(true, |(_, count)| slot.stack.count > count) {
            best = Some((slot.id, slot.stack.count));
        }
    }
    best.map(|(id, _)| id)
}

/// Smallest stack outside the inventory of `grid_slot` that still holds at
/// least `needed` units of `ingredient`, else the largest one.
pub fn smallest_sufficient_elsewhere(
    container: &Container,
    grid_slot: SlotId,
    ingredient: &ItemStack,
    needed: u32,
) -> Option<SlotId> {
    let mut best: Option<(SlotId, u32)> = None;
    for slot in container.slots() {
        if !is_ingredient_source(container, slot.id, grid_slot, ingredient) {
            continue;
        }
        let count = slot.stack.count;
        if count < needed {
            continue;
        }
        if best.map_or(true, |(_, best_count)| count < best_count) {
            best = Some((slot.id, count));
        }
    }
    best.map(|(id, _)| id)
        .or_else(|| largest_matching_elsewhere(container, grid_slot, ingredient))
}

/// First slot whose contents show a single unit of `moved` arriving since
/// `before` was taken: it was empty and now holds the item, or it grew by
/// exactly one.
pub fn arrival_slot(before: &Snapshot, after: &Container, moved: &ItemStack) -> Option<SlotId> {
    before.iter().enumerate().find_map(|(id, old)| {
        let new = after.stack(id);
        let arrived = if old.is_empty() {
            new.matches(moved)
        } else {
            new.matches(old) && new.count == old.count + 1
        };
        arrived.then_some(id)
    })
}

fn is_ingredient_source(container: &Container, id: SlotId, grid_slot: SlotId, ingredient: &ItemStack) -> bool {
    container.slot(id).is_some_and(|slot| {
        !slot.is_output()
            && slot.can_take()
            && slot.stack.matches(ingredient)
            && !container.same_inventory(id, grid_slot, false)
    })
}

fn scan_order(container: &Container, reverse: bool) -> Box<dyn Iterator<Item = SlotId>> {
    let len = container.len();
    if reverse {
        Box::new((0..len).rev())
    } else {
        Box::new(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackshift_core::{InventoryId, ItemId, Slot};

    const IRON: ItemId = ItemId(1);

    fn container() -> Container {
        let mut slots = Vec::new();
        for index in 0..3 {
            slots.push(Slot::new(0, InventoryId(0), index, 8 + index as i32 * 18, 18));
        }
        for index in 0..3 {
            slots.push(Slot::new(0, InventoryId(1), index, 8 + index as i32 * 18, 84));
        }
        Container::new(1, slots).with_player_inventory(InventoryId(1))
    }

    #[test]
    fn partial_stacks_are_preferred() {
        let mut container = container();
        container.set_stack(3, ItemStack::new(IRON, 64));
        container.set_stack(4, ItemStack::new(IRON, 10));
        container.set_stack(1, ItemStack::new(IRON, 10));

        let found = matching_stacks(&container, 0, &ItemStack::new(IRON, 1), false, false, true, false);
        assert_eq!(found, vec![4, 3]);
        let same = matching_stacks(&container, 0, &ItemStack::new(IRON, 1), true, false, false, false);
        assert_eq!(same, vec![1]);
    }

    #[test]
    fn empty_slots_by_side() {
        let mut container = container();
        container.set_stack(4, ItemStack::new(IRON, 1));
        assert_eq!(empty_slots(&container, 0, false, false, false), vec![3, 5]);
        assert_eq!(empty_slots(&container, 0, false, false, true), vec![5, 3]);
        assert_eq!(empty_player_slots(&container, false), vec![3, 5]);
    }

    #[test]
    fn sufficient_stack_beats_largest() {
        let mut container = container();
        container.set_stack(3, ItemStack::new(IRON, 40));
        container.set_stack(4, ItemStack::new(IRON, 5));
        container.set_stack(5, ItemStack::new(IRON, 2));

        assert_eq!(largest_matching_elsewhere(&container, 0, &ItemStack::new(IRON, 1)), Some(3));
        assert_eq!(smallest_sufficient_elsewhere(&container, 0, &ItemStack::new(IRON, 1), 4), Some(4));
        assert_eq!(smallest_sufficient_elsewhere(&container, 0, &ItemStack::new(IRON, 1), 50), Some(3));
    }

    #[test]
    fn arrival_detects_new_and_grown_slots() {
        let mut container = container();
        container.set_stack(4, ItemStack::new(IRON, 3));
        let before = container.snapshot();

        container.set_stack(4, ItemStack::new(IRON, 4));
        assert_eq!(arrival_slot(&before, &container, &ItemStack::new(IRON, 1)), Some(4));

        container.set_stack(4, ItemStack::new(IRON, 3));
        container.set_stack(5, ItemStack::new(IRON, 1));
        assert_eq!(arrival_slot(&before, &container, &ItemStack::new(IRON, 1)), Some(5));
    }
}
