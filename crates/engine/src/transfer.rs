//! Moving items between the two inventories of a screen: single units,
//! all-but-one, whole stacks, and the drop/clear helpers built from the same
//! click sequences.

use crate::dispatch::ClickDispatcher;
use crate::query;
use stackshift_core::{ItemStack, SlotId};
use tracing::{debug, warn};

/// Upper bound on placement clicks of one leave-one transfer.
pub const LEAVE_ONE_FAIL_SAFE: usize = 256;
/// Upper bound on throws by [`drop_stacks_until_empty`].
pub const DROP_UNTIL_EMPTY_FAIL_SAFE: usize = 64;
/// Upper bound on throws by [`drop_stacks_while_has_item`].
pub const DROP_WHILE_HAS_ITEM_FAIL_SAFE: usize = 256;

/// Move one unit from `slot` into the other inventory.
///
/// Stacks within their normal size go through take-all, return-one and a
/// quick-transfer of the single unit. Over-sized stacks predict where a
/// quick-transfer of one unit would land and then place it there with
/// explicit single-unit clicks.
pub fn move_single_item_to_other_inventory(d: &mut ClickDispatcher<'_>, slot: SlotId) -> bool {
    let Some(source) = d.container().slot(slot) else {
        return false;
    };
    let stack = source.stack.clone();
    if !d.cursor().is_empty()
        || stack.is_empty()
        || !source.can_take()
        || (stack.count > 1 && !source.can_insert(&stack))
    {
        return false;
    }

    if stack.count <= stack.max_stack {
        return move_single_by_quick_move(d, slot);
    }

    let before = d.snapshot();
    d.set_stack_local(slot, stack.copy_with_count(1));
    d.quick_move_local(slot);
    let target = if d.container().has_stack(slot) {
        None
    } else {
        query::arrival_slot(&before, d.container(), &stack)
    };
    d.restore_local(&before);

    match target {
        Some(target) => {
            debug!(slot, target, "moving one unit of an over-sized stack");
            click_to_move_single_item(d, slot, target)
        }
        None => false,
    }
}

fn move_single_by_quick_move(d: &mut ClickDispatcher<'_>, slot: SlotId) -> bool {
    let original = d.container().count(slot);

    if original > 1 {
        d.left_click(slot);
        if d.container().has_stack(slot) {
            d.left_click(slot);
            return false;
        }
        d.right_click(slot);
    }

    d.shift_click(slot);
    if !d.cursor().is_empty() {
        d.left_click(slot);
    }
    d.container().count(slot) < original
}

/// Move one unit from `from` to `to`: pick up (half when there is more than
/// one), place one, put the rest back.
pub fn click_to_move_single_item(d: &mut ClickDispatcher<'_>, from: SlotId, to: SlotId) -> bool {
    let count = d.container().count(from);
    if count == 0 {
        return false;
    }

    if count > 1 {
        d.right_click(from);
    } else {
        d.left_click(from);
    }
    d.right_click(to);
    if !d.cursor().is_empty() {
        d.left_click(from);
    }
    d.container().count(from) < count
}

/// Move as much of `from` as fits into `to` with plain clicks.
pub fn click_to_move_items(d: &mut ClickDispatcher<'_>, from: SlotId, to: SlotId) -> bool {
    let container = d.container();
    let (Some(source), Some(target)) = (container.slot(from), container.slot(to)) else {
        return false;
    };
    let stack = source.stack.clone();
    if stack.is_empty()
        || !source.can_take()
        || !target.can_insert(&stack)
        || (target.has_stack() && !target.stack.matches(&stack))
    {
        return false;
    }

    d.left_click(from);
    if d.cursor().is_empty() {
        return false;
    }
    d.left_click(to);
    let moved = d.cursor().size() < stack.count;
    if !d.cursor().is_empty() {
        d.left_click(from);
    }
    moved
}

/// Pull one unit of the hovered stack's item from another inventory into
/// `slot`.
pub fn move_single_item_to_this_inventory(d: &mut ClickDispatcher<'_>, slot: SlotId) -> bool {
    let container = d.container();
    let Some(target) = container.slot(slot) else {
        return false;
    };
    let stack = target.stack.clone();
    if !d.cursor().is_empty()
        || stack.is_empty()
        || !target.can_insert(&stack)
        || stack.count >= target.max_stack_for(&stack)
    {
        return false;
    }

    let source = (0..container.len()).rev().find(|&id| {
        if id == slot || container.same_inventory(id, slot, false) {
            return false;
        }
        container.slot(id).is_some_and(|candidate| {
            candidate.can_take()
                && candidate.stack.matches(&stack)
                && (candidate.stack.count == 1 || candidate.can_insert(&candidate.stack))
        })
    });

    match source {
        Some(source) => click_to_move_single_item(d, source, slot),
        None => false,
    }
}

/// Move everything but one unit of `slot` to the other inventory.
///
/// One unit is parked in a holding slot of the same inventory while the rest
/// is quick-transferred, then put back. Without a holding slot the stack is
/// placed by hand: empty slots first, then partial matching stacks.
pub fn move_all_but_one_to_other_inventory(d: &mut ClickDispatcher<'_>, slot: SlotId) -> bool {
    let container = d.container();
    let Some(source) = container.slot(slot) else {
        return false;
    };
    let stack = source.stack.clone();
    if !d.cursor().is_empty()
        || stack.size() <= 1
        || stack.count > stack.max_stack
        || !source.can_take()
        || !source.can_insert(&stack)
    {
        debug!(slot, count = stack.size(), "leave-one declined");
        return false;
    }

    let holding: Vec<SlotId> = container
        .slots()
        .iter()
        .filter(|candidate| {
            candidate.id != slot
                && container.same_inventory(candidate.id, slot, true)
                && candidate.can_insert(&stack)
                && candidate.can_take()
                && (!candidate.has_stack() || candidate.stack.matches(&stack))
        })
        .map(|candidate| candidate.id)
        .collect();

    d.right_click(slot);
    let mut parked = None;
    for id in holding.into_iter().take(LEAVE_ONE_FAIL_SAFE) {
        let held = d.cursor().size();
        d.right_click(id);
        if d.cursor().size() < held {
            parked = Some(id);
            break;
        }
    }
    if !d.cursor().is_empty() {
        d.left_click(slot);
    }

    if let Some(temp) = parked {
        d.shift_click(slot);
        d.right_click(temp);
        d.right_click(slot);
        if !d.cursor().is_empty() {
            d.left_click(temp);
        }
        return d.container().count(slot) < stack.count;
    }

    let container = d.container();
    let treat_hotbar = d.layout().treat_hotbar_as_different();
    let mut targets = query::empty_slots(container, slot, false, treat_hotbar, false);
    if targets.is_empty() {
        targets = query::matching_stacks(container, slot, &stack, false, treat_hotbar, true, false);
    }
    targets.retain(|&id| container.slot(id).is_some_and(|target| target.can_insert(&stack)));
    if targets.is_empty() {
        return false;
    }

    d.left_click(slot);
    d.right_click(slot);
    for (clicks, id) in targets.into_iter().enumerate() {
        if d.cursor().is_empty() {
            break;
        }
        if clicks >= LEAVE_ONE_FAIL_SAFE {
            warn!(slot, "leave-one placement hit its fail-safe");
            break;
        }
        d.left_click(id);
    }
    if !d.cursor().is_empty() {
        d.left_click(slot);
    }
    d.container().count(slot) < stack.count
}

/// Quick-transfer `slot` and report whether its count changed.
pub fn shift_click_with_check(d: &mut ClickDispatcher<'_>, slot: SlotId) -> bool {
    let before = d.container().count(slot);
    d.shift_click(slot);
    d.container().count(slot) != before
}

/// Quick-transfer whole stacks.
///
/// Towards the other inventory this moves the stacks of the hovered slot's
/// inventory, the hovered slot last; towards this inventory it pulls the
/// stacks of every other inventory. Slots are scanned from the highest id
/// down. With `fallback`, a quick-transfer that moved nothing is retried with
/// plain clicks.
pub fn move_stacks(
    d: &mut ClickDispatcher<'_>,
    slot: SlotId,
    matching_only: bool,
    to_other: bool,
    first_only: bool,
    fallback: bool,
) -> bool {
    let reference = d.container().stack(slot);
    move_stacks_like(d, &reference, slot, matching_only, to_other, first_only, fallback)
}

/// [`move_stacks`] with an explicit reference stack.
pub fn move_stacks_like(
    d: &mut ClickDispatcher<'_>,
    reference: &ItemStack,
    slot: SlotId,
    matching_only: bool,
    to_other: bool,
    first_only: bool,
    fallback: bool,
) -> bool {
    let mut moved = false;

    for id in (0..d.container().len()).rev() {
        if id == slot {
            continue;
        }
        let container = d.container();
        let eligible = container.slot(id).is_some_and(|candidate| {
            candidate.has_stack()
                && candidate.can_take()
                && (!matching_only || candidate.stack.matches(reference))
        });
        if !eligible || container.same_inventory(id, slot, false) != to_other {
            continue;
        }

        moved |= shift_or_fallback(d, id, to_other, fallback);
        if first_only {
            return moved;
        }
    }

    if to_other && d.container().has_stack(slot) {
        moved |= shift_or_fallback(d, slot, to_other, fallback);
    }
    moved
}

fn shift_or_fallback(d: &mut ClickDispatcher<'_>, slot: SlotId, to_other: bool, fallback: bool) -> bool {
    if shift_click_with_check(d, slot) {
        return true;
    }
    fallback && move_items_from_slot_manually(d, slot, to_other)
}

/// Pick up `from` and place it on the target side by hand: partial matching
/// stacks first, then empty slots. Whatever is left goes back.
pub fn move_items_from_slot_manually(d: &mut ClickDispatcher<'_>, from: SlotId, to_other: bool) -> bool {
    let original = d.container().count(from);
    if d.container().slot(from).map_or(true, |slot| slot.is_output()) {
        return false;
    }
    d.left_click(from);
    if d.cursor().is_empty() {
        return false;
    }

    let cursor = d.cursor().clone();
    let container = d.container();
    let same_side = !to_other;
    let mut targets = query::matching_stacks(container, from, &cursor, same_side, false, true, false);
    targets.retain(|&id| container.slot(id).is_some_and(|slot| slot.stack.count < slot.max_stack_for(&slot.stack)));
    targets.extend(query::empty_slots(container, from, same_side, false, false));
    targets.retain(|&id| id != from && container.slot(id).is_some_and(|target| target.can_insert(&cursor)));

    move_item_from_cursor_to_slots(d, &targets);
    if !d.cursor().is_empty() {
        d.left_click(from);
    }
    d.container().count(from) < original
}

/// Left-click `slots` in order until the cursor is empty. Returns whether it
/// emptied.
pub fn move_item_from_cursor_to_slots(d: &mut ClickDispatcher<'_>, slots: &[SlotId]) -> bool {
    for &id in slots {
        if d.cursor().is_empty() {
            break;
        }
        d.left_click(id);
    }
    d.cursor().is_empty()
}

/// Take one set of items (one crafted result, one trade) from `slot` into
/// the player inventory: partial matching stacks first, then empty slots.
pub fn move_one_set_to_player_inventory(d: &mut ClickDispatcher<'_>, slot: SlotId) -> bool {
    if !d.cursor().is_empty() {
        return false;
    }
    d.left_click(slot);
    if d.cursor().is_empty() {
        return false;
    }

    let reference = d.cursor().clone();
    let container = d.container();
    let matching: Vec<SlotId> = query::matching_stacks(container, slot, &reference, false, true, true, false)
        .into_iter()
        .filter(|&id| container.is_player_slot(id))
        .collect();
    if move_item_from_cursor_to_slots(d, &matching) {
        return true;
    }

    let empty = query::empty_player_slots(d.container(), false);
    if move_item_from_cursor_to_slots(d, &empty) {
        return true;
    }

    if d.container().slot(slot).is_some_and(|source| source.can_insert(&reference)) {
        d.left_click(slot);
    }
    true
}

/// Throw every stack equal to `reference` on one side of `slot_reference`.
pub fn drop_stacks(d: &mut ClickDispatcher<'_>, reference: &ItemStack, slot_reference: SlotId, same_inventory: bool) {
    if reference.is_empty() {
        return;
    }
    for id in 0..d.container().len() {
        let container = d.container();
        if container.same_inventory(id, slot_reference, false) == same_inventory
            && container.stack(id).matches(reference)
        {
            d.drop_stack(id);
        }
    }
}

/// Throw the stack of `slot` until it stays empty. Returns the number of
/// throws.
pub fn drop_stacks_until_empty(d: &mut ClickDispatcher<'_>, slot: SlotId) -> usize {
    let mut throws = 0;
    while d.container().has_stack(slot) {
        if throws >= DROP_UNTIL_EMPTY_FAIL_SAFE {
            warn!(slot, throws, "drop until empty hit its fail-safe");
            break;
        }
        d.drop_stack(slot);
        throws += 1;
    }
    throws
}

/// Throw the stack of `slot` while it still holds `reference`'s item.
pub fn drop_stacks_while_has_item(d: &mut ClickDispatcher<'_>, slot: SlotId, reference: &ItemStack) -> usize {
    let mut throws = 0;
    while d.container().stack(slot).matches(reference) {
        if throws >= DROP_WHILE_HAS_ITEM_FAIL_SAFE {
            warn!(slot, throws, "drop while has item hit its fail-safe");
            break;
        }
        d.drop_stack(slot);
        throws += 1;
    }
    throws
}

/// Drop the leave-one way: pick the stack up, put one back, throw the rest.
pub fn drop_all_but_one(d: &mut ClickDispatcher<'_>, slot: SlotId) {
    d.left_click(slot);
    d.right_click(slot);
    d.drop_cursor();
}

/// Exchange two slots through the first hot-bar entry.
pub fn swap_slots(d: &mut ClickDispatcher<'_>, a: SlotId, b: SlotId) {
    d.swap_with_hotbar(a, 0);
    d.swap_with_hotbar(b, 0);
    d.swap_with_hotbar(a, 0);
}

/// Put the cursor into the player inventory: an empty slot if there is one,
/// else matching stacks with room. Whatever still does not fit is dropped.
pub fn try_clear_cursor(d: &mut ClickDispatcher<'_>) {
    if d.cursor().is_empty() {
        return;
    }
    let reference = d.cursor().clone();

    if let Some(&empty) = query::empty_player_slots(d.container(), false).first() {
        d.left_click(empty);
    } else {
        let container = d.container();
        let matching: Vec<SlotId> = query::all_matching_stacks(container, &reference, true)
            .into_iter()
            .filter(|&id| container.is_player_slot(id))
            .collect();
        for id in matching {
            let cursor = d.cursor();
            if !cursor.matches(&reference) || d.container().stack(id).is_full() {
                continue;
            }
            d.left_click(id);
        }
    }

    if !d.cursor().is_empty() {
        debug!(cursor = %d.cursor(), "dropping cursor that did not fit");
        d.drop_cursor();
    }
}
