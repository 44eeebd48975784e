//! Moving items up or down the screen instead of between inventories.

use crate::action::MoveAmount;
use crate::dispatch::ClickDispatcher;
use crate::query;
use stackshift_core::{Container, SlotId};
use std::cmp::Reverse;
use tracing::debug;

/// Slots above (`up`) or below `slot` that can take some of its stack,
/// nearest row first.
///
/// A slot qualifies when it is empty and accepts the stack, or holds an equal
/// stack with room left. Rows are visited outward from the source; within a
/// row, moving up scans left to right and moving down right to left.
pub fn vertical_candidates(container: &Container, slot: SlotId, up: bool) -> Vec<SlotId> {
    let Some(source) = container.slot(slot) else {
        return Vec::new();
    };
    let stack = &source.stack;
    let mut candidates: Vec<SlotId> = container
        .slots()
        .iter()
        .filter(|candidate| {
            candidate.id != slot
                && candidate.y != source.y
                && (candidate.y < source.y) == up
                && candidate.can_insert(stack)
                && (!candidate.has_stack()
                    || (candidate.stack.matches(stack)
                        && candidate.max_stack_for(stack) > candidate.stack.count))
        })
        .map(|candidate| candidate.id)
        .collect();

    if up {
        candidates.sort_by_key(|&id| (Reverse(container.slot(id).map_or(0, |s| s.y)), id));
    } else {
        candidates.sort_by_key(|&id| (container.slot(id).map_or(0, |s| s.y), Reverse(id)));
    }
    candidates
}

/// Move some of `slot`'s stack up or down, by `amount`.
pub fn move_items_vertically(d: &mut ClickDispatcher<'_>, slot: SlotId, up: bool, amount: MoveAmount) -> bool {
    if !d.cursor().is_empty() || !d.container().has_stack(slot) {
        return false;
    }

    match amount {
        MoveAmount::AllMatching => move_matching_vertically(d, slot, up),
        MoveAmount::FullStacks => {
            let targets = vertical_candidates(d.container(), slot, up);
            move_stack_to_slots(d, slot, &targets, false).is_some()
        }
        MoveAmount::LeaveOne => {
            let targets = vertical_candidates(d.container(), slot, up);
            move_stack_to_slots(d, slot, &targets, true).is_some()
        }
        MoveAmount::MoveOne => {
            let targets = vertical_candidates(d.container(), slot, up);
            move_one_to_first_valid(d, slot, &targets)
        }
        MoveAmount::None => false,
    }
}

/// Pick up `from` (keeping one unit behind with `leave_one`) and left-click
/// `targets` while the cursor holds items. The rest goes back to `from`.
///
/// Returns the last slot clicked.
pub fn move_stack_to_slots(
    d: &mut ClickDispatcher<'_>,
    from: SlotId,
    targets: &[SlotId],
    leave_one: bool,
) -> Option<SlotId> {
    if targets.is_empty() || (leave_one && d.container().count(from) <= 1) {
        return None;
    }

    d.left_click(from);
    if d.cursor().is_empty() {
        return None;
    }
    if leave_one {
        d.right_click(from);
    }

    let mut last = None;
    for &id in targets {
        if d.cursor().is_empty() {
            break;
        }
        let accepts = d.container().slot(id).is_some_and(|target| {
            let cursor = d.cursor();
            target.can_insert(cursor) && (!target.has_stack() || target.stack.matches(cursor))
        });
        if accepts {
            d.left_click(id);
            last = Some(id);
        }
    }

    if !d.cursor().is_empty() {
        d.left_click(from);
    }
    last
}

/// Move exactly one unit of `from` into the first target that takes it.
pub fn move_one_to_first_valid(d: &mut ClickDispatcher<'_>, from: SlotId, targets: &[SlotId]) -> bool {
    if targets.is_empty() {
        return false;
    }

    d.right_click(from);
    let held = d.cursor().size();
    if held == 0 {
        return false;
    }

    let mut placed = false;
    for &id in targets {
        d.right_click(id);
        if d.cursor().size() != held {
            placed = true;
            break;
        }
    }

    if !d.cursor().is_empty() {
        d.left_click(from);
    }
    placed
}

/// Push every stack matching `slot` in its inventory towards one end of the
/// screen, far-end sources first, until the targets run out.
pub fn move_matching_vertically(d: &mut ClickDispatcher<'_>, slot: SlotId, up: bool) -> bool {
    let container = d.container();
    let reference = container.stack(slot);
    let treat_hotbar = true;

    let mut sources = query::matching_stacks(container, slot, &reference, true, treat_hotbar, false, false);
    sources.sort_by(|&a, &b| container.vertical_order(a, b, !up));

    let mut targets = query::empty_slots(container, slot, false, treat_hotbar, false);
    targets.extend(query::empty_slots(container, slot, true, treat_hotbar, false));
    targets.extend(query::matching_stacks(container, slot, &reference, true, treat_hotbar, true, false));
    targets.sort_by(|&a, &b| container.vertical_order(a, b, up));
    targets.dedup();

    let mut moved = false;
    for source in sources {
        let row = d.container().slot(source).map_or(0, |s| s.y);
        let Some(last) = move_stack_to_slots(d, source, &targets, false) else {
            break;
        };
        moved = true;
        let last_row = d.container().slot(last).map_or(0, |s| s.y);
        if last == source || (last_row > row) == up {
            debug!(source, last, "matching sweep reached its source row");
            break;
        }
    }
    moved
}
