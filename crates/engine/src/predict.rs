//! Predicted local effect of atomic operations.
//!
//! [`Mirror`] applies the same slot rules the authoritative peer applies, so
//! that a multi-step intent can read the expected state after every op
//! without waiting for confirmation. The simulated peer in the test kit runs
//! these exact rules against its own copy of the container.

use crate::click::{ClickKind, ClickOp, ClickTarget, DragMode, DragStage};
use crate::layout::Layout;
use stackshift_core::{Container, ItemStack, SlotId, SlotKind};

/// Upper bound on crafts performed by one quick-transfer out of an output.
pub const MAX_CRAFTS_PER_QUICK_MOVE: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingDrag {
    mode: DragMode,
    slots: Vec<SlotId>,
}

/// Slot rules for every [`ClickKind`], plus the drag split in progress.
#[derive(Debug, Clone, Default)]
pub struct Mirror {
    drag: Option<PendingDrag>,
}

impl Mirror {
    /// Create a mirror with no drag in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a drag split is being collected.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Apply the effect of `op` to `container`.
    ///
    /// Ops aimed at another window are ignored. Any op other than a drag step
    /// abandons a drag split in progress.
    pub fn apply(&mut self, container: &mut Container, layout: &dyn Layout, op: &ClickOp) {
        if op.sync_id != container.sync_id() {
            return;
        }
        if op.kind != ClickKind::QuickCraft {
            self.drag = None;
        }

        match (op.kind, op.target) {
            (ClickKind::Pickup, ClickTarget::Outside) => drop_from_cursor(container, op.button),
            (ClickKind::Pickup, ClickTarget::Slot(id)) => pickup(container, layout, id, op.button),
            (ClickKind::QuickMove, ClickTarget::Slot(id)) => quick_move(container, layout, id),
            (ClickKind::Throw, ClickTarget::Slot(id)) => throw(container, layout, id, op.button),
            (ClickKind::Swap, ClickTarget::Slot(id)) => swap(container, layout, id, op.button),
            (ClickKind::QuickCraft, _) => self.quick_craft(container, layout, op),
            (ClickKind::QuickMove | ClickKind::Throw | ClickKind::Swap, ClickTarget::Outside) => {}
        }

        refresh_outputs(container, layout);
    }

    fn quick_craft(&mut self, container: &mut Container, layout: &dyn Layout, op: &ClickOp) {
        let Some((stage, mode)) = op.drag_parts() else {
            self.drag = None;
            return;
        };

        match stage {
            DragStage::Begin => {
                self.drag = Some(PendingDrag {
                    mode,
                    slots: Vec::new(),
                });
            }
            DragStage::Add => {
                let Some(id) = op.target.slot() else {
                    return;
                };
                let cursor = container.cursor().clone();
                let Some(drag) = self.drag.as_mut().filter(|drag| drag.mode == mode) else {
                    return;
                };
                if accepts_drag(container, id, &cursor)
                    && cursor.size() as usize > drag.slots.len()
                    && !drag.slots.contains(&id)
                {
                    drag.slots.push(id);
                }
            }
            DragStage::End => {
                let Some(drag) = self.drag.take().filter(|drag| drag.mode == mode) else {
                    return;
                };
                if container.cursor().is_empty() {
                    return;
                }
                match drag.slots.as_slice() {
                    [] => {}
                    [single] => {
                        let button = if mode == DragMode::Even { 0 } else { 1 };
                        pickup(container, layout, *single, button);
                    }
                    slots => split_cursor(container, slots, mode),
                }
            }
        }
    }
}

/// Recompute every crafting and trade output from its inputs.
pub fn refresh_outputs(container: &mut Container, layout: &dyn Layout) {
    let outputs: Vec<(SlotId, SlotKind)> = container
        .slots()
        .iter()
        .filter(|slot| slot.is_output())
        .map(|slot| (slot.id, slot.kind))
        .collect();

    for (id, kind) in outputs {
        match kind {
            SlotKind::CraftingOutput => {
                if let Some(range) = layout.crafting_grid(container, id) {
                    let result = layout.craft_result(container, range);
                    container.set_stack(id, result);
                }
            }
            SlotKind::TradeOutput => {
                let result = trade_result(container, layout);
                container.set_stack(id, result);
            }
            SlotKind::Storage | SlotKind::Locked => {}
        }
    }
}

fn trade_result(container: &Container, layout: &dyn Layout) -> ItemStack {
    let Some(offer) = layout.selected_trade() else {
        return ItemStack::empty();
    };
    let [first, second] = layout.merchant_buy_slots();
    let pays = |given: &ItemStack, price: &ItemStack| {
        price.is_empty() || (given.matches(price) && given.count >= price.count)
    };

    if !offer.buy_first.is_empty()
        && pays(&container.stack(first), &offer.buy_first)
        && pays(&container.stack(second), &offer.buy_second)
    {
        offer.sell
    } else {
        ItemStack::empty()
    }
}

fn accepts_drag(container: &Container, id: SlotId, cursor: &ItemStack) -> bool {
    let Some(slot) = container.slot(id) else {
        return false;
    };
    !cursor.is_empty()
        && slot.can_insert(cursor)
        && (slot.stack.is_empty()
            || (slot.stack.matches(cursor) && slot.stack.count < slot.max_stack_for(cursor)))
}

fn split_cursor(container: &mut Container, slots: &[SlotId], mode: DragMode) {
    let original = container.cursor().clone();
    let per_slot = match mode {
        DragMode::Even => original.count / slots.len() as u32,
        DragMode::One => 1,
    };
    let mut remaining = original.count;

    for &id in slots {
        if !accepts_drag(container, id, &original) {
            continue;
        }
        let existing = container.count(id);
        let max = container
            .slot(id)
            .map_or(original.max_stack, |slot| slot.max_stack_for(&original));
        let target = (existing + per_slot.min(remaining)).min(max);
        remaining -= target - existing;
        container.set_stack(id, original.copy_with_count(target));
    }

    container.set_cursor(original.copy_with_count(remaining));
}

fn drop_from_cursor(container: &mut Container, button: u8) {
    let mut cursor = container.cursor().clone();
    if button == 0 {
        cursor = ItemStack::empty();
    } else {
        cursor.shrink(1);
    }
    container.set_cursor(cursor);
}

/// Move up to `amount` units from `cursor` into slot `id`, bounded by the
/// slot's capacity.
fn insert_from(container: &mut Container, id: SlotId, cursor: &mut ItemStack, amount: u32) {
    let Some(slot) = container.slot(id) else {
        return;
    };
    if !slot.can_insert(cursor) {
        return;
    }
    let mut existing = slot.stack.clone();
    let max = slot.max_stack_for(cursor);
    let moved = amount.min(cursor.size()).min(max.saturating_sub(existing.size()));
    if moved == 0 {
        return;
    }

    if existing.is_empty() {
        existing = cursor.copy_with_count(moved);
    } else if existing.matches(cursor) {
        existing.count += moved;
    } else {
        return;
    }
    cursor.shrink(moved);
    container.set_stack(id, existing);
}

/// Take a crafting or trade result, consuming its inputs.
fn take_output(container: &mut Container, layout: &dyn Layout, id: SlotId) -> ItemStack {
    let Some(slot) = container.slot(id) else {
        return ItemStack::empty();
    };
    let kind = slot.kind;
    let taken = slot.stack.clone();
    if taken.is_empty() {
        return taken;
    }
    container.set_stack(id, ItemStack::empty());

    match kind {
        SlotKind::CraftingOutput => {
            if let Some(range) = layout.crafting_grid(container, id) {
                for cell in range.iter() {
                    let mut stack = container.stack(cell);
                    if stack.shrink(1) > 0 {
                        container.set_stack(cell, stack);
                    }
                }
            }
        }
        SlotKind::TradeOutput => {
            if let Some(offer) = layout.selected_trade() {
                let [first, second] = layout.merchant_buy_slots();
                for (slot_id, price) in [(first, &offer.buy_first), (second, &offer.buy_second)] {
                    if price.is_empty() {
                        continue;
                    }
                    let mut stack = container.stack(slot_id);
                    stack.shrink(price.count);
                    container.set_stack(slot_id, stack);
                }
            }
        }
        SlotKind::Storage | SlotKind::Locked => {}
    }

    refresh_outputs(container, layout);
    taken
}

fn pickup(container: &mut Container, layout: &dyn Layout, id: SlotId, button: u8) {
    let Some(slot) = container.slot(id).cloned() else {
        return;
    };
    let mut cursor = container.cursor().clone();
    let stack = slot.stack.clone();

    if stack.is_empty() {
        if !cursor.is_empty() {
            let amount = if button == 0 { cursor.count } else { 1 };
            insert_from(container, id, &mut cursor, amount);
            container.set_cursor(cursor);
        }
        return;
    }

    if !slot.can_take() {
        return;
    }

    if cursor.is_empty() {
        if slot.is_output() {
            let taken = take_output(container, layout, id);
            container.set_cursor(taken);
        } else {
            let amount = if button == 0 {
                stack.count
            } else {
                stack.count.div_ceil(2)
            };
            let mut remaining = stack;
            let taken = remaining.split(amount);
            container.set_stack(id, remaining);
            container.set_cursor(taken);
        }
    } else if slot.can_insert(&cursor) {
        if stack.matches(&cursor) {
            let amount = if button == 0 { cursor.count } else { 1 };
            insert_from(container, id, &mut cursor, amount);
            container.set_cursor(cursor);
        } else if cursor.count <= slot.max_stack_for(&cursor) {
            container.set_stack(id, cursor);
            container.set_cursor(stack);
        }
    } else if stack.matches(&cursor) {
        if slot.is_output() {
            if cursor.count + stack.count <= cursor.max_stack {
                let taken = take_output(container, layout, id);
                cursor.count += taken.size();
                container.set_cursor(cursor);
            }
        } else {
            let mut remaining = stack;
            let taken = remaining.split(cursor.remaining_space());
            cursor.count += taken.size();
            container.set_stack(id, remaining);
            container.set_cursor(cursor);
        }
    }
}

/// Insert `stack` into `targets`: top off equal stacks first, then fill empty
/// insertable slots. Returns what did not fit.
fn insert_into_targets(container: &mut Container, targets: &[SlotId], mut stack: ItemStack) -> ItemStack {
    for &id in targets {
        if stack.is_empty() {
            break;
        }
        let matches = container
            .slot(id)
            .is_some_and(|slot| slot.stack.matches(&stack) && slot.can_insert(&stack));
        if matches {
            insert_from(container, id, &mut stack, u32::MAX);
        }
    }
    for &id in targets {
        if stack.is_empty() {
            break;
        }
        let empty = container
            .slot(id)
            .is_some_and(|slot| slot.stack.is_empty() && slot.can_insert(&stack));
        if empty {
            insert_from(container, id, &mut stack, u32::MAX);
        }
    }
    stack
}

fn quick_move(container: &mut Container, layout: &dyn Layout, id: SlotId) {
    let Some(slot) = container.slot(id).cloned() else {
        return;
    };
    if slot.stack.is_empty() || !slot.can_take() {
        return;
    }
    let targets = layout.quick_move_targets(container, id);

    if slot.is_output() {
        for _ in 0..MAX_CRAFTS_PER_QUICK_MOVE {
            let result = container.stack(id);
            if result.is_empty() {
                break;
            }
            let mut trial = container.clone();
            if !insert_into_targets(&mut trial, &targets, result.clone()).is_empty() {
                break;
            }
            let taken = take_output(container, layout, id);
            insert_into_targets(container, &targets, taken);
            if !container.stack(id).matches(&result) {
                break;
            }
        }
        return;
    }

    let remaining = insert_into_targets(container, &targets, slot.stack);
    container.set_stack(id, remaining);
}

fn throw(container: &mut Container, layout: &dyn Layout, id: SlotId, button: u8) {
    if !container.cursor().is_empty() {
        return;
    }
    let Some(slot) = container.slot(id).cloned() else {
        return;
    };
    if slot.stack.is_empty() || !slot.can_take() {
        return;
    }

    if slot.is_output() {
        take_output(container, layout, id);
    } else {
        let mut stack = slot.stack;
        if button == 0 {
            stack.shrink(1);
        } else {
            stack = ItemStack::empty();
        }
        container.set_stack(id, stack);
    }
}

fn swap(container: &mut Container, layout: &dyn Layout, id: SlotId, button: u8) {
    let Some(hotbar) = container.hotbar_slot(usize::from(button)) else {
        return;
    };
    let Some(slot) = container.slot(id).cloned() else {
        return;
    };
    if hotbar == id {
        return;
    }
    let mut held = container.stack(hotbar);
    let stack = slot.stack.clone();

    if held.is_empty() && stack.is_empty() {
        return;
    }

    if held.is_empty() {
        if slot.can_take() {
            let taken = if slot.is_output() {
                take_output(container, layout, id)
            } else {
                container.set_stack(id, ItemStack::empty());
                stack
            };
            container.set_stack(hotbar, taken);
        }
    } else if stack.is_empty() {
        if slot.can_insert(&held) {
            insert_from(container, id, &mut held, u32::MAX);
            container.set_stack(hotbar, held);
        }
    } else if slot.can_take() && slot.can_insert(&held) && held.count <= slot.max_stack_for(&held) {
        container.set_stack(id, held);
        container.set_stack(hotbar, stack);
    }
}
