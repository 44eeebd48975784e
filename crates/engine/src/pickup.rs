//! Remembering where the cursor's items came from, for shift-drop and
//! shift-place.

use crate::dispatch::ClickDispatcher;
use crate::drag::DragSession;
use crate::transfer;
use stackshift_core::{Container, ItemId, SlotId};
use tracing::debug;

/// A slot as seen in one container generation. Stale once the host
/// rebuilds the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRef {
    pub id: SlotId,
    pub generation: u64,
}

impl SlotRef {
    pub fn new(container: &Container, id: SlotId) -> Self {
        Self {
            id,
            generation: container.generation(),
        }
    }

    /// Slot id, if the reference still points into `container`.
    pub fn resolve(&self, container: &Container) -> Option<SlotId> {
        (self.generation == container.generation() && self.id < container.len()).then_some(self.id)
    }
}

/// Tracks the slot the cursor's items were picked up from.
///
/// The host stores a candidate before forwarding a click and checks for a
/// pickup afterwards; the candidate becomes the source once the cursor holds
/// a different item than before.
#[derive(Debug, Clone, Default)]
pub struct PickupTracker {
    candidate: Option<SlotRef>,
    source: Option<SlotRef>,
    cursor_item: ItemId,
}

impl PickupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store_candidate(&mut self, container: &Container, slot: Option<SlotId>) {
        self.candidate = slot.map(|id| SlotRef::new(container, id));
        self.cursor_item = container.cursor().item;
    }

    pub fn check_for_pickup(&mut self, container: &Container) {
        let cursor = container.cursor();
        if !cursor.is_empty() && cursor.item != self.cursor_item {
            self.source = self.candidate;
            debug!(source = ?self.source.map(|slot| slot.id), "cursor picked up items");
        }
    }

    /// Source slot of the cursor's items, if still valid.
    pub fn source_slot(&self, container: &Container) -> Option<SlotId> {
        self.source.and_then(|slot| slot.resolve(container))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Throw the cursor and every equal stack in the source slot's inventory.
pub fn shift_drop_items(d: &mut ClickDispatcher<'_>, tracker: &PickupTracker) -> bool {
    let reference = d.cursor().clone();
    let Some(source) = tracker.source_slot(d.container()) else {
        return false;
    };
    if reference.is_empty() {
        return false;
    }

    d.drop_cursor();
    transfer::drop_stacks(d, &reference, source, true);
    true
}

/// Check whether the cursor can be shift-placed into `slot`: the slot is
/// empty and accepts the cursor's items.
pub fn can_shift_place_items(container: &Container, slot: Option<SlotId>) -> bool {
    let cursor = container.cursor();
    slot.and_then(|id| container.slot(id))
        .is_some_and(|target| !target.has_stack() && !cursor.is_empty() && target.can_insert(cursor))
}

/// Place the cursor into `slot`, then pull every matching stack from the
/// other inventories into this one.
pub fn shift_place_items(d: &mut ClickDispatcher<'_>, session: &mut DragSession, slot: SlotId) -> bool {
    d.left_click(slot);
    session.mark_processed(slot);
    transfer::move_stacks(d, slot, true, false, false, false);
    true
}
