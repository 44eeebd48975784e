//! The single chokepoint every intent issues its operations through.

use crate::click::{ClickOp, Dispatcher, DragMode};
use crate::layout::Layout;
use crate::predict::Mirror;
use stackshift_core::{Container, ItemStack, SlotId, Snapshot};
use tracing::trace;

/// Sends operations to the peer and keeps the mirrored container in step
/// with the predicted effect of each one.
pub struct ClickDispatcher<'a> {
    container: &'a mut Container,
    layout: &'a dyn Layout,
    peer: &'a mut dyn Dispatcher,
    mirror: Mirror,
    sent: usize,
}

impl<'a> ClickDispatcher<'a> {
    pub fn new(
        container: &'a mut Container,
        layout: &'a dyn Layout,
        peer: &'a mut dyn Dispatcher,
    ) -> Self {
        Self {
            container,
            layout,
            peer,
            mirror: Mirror::new(),
            sent: 0,
        }
    }

    /// Mirrored container state after every op issued so far.
    pub fn container(&self) -> &Container {
        &*self.container
    }

    pub fn layout(&self) -> &'a dyn Layout {
        self.layout
    }

    pub fn cursor(&self) -> &ItemStack {
        self.container.cursor()
    }

    pub fn sync_id(&self) -> u32 {
        self.container.sync_id()
    }

    /// Number of operations sent to the peer.
    pub fn ops_sent(&self) -> usize {
        self.sent
    }

    /// Send `op` and apply its predicted effect.
    pub fn apply(&mut self, op: ClickOp) {
        trace!(op = %op, "click");
        self.peer.send(&op);
        self.mirror.apply(&mut *self.container, self.layout, &op);
        self.sent += 1;
    }

    pub fn left_click(&mut self, slot: SlotId) {
        self.apply(ClickOp::take_all(self.sync_id(), slot));
    }

    pub fn right_click(&mut self, slot: SlotId) {
        self.apply(ClickOp::take_half(self.sync_id(), slot));
    }

    pub fn shift_click(&mut self, slot: SlotId) {
        self.apply(ClickOp::quick_move(self.sync_id(), slot));
    }

    pub fn drop_one(&mut self, slot: SlotId) {
        self.apply(ClickOp::throw_one(self.sync_id(), slot));
    }

    pub fn drop_stack(&mut self, slot: SlotId) {
        self.apply(ClickOp::throw_stack(self.sync_id(), slot));
    }

    pub fn drop_cursor(&mut self) {
        self.apply(ClickOp::drop_cursor(self.sync_id()));
    }

    pub fn swap_with_hotbar(&mut self, slot: SlotId, button: u8) {
        self.apply(ClickOp::swap(self.sync_id(), slot, button));
    }

    pub fn drag_begin(&mut self, mode: DragMode) {
        self.apply(ClickOp::drag_begin(self.sync_id(), mode));
    }

    pub fn drag_add(&mut self, slot: SlotId, mode: DragMode) {
        self.apply(ClickOp::drag_add(self.sync_id(), slot, mode));
    }

    pub fn drag_end(&mut self, mode: DragMode) {
        self.apply(ClickOp::drag_end(self.sync_id(), mode));
    }

    /// Local write that is never sent. Callers restore a snapshot before
    /// returning.
    pub(crate) fn set_stack_local(&mut self, slot: SlotId, stack: ItemStack) {
        self.container.set_stack(slot, stack);
    }

    /// Predict a quick-transfer of `slot` without sending it.
    pub(crate) fn quick_move_local(&mut self, slot: SlotId) {
        let op = ClickOp::quick_move(self.sync_id(), slot);
        Mirror::new().apply(&mut *self.container, self.layout, &op);
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        self.container.snapshot()
    }

    pub(crate) fn restore_local(&mut self, snapshot: &Snapshot) {
        self.container.restore(snapshot);
    }
}
