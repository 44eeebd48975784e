//! Drag gestures: turning a pointer path into a sequence of slot actions.

use crate::action::MoveAction;
use crate::dispatch::ClickDispatcher;
use crate::{transfer, vertical};
use stackshift_core::SlotId;
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// State of one drag gesture, owned by the caller for the lifetime of a
/// screen.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    action: MoveAction,
    last_pos: Option<(i32, i32)>,
    last_slot: Option<SlotId>,
    processed: BTreeSet<SlotId>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_action(&self) -> MoveAction {
        self.action
    }

    pub fn last_slot(&self) -> Option<SlotId> {
        self.last_slot
    }

    /// Check whether `slot` was already handled in this gesture.
    pub fn is_processed(&self, slot: SlotId) -> bool {
        self.processed.contains(&slot)
    }

    /// Record `slot` as handled so the gesture skips it.
    pub fn mark_processed(&mut self, slot: SlotId) {
        self.processed.insert(slot);
    }

    /// End the gesture: no active action and no handled slots.
    pub fn stop(&mut self) {
        self.action = MoveAction::None;
        self.processed.clear();
    }

    pub fn reset_last_slot(&mut self) {
        self.last_slot = None;
    }

    /// Advance the gesture to pointer position `(x, y)`.
    ///
    /// A click starts a new gesture with `action` and handles the slot under
    /// the pointer. Later calls walk the straight path from the previous
    /// position, one step along the dominant axis at a time, and handle every
    /// slot they cross. A cursor holding items ends the gesture. Returns
    /// whether any slot was handled.
    pub fn update(&mut self, d: &mut ClickDispatcher<'_>, action: MoveAction, x: i32, y: i32, is_click: bool) -> bool {
        if !d.cursor().is_empty() {
            self.last_pos = Some((x, y));
            self.stop();
            return false;
        }

        let mut handled = false;
        if is_click && action != MoveAction::None {
            self.last_slot = None;
            self.last_pos = Some((x, y));
            self.action = action;
            handled = self.process_at(d, x, y);
        } else if self.action != MoveAction::None {
            let (last_x, last_y) = self.last_pos.unwrap_or((x, y));
            for (px, py) in rasterize(last_x, last_y, x, y) {
                if !d.cursor().is_empty() {
                    debug!("cursor picked up items, ending drag");
                    self.stop();
                    break;
                }
                handled |= self.process_at(d, px, py);
            }
        }

        self.last_pos = Some((x, y));
        self.last_slot = d.layout().slot_at(d.container(), x, y);
        handled
    }

    fn process_at(&mut self, d: &mut ClickDispatcher<'_>, x: i32, y: i32) -> bool {
        let Some(slot) = d.layout().slot_at(d.container(), x, y) else {
            return false;
        };
        let usable = d
            .container()
            .slot(slot)
            .is_some_and(|candidate| candidate.has_stack() && candidate.can_take());
        if !usable || Some(slot) == self.last_slot || self.processed.contains(&slot) {
            return false;
        }

        trace!(slot, action = ?self.action, "drag over slot");
        apply_action(d, self.action, slot);
        self.processed.insert(slot);
        true
    }
}

/// Run `action` on one slot.
pub fn apply_action(d: &mut ClickDispatcher<'_>, action: MoveAction, slot: SlotId) -> bool {
    if let Some(up) = action.vertical() {
        return vertical::move_items_vertically(d, slot, up, action.amount());
    }

    match action {
        MoveAction::MoveToOtherMoveOne | MoveAction::ScrollToOtherMoveOne => {
            transfer::move_single_item_to_other_inventory(d, slot)
        }
        MoveAction::MoveToOtherLeaveOne => transfer::move_all_but_one_to_other_inventory(d, slot),
        MoveAction::MoveToOtherStacks | MoveAction::ScrollToOtherStacks => {
            transfer::shift_click_with_check(d, slot)
        }
        MoveAction::MoveToOtherMatching => transfer::move_stacks(d, slot, true, true, false, false),
        MoveAction::DropOne => {
            d.drop_one(slot);
            true
        }
        MoveAction::DropLeaveOne => {
            if d.container().count(slot) <= 1 {
                return false;
            }
            transfer::drop_all_but_one(d, slot);
            true
        }
        MoveAction::DropStacks => {
            d.drop_stack(slot);
            true
        }
        _ => false,
    }
}

/// Upper bound on points produced by one [`rasterize`] call.
pub const MAX_RASTER_STEPS: i64 = 4096;

/// Integer points from `(x0, y0)` to `(x1, y1)` inclusive, stepping one unit
/// along the dominant axis.
///
/// Paths longer than [`MAX_RASTER_STEPS`] are sampled at evenly spaced
/// steps; both endpoints are always included.
pub fn rasterize(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<(i32, i32)> {
    let (dx, dy) = (i64::from(x1) - i64::from(x0), i64::from(y1) - i64::from(y0));
    let steps = dx.abs().max(dy.abs());
    if steps == 0 {
        return vec![(x1, y1)];
    }

    let samples = steps.min(MAX_RASTER_STEPS);
    (0..=samples)
        .map(|k| {
            let i = k * steps / samples;
            (lerp(x0, dx, i, steps), lerp(y0, dy, i, steps))
        })
        .collect()
}

/// `start + i * delta / steps`, truncated towards zero. Always lies between
/// the path's endpoints.
fn lerp(start: i32, delta: i64, i: i64, steps: i64) -> i32 {
    let offset = i128::from(i) * i128::from(delta) / i128::from(steps);
    (i128::from(start) + offset) as i32
}
