//! Atomic slot operations and the host boundary that carries them.

use serde::{Deserialize, Serialize};
use stackshift_core::SlotId;
use std::fmt;

/// Slot number the wire protocol uses for "outside the window".
pub const OUTSIDE_SLOT: i32 = -999;

/// Kind of atomic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClickKind {
    /// Take-all (button 0) or take-half (button 1).
    Pickup,
    /// Quick-transfer to the other side of the layout.
    QuickMove,
    /// Throw one (button 0) or the whole stack (button 1).
    Throw,
    /// Swap with the hot-bar entry named by the button.
    Swap,
    /// Drag split steps (begin / add slot / end).
    QuickCraft,
}

/// Where an operation is aimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClickTarget {
    /// A slot of the container.
    Slot(SlotId),
    /// Outside the window.
    Outside,
}

impl ClickTarget {
    /// Wire slot number.
    pub fn wire_slot(&self) -> i32 {
        match self {
            Self::Slot(id) => i32::try_from(*id).unwrap_or(OUTSIDE_SLOT),
            Self::Outside => OUTSIDE_SLOT,
        }
    }

    /// Slot id, if the target is a slot.
    pub fn slot(&self) -> Option<SlotId> {
        match self {
            Self::Slot(id) => Some(*id),
            Self::Outside => None,
        }
    }
}

/// Stage of a drag split, encoded in the low two bits of the button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragStage {
    /// Start collecting slots.
    Begin,
    /// Add one slot.
    Add,
    /// Split the cursor over the collected slots.
    End,
}

/// How a drag split divides the cursor, encoded in bits 2..4 of the button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Divide evenly (left button drag).
    Even,
    /// One unit per slot (right button drag).
    One,
}

/// One primitive message to the authoritative peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClickOp {
    /// Window id of the container.
    pub sync_id: u32,
    /// Target slot or outside.
    pub target: ClickTarget,
    /// Mouse button, hot-bar index, or packed drag stage.
    pub button: u8,
    /// Operation kind.
    pub kind: ClickKind,
}

impl ClickOp {
    fn new(sync_id: u32, target: ClickTarget, button: u8, kind: ClickKind) -> Self {
        Self {
            sync_id,
            target,
            button,
            kind,
        }
    }

    /// Pick up the whole stack, place the whole cursor, merge or swap.
    pub fn take_all(sync_id: u32, slot: SlotId) -> Self {
        Self::new(sync_id, ClickTarget::Slot(slot), 0, ClickKind::Pickup)
    }

    /// Pick up half the stack, or place a single unit from the cursor.
    pub fn take_half(sync_id: u32, slot: SlotId) -> Self {
        Self::new(sync_id, ClickTarget::Slot(slot), 1, ClickKind::Pickup)
    }

    /// Quick-transfer the slot's stack.
    pub fn quick_move(sync_id: u32, slot: SlotId) -> Self {
        Self::new(sync_id, ClickTarget::Slot(slot), 0, ClickKind::QuickMove)
    }

    /// Throw one unit out of the slot.
    pub fn throw_one(sync_id: u32, slot: SlotId) -> Self {
        Self::new(sync_id, ClickTarget::Slot(slot), 0, ClickKind::Throw)
    }

    /// Throw the slot's whole stack.
    pub fn throw_stack(sync_id: u32, slot: SlotId) -> Self {
        Self::new(sync_id, ClickTarget::Slot(slot), 1, ClickKind::Throw)
    }

    /// Swap the slot with player hot-bar entry `button` (0-8, or 40).
    pub fn swap(sync_id: u32, slot: SlotId, button: u8) -> Self {
        Self::new(sync_id, ClickTarget::Slot(slot), button, ClickKind::Swap)
    }

    /// Drop the whole cursor outside the window.
    pub fn drop_cursor(sync_id: u32) -> Self {
        Self::new(sync_id, ClickTarget::Outside, 0, ClickKind::Pickup)
    }

    /// Drop one unit of the cursor outside the window.
    pub fn drop_cursor_one(sync_id: u32) -> Self {
        Self::new(sync_id, ClickTarget::Outside, 1, ClickKind::Pickup)
    }

    /// Begin a drag split.
    pub fn drag_begin(sync_id: u32, mode: DragMode) -> Self {
        Self::new(
            sync_id,
            ClickTarget::Outside,
            pack_drag(DragStage::Begin, mode),
            ClickKind::QuickCraft,
        )
    }

    /// Add a slot to the drag split in progress.
    pub fn drag_add(sync_id: u32, slot: SlotId, mode: DragMode) -> Self {
        Self::new(
            sync_id,
            ClickTarget::Slot(slot),
            pack_drag(DragStage::Add, mode),
            ClickKind::QuickCraft,
        )
    }

    /// Finish the drag split.
    pub fn drag_end(sync_id: u32, mode: DragMode) -> Self {
        Self::new(
            sync_id,
            ClickTarget::Outside,
            pack_drag(DragStage::End, mode),
            ClickKind::QuickCraft,
        )
    }

    /// Decode the drag stage and mode of a [`ClickKind::QuickCraft`] op.
    pub fn drag_parts(&self) -> Option<(DragStage, DragMode)> {
        if self.kind != ClickKind::QuickCraft {
            return None;
        }
        let stage = match self.button & 3 {
            0 => DragStage::Begin,
            1 => DragStage::Add,
            2 => DragStage::End,
            _ => return None,
        };
        let mode = match (self.button >> 2) & 3 {
            0 => DragMode::Even,
            1 => DragMode::One,
            _ => return None,
        };
        Some((stage, mode))
    }
}

fn pack_drag(stage: DragStage, mode: DragMode) -> u8 {
    let stage = match stage {
        DragStage::Begin => 0,
        DragStage::Add => 1,
        DragStage::End => 2,
    };
    let mode = match mode {
        DragMode::Even => 0,
        DragMode::One => 1,
    };
    stage | (mode << 2)
}

impl fmt::Display for ClickOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}(slot={}, button={}) in window {}",
            self.kind,
            self.target.wire_slot(),
            self.button,
            self.sync_id
        )
    }
}

/// Host boundary: delivers operations to the authoritative peer.
///
/// Fire and forget. The engine never learns whether an operation succeeded;
/// it re-reads the mirrored container instead.
pub trait Dispatcher {
    /// Send one operation.
    fn send(&mut self, op: &ClickOp);
}

impl<D: Dispatcher + ?Sized> Dispatcher for &mut D {
    fn send(&mut self, op: &ClickOp) {
        (**self).send(op);
    }
}

/// Recording dispatcher: every op is appended in order.
impl Dispatcher for Vec<ClickOp> {
    fn send(&mut self, op: &ClickOp) {
        self.push(*op);
    }
}
