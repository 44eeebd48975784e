//! An authoritative peer simulated in-process.

use crate::layout::StandardLayout;
use stackshift_core::{Container, ItemStack, SlotId};
use stackshift_engine::{refresh_outputs, ClickDispatcher, ClickOp, Dispatcher, Mirror};
use tracing::debug;

/// Applies every received op to its own copy of the container with the same
/// slot rules the client predicts with, and records the op stream.
#[derive(Debug, Clone)]
pub struct SimulatedPeer {
    container: Container,
    layout: StandardLayout,
    mirror: Mirror,
    log: Vec<ClickOp>,
}

impl SimulatedPeer {
    /// Create a peer holding `container`.
    pub fn new(container: Container, layout: StandardLayout) -> Self {
        Self {
            container,
            layout,
            mirror: Mirror::new(),
            log: Vec::new(),
        }
    }

    /// Authoritative container state.
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Every op received so far, in order.
    pub fn log(&self) -> &[ClickOp] {
        &self.log
    }

    /// Forget the recorded ops.
    pub fn clear_log(&mut self) {
        self.log.clear();
    }
}

impl Dispatcher for SimulatedPeer {
    fn send(&mut self, op: &ClickOp) {
        debug!(op = %op, "peer received");
        self.mirror.apply(&mut self.container, &self.layout, op);
        self.log.push(*op);
    }
}

/// A client container, its screen layout and the peer it talks to.
#[derive(Debug, Clone)]
pub struct Bench {
    /// Client-side mirrored container.
    pub container: Container,
    /// Screen layout shared by both sides.
    pub layout: StandardLayout,
    /// The authoritative side.
    pub peer: SimulatedPeer,
}

impl Bench {
    /// Start both sides from the same container.
    pub fn new(mut container: Container, layout: StandardLayout) -> Self {
        refresh_outputs(&mut container, &layout);
        let peer = SimulatedPeer::new(container.clone(), layout.clone());
        Self {
            container,
            layout,
            peer,
        }
    }

    /// Build a bench from a `(container, layout)` fixture.
    pub fn from_fixture((container, layout): (Container, StandardLayout)) -> Self {
        Self::new(container, layout)
    }

    /// Put `stack` into `slot` on both sides and recompute outputs.
    pub fn set_stack(&mut self, slot: SlotId, stack: ItemStack) {
        self.container.set_stack(slot, stack.clone());
        refresh_outputs(&mut self.container, &self.layout);
        self.peer.container.set_stack(slot, stack);
        refresh_outputs(&mut self.peer.container, &self.layout);
    }

    /// Run one intent against the bench.
    pub fn run<R>(&mut self, intent: impl FnOnce(&mut ClickDispatcher<'_>) -> R) -> R {
        let mut dispatcher = ClickDispatcher::new(&mut self.container, &self.layout, &mut self.peer);
        intent(&mut dispatcher)
    }

    /// Check that the client's prediction matches the peer's state.
    pub fn in_sync(&self) -> bool {
        self.container == self.peer.container
    }

    /// Units held by the peer, cursor included.
    pub fn total_units(&self) -> u64 {
        self.peer.container.total_units()
    }

    /// Ops the peer received.
    pub fn ops(&self) -> &[ClickOp] {
        self.peer.log()
    }
}
