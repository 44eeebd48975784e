#![warn(missing_docs)]
//! Core primitives shared across the workspace: stacks, item keys, slots and
//! the container mirror.

pub mod container;
pub mod item;
pub mod registry;
pub mod slot;

// Re-export commonly used types
pub use container::{Container, SlotRange, Snapshot};
pub use item::{ItemId, ItemStack, DEFAULT_MAX_STACK};
pub use registry::{ItemRegistry, RegistryKey, RegistryKeyError};
pub use slot::{InventoryId, Slot, SlotId, SlotKind, HOTBAR_SIZE, OFFHAND_INDEX};
