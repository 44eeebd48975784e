#![warn(missing_docs)]
//! Gesture-driven slot transfers.
//!
//! Every gesture is expressed as a sequence of atomic [`ClickOp`]s sent to the
//! authoritative peer through a [`Dispatcher`]. The local [`Container`] is kept
//! in step by [`Mirror`], which applies the same rules the peer applies, so
//! each step can inspect the effect of the previous one.
//!
//! [`Container`]: stackshift_core::Container

#[allow(missing_docs)]
pub mod action;
pub mod click;
#[allow(missing_docs)]
pub mod config;
#[allow(missing_docs)]
pub mod crafting;
#[allow(missing_docs)]
pub mod dispatch;
#[allow(missing_docs)]
pub mod drag;
pub mod layout;
#[allow(missing_docs)]
pub mod merchant;
#[allow(missing_docs)]
pub mod pickup;
#[allow(missing_docs)]
pub mod predict;
#[allow(missing_docs)]
pub mod query;
#[allow(missing_docs)]
pub mod scroll;
#[allow(missing_docs)]
pub mod transfer;
#[allow(missing_docs)]
pub mod vertical;

pub use action::{MoveAction, MoveAmount};
pub use click::{ClickKind, ClickOp, ClickTarget, Dispatcher, DragMode, DragStage, OUTSIDE_SLOT};
pub use config::EngineConfig;
pub use crafting::{handle_recipe_click, RecipeButton, RecipeClick};
pub use dispatch::ClickDispatcher;
pub use drag::DragSession;
pub use layout::{Layout, PlainLayout, SLOT_SIZE};
pub use pickup::{PickupTracker, SlotRef};
pub use predict::{refresh_outputs, Mirror};
pub use scroll::{try_move_items, ScrollModifiers};
