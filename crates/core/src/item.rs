//! Stack model - item identity, counts and tag payloads

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stack limit used when an item type does not declare its own.
pub const DEFAULT_MAX_STACK: u32 = 64;

/// Item type identifier. `ItemId(0)` never names a real item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u16);

impl ItemId {
    /// The "no item" id carried by empty stacks.
    pub const NONE: Self = Self(0);
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A quantity of one item type plus optional opaque tag data.
///
/// A count of zero is the empty state regardless of the other fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemStack {
    /// Type of item.
    pub item: ItemId,
    /// Quantity in stack.
    pub count: u32,
    /// Largest count a single stack of this type may hold.
    pub max_stack: u32,
    /// Opaque tag payload (names, damage, enchantments...).
    pub tag: Option<Vec<u8>>,
}

impl ItemStack {
    /// Create a stack with the default stack limit.
    pub fn new(item: ItemId, count: u32) -> Self {
        Self::with_max_stack(item, count, DEFAULT_MAX_STACK)
    }

    /// Create a stack with an explicit stack limit.
    pub fn with_max_stack(item: ItemId, count: u32, max_stack: u32) -> Self {
        Self {
            item,
            count,
            max_stack: max_stack.max(1),
            tag: None,
        }
    }

    /// Attach a tag payload.
    pub fn with_tag(mut self, tag: Vec<u8>) -> Self {
        self.tag = Some(tag);
        self
    }

    /// The canonical empty stack.
    pub fn empty() -> Self {
        Self {
            item: ItemId::NONE,
            count: 0,
            max_stack: DEFAULT_MAX_STACK,
            tag: None,
        }
    }

    /// Check whether the stack holds nothing.
    pub fn is_empty(&self) -> bool {
        self.count == 0 || self.item == ItemId::NONE
    }

    /// Count, treating any empty stack as zero.
    pub fn size(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.count
        }
    }

    /// "Are stacks equal" for transfer purposes: both non-empty, same item type
    /// and identical tag payload. Counts are ignored.
    pub fn matches(&self, other: &ItemStack) -> bool {
        !self.is_empty() && !other.is_empty() && self.item == other.item && self.tag == other.tag
    }

    /// Same as [`matches`](Self::matches) but also requires equal counts.
    pub fn matches_exactly(&self, other: &ItemStack) -> bool {
        self.matches(other) && self.count == other.count
    }

    /// Copy of this stack with a different count.
    pub fn copy_with_count(&self, count: u32) -> Self {
        if count == 0 {
            return Self::empty();
        }
        Self {
            count,
            ..self.clone()
        }
    }

    /// Check if this stack is at capacity.
    pub fn is_full(&self) -> bool {
        !self.is_empty() && self.count >= self.max_stack
    }

    /// Space left before the stack is full.
    pub fn remaining_space(&self) -> u32 {
        self.max_stack.saturating_sub(self.size())
    }

    /// Add up to `amount` units (bounded by `limit`), returning what didn't fit.
    pub fn grow(&mut self, amount: u32, limit: u32) -> u32 {
        let space = limit.min(self.max_stack).saturating_sub(self.count);
        let added = amount.min(space);
        self.count += added;
        amount - added
    }

    /// Remove up to `amount` units, returning the amount actually removed.
    /// A stack that reaches zero becomes the canonical empty stack.
    pub fn shrink(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.size());
        self.count -= removed;
        if self.count == 0 {
            *self = Self::empty();
        }
        removed
    }

    /// Split `amount` units off into a new stack.
    pub fn split(&mut self, amount: u32) -> ItemStack {
        let taken = self.size().min(amount);
        if taken == 0 {
            return Self::empty();
        }
        let split = self.copy_with_count(taken);
        self.shrink(taken);
        split
    }

    /// Remove and return the whole stack, leaving this one empty.
    pub fn take(&mut self) -> ItemStack {
        std::mem::replace(self, Self::empty())
    }
}

impl Default for ItemStack {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for ItemStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "<empty>");
        }
        write!(f, "{}x{}", self.count, self.item)?;
        if self.tag.is_some() {
            write!(f, "+tag")?;
        }
        Ok(())
    }
}
