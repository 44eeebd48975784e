//! Recipe patterns: a fixed-length ingredient template plus its result.

use serde::{Deserialize, Serialize};
use stackshift_core::{Container, ItemStack, SlotId, SlotRange};

/// Grid size of a fresh pattern (a 3x3 crafting grid).
pub const DEFAULT_GRID_SIZE: usize = 9;

/// Ingredient template for one crafting grid.
///
/// A pattern is valid iff its result is non-empty. Patterns are only changed
/// as a whole, through [`store_from_grid`](Self::store_from_grid),
/// [`set`](Self::set) or [`clear`](Self::clear).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipePattern {
    ingredients: Vec<ItemStack>,
    result: ItemStack,
}

impl Default for RecipePattern {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipePattern {
    /// Create an empty (invalid) pattern for a 3x3 grid.
    pub fn new() -> Self {
        Self::with_grid_size(DEFAULT_GRID_SIZE)
    }

    /// Create an empty pattern with `size` ingredient cells.
    pub fn with_grid_size(size: usize) -> Self {
        Self {
            ingredients: vec![ItemStack::empty(); size],
            result: ItemStack::empty(),
        }
    }

    /// Ingredient cells in grid order.
    pub fn ingredients(&self) -> &[ItemStack] {
        &self.ingredients
    }

    /// Ingredient at grid cell `index` (empty when out of range).
    pub fn ingredient(&self, index: usize) -> ItemStack {
        self.ingredients.get(index).cloned().unwrap_or_default()
    }

    /// Number of grid cells.
    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    /// Check if the pattern has no cells.
    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    /// Expected crafting result.
    pub fn result(&self) -> &ItemStack {
        &self.result
    }

    /// Check if the pattern holds a recipe.
    pub fn is_valid(&self) -> bool {
        !self.result.is_empty()
    }

    /// Replace the whole pattern.
    pub fn set(&mut self, ingredients: Vec<ItemStack>, result: ItemStack) {
        self.ingredients = ingredients;
        self.result = result;
    }

    /// Reset every cell and the result to empty, keeping the grid size.
    pub fn clear(&mut self) {
        self.ingredients.iter_mut().for_each(|cell| *cell = ItemStack::empty());
        self.result = ItemStack::empty();
    }

    /// Copy the grid in `range` and the stack in `output` into this pattern.
    ///
    /// When the output slot is empty the pattern is cleared if
    /// `clear_if_empty` is set and left alone otherwise. Returns whether the
    /// pattern changed.
    pub fn store_from_grid(
        &mut self,
        container: &Container,
        output: SlotId,
        range: SlotRange,
        clear_if_empty: bool,
    ) -> bool {
        let result = container.stack(output);
        if result.is_empty() {
            if clear_if_empty {
                self.ingredients = vec![ItemStack::empty(); range.count()];
                self.result = ItemStack::empty();
                return true;
            }
            return false;
        }

        self.ingredients = range.iter().map(|id| container.stack(id)).collect();
        self.result = result;
        true
    }

    /// Ingredient cell indices grouped by item-type equality, groups in order
    /// of first appearance. Empty cells are not part of any group.
    pub fn slots_per_item(&self) -> Vec<Vec<usize>> {
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for (index, stack) in self.ingredients.iter().enumerate() {
            if stack.is_empty() {
                continue;
            }
            match groups
                .iter_mut()
                .find(|group| self.ingredients[group[0]].matches(stack))
            {
                Some(group) => group.push(index),
                None => groups.push(vec![index]),
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackshift_core::{InventoryId, ItemId, Slot, SlotKind};

    const PLANKS: ItemId = ItemId(1);
    const STICK: ItemId = ItemId(2);
    const TABLE: ItemId = ItemId(3);

    fn crafting_grid() -> Container {
        let mut slots =
            vec![Slot::new(0, InventoryId(0), 0, 124, 35).with_kind(SlotKind::CraftingOutput)];
        for index in 0..9 {
            slots.push(Slot::new(
                0,
                InventoryId(1),
                index,
                30 + (index as i32 % 3) * 18,
                17 + (index as i32 / 3) * 18,
            ));
        }
        Container::new(1, slots)
    }

    #[test]
    fn store_copies_grid_and_result() {
        let mut container = crafting_grid();
        for id in [1, 2, 4, 5] {
            container.set_stack(id, ItemStack::new(PLANKS, 1));
        }
        container.set_stack(0, ItemStack::new(TABLE, 1));

        let mut pattern = RecipePattern::new();
        assert!(pattern.store_from_grid(&container, 0, SlotRange::new(1, 9), false));
        assert!(pattern.is_valid());
        assert_eq!(pattern.len(), 9);
        assert_eq!(pattern.ingredient(0).item, PLANKS);
        assert!(pattern.ingredient(2).is_empty());
        assert_eq!(pattern.result().item, TABLE);
    }

    #[test]
    fn empty_output_clears_only_on_request() {
        let container = crafting_grid();
        let mut pattern = RecipePattern::new();
        pattern.set(vec![ItemStack::new(PLANKS, 1); 9], ItemStack::new(TABLE, 1));

        assert!(!pattern.store_from_grid(&container, 0, SlotRange::new(1, 9), false));
        assert!(pattern.is_valid());

        assert!(pattern.store_from_grid(&container, 0, SlotRange::new(1, 9), true));
        assert!(!pattern.is_valid());
    }

    #[test]
    fn groups_cells_by_item_in_first_appearance_order() {
        let mut pattern = RecipePattern::new();
        let mut cells = vec![ItemStack::empty(); 9];
        cells[1] = ItemStack::new(STICK, 1);
        cells[3] = ItemStack::new(PLANKS, 1);
        cells[4] = ItemStack::new(STICK, 1);
        cells[5] = ItemStack::new(PLANKS, 1);
        pattern.set(cells, ItemStack::new(TABLE, 1));

        assert_eq!(pattern.slots_per_item(), vec![vec![1, 4], vec![3, 5]]);
    }

    #[test]
    fn clear_keeps_grid_size() {
        let mut pattern = RecipePattern::with_grid_size(4);
        pattern.set(vec![ItemStack::new(PLANKS, 1); 4], ItemStack::new(TABLE, 1));
        pattern.clear();
        assert_eq!(pattern.len(), 4);
        assert!(pattern.ingredients().iter().all(ItemStack::is_empty));
        assert!(!pattern.is_valid());
    }
}
