//! Recipe-driven crafting grid population, clearing and draining.
//!
//! The grid is addressed through the [`Layout`](crate::layout::Layout): a
//! crafting output slot maps to the [`SlotRange`] of its ingredient cells.
//! Ingredients are looked up outside the grid's own inventory.

use crate::click::DragMode;
use crate::config::EngineConfig;
use crate::dispatch::ClickDispatcher;
use crate::query;
use crate::transfer;
use serde::{Deserialize, Serialize};
use stackshift_core::{ItemStack, SlotId, SlotRange};
use stackshift_storage::{RecipePattern, RecipeStorage};
use tracing::{debug, warn};

/// Upper bound on quick-transfers out of the output by
/// [`craft_as_many_as_possible`].
pub const CRAFT_AS_MANY_FAIL_SAFE: usize = 1024;

/// Mouse button used on a recipe entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeButton {
    Left,
    Right,
    PickBlock,
}

/// A click on one entry of the recipe list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeClick {
    pub button: RecipeButton,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub drop_key: bool,
}

/// Quick-transfer every grid cell whose content differs from the pattern.
/// Returns `false` if a cell could not be emptied.
pub fn clear_grid_non_matching(d: &mut ClickDispatcher<'_>, recipe: &RecipePattern, range: SlotRange) -> bool {
    let mut cleared = true;
    for (index, id) in range.iter().enumerate() {
        let stack = d.container().stack(id);
        if stack.is_empty() || stack.matches(&recipe.ingredient(index)) {
            continue;
        }
        d.shift_click(id);
        if d.container().has_stack(id) {
            cleared = false;
        }
    }
    cleared
}

/// Quick-transfer every grid cell out. Returns `false` if a cell could not be
/// emptied.
pub fn clear_grid(d: &mut ClickDispatcher<'_>, range: SlotRange) -> bool {
    let mut cleared = true;
    for id in range.iter() {
        if !d.container().has_stack(id) {
            continue;
        }
        d.shift_click(id);
        if d.container().has_stack(id) {
            cleared = false;
        }
    }
    cleared
}

/// Populate the grid feeding `output` from `recipe`, with whole stacks or
/// one unit per cell.
pub fn fill_grid_from_recipe(
    d: &mut ClickDispatcher<'_>,
    recipe: &RecipePattern,
    output: SlotId,
    fill_stacks: bool,
) -> bool {
    let Some(range) = d.layout().crafting_grid(d.container(), output) else {
        return false;
    };
    if !recipe.is_valid() || recipe.len() > range.count() {
        return false;
    }
    if !clear_grid_non_matching(d, recipe, range) {
        debug!(output, "grid still holds foreign items, not filling");
        return false;
    }

    for group in recipe.slots_per_item() {
        let ingredient = recipe.ingredient(group[0]);
        let targets: Vec<SlotId> = group.iter().map(|index| range.first + index).collect();
        if fill_stacks {
            fill_crafting_grid(d, range.first, &ingredient, &targets);
        } else {
            move_one_recipe_item_into_grid(d, range.first, &ingredient, &targets);
        }
    }
    true
}

/// Fill the first crafting grid of the screen from `recipe`.
pub fn fill_first_grid(d: &mut ClickDispatcher<'_>, recipe: &RecipePattern, fill_stacks: bool) -> bool {
    match d.layout().first_crafting_output(d.container()) {
        Some(output) => fill_grid_from_recipe(d, recipe, output, fill_stacks),
        None => false,
    }
}

/// Spread the largest available stacks of `ingredient` over `targets` with
/// drag splits until no source is left or the cells are full.
///
/// Leftovers go back to the slot last picked up from, then to the first
/// source.
pub fn fill_crafting_grid(d: &mut ClickDispatcher<'_>, grid_first: SlotId, ingredient: &ItemStack, targets: &[SlotId]) {
    let mut slot_return: Option<SlotId> = None;
    let mut source = None;

    while let Some(next) = query::largest_matching_elsewhere(d.container(), grid_first, ingredient) {
        source = Some(next);
        let return_to = *slot_return.get_or_insert(next);

        d.left_click(next);
        if !d.cursor().matches(ingredient) {
            break;
        }
        let held = d.cursor().size();
        drag_split_into_slots(d, targets);

        if d.cursor().is_empty() {
            continue;
        }
        if d.cursor().size() >= held {
            break;
        }
        d.left_click(return_to);
        if !d.cursor().is_empty() {
            slot_return = Some(next);
            d.left_click(next);
        }
        if !d.cursor().is_empty() {
            break;
        }
    }

    for id in source.into_iter().chain(slot_return) {
        if d.cursor().is_empty() {
            break;
        }
        let target = d.container().stack(id);
        if target.is_empty() || target.matches(d.cursor()) {
            d.left_click(id);
        }
    }
}

/// Drag the cursor evenly over `targets`. A single target is a plain click.
pub fn drag_split_into_slots(d: &mut ClickDispatcher<'_>, targets: &[SlotId]) {
    match targets {
        [] => {}
        [single] => d.left_click(*single),
        _ => {
            d.drag_begin(DragMode::Even);
            for &id in targets {
                d.drag_add(id, DragMode::Even);
            }
            d.drag_end(DragMode::Even);
        }
    }
}

/// Put one unit of `ingredient` into every empty cell of `targets`.
pub fn move_one_recipe_item_into_grid(
    d: &mut ClickDispatcher<'_>,
    grid_first: SlotId,
    ingredient: &ItemStack,
    targets: &[SlotId],
) {
    let empty: Vec<SlotId> = targets
        .iter()
        .copied()
        .filter(|&id| !d.container().has_stack(id))
        .collect();
    let mut index = 0;

    while index < empty.len() {
        let needed = (empty.len() - index) as u32;
        let Some(source) = query::smallest_sufficient_elsewhere(d.container(), grid_first, ingredient, needed)
        else {
            break;
        };

        d.left_click(source);
        if !d.cursor().matches(ingredient) {
            if !d.cursor().is_empty() {
                d.left_click(source);
            }
            break;
        }
        let filled = put_single_item_into_slots(d, &empty[index..]);
        index += filled;

        if !d.cursor().is_empty() {
            d.left_click(source);
        }
        if filled == 0 {
            break;
        }
    }
}

/// Right-click successive `targets` while the cursor lasts. Returns the
/// number of cells clicked.
pub fn put_single_item_into_slots(d: &mut ClickDispatcher<'_>, targets: &[SlotId]) -> usize {
    let count = targets.len().min(d.cursor().size() as usize);
    for &id in &targets[..count] {
        d.right_click(id);
    }
    count
}

/// Quick-transfer the result out of `output` for as long as it matches the
/// recipe, refilling the grid one unit per cell whenever it runs dry.
/// Returns the number of transfers.
pub fn craft_as_many_as_possible(d: &mut ClickDispatcher<'_>, recipe: &RecipePattern, output: SlotId) -> usize {
    let result = recipe.result().clone();
    let mut transfers = 0;

    while d.container().stack(output).matches(&result) {
        if transfers >= CRAFT_AS_MANY_FAIL_SAFE {
            warn!(output, transfers, "crafting loop hit its fail-safe");
            break;
        }
        let before = d.container().stack(output);
        d.shift_click(output);
        transfers += 1;

        let after = d.container().stack(output);
        if !after.matches(&result) {
            fill_grid_from_recipe(d, recipe, output, false);
        } else if after.matches_exactly(&before) {
            debug!(output, "output unchanged, crafting is blocked");
            break;
        }
    }
    transfers
}

/// Clear the grid, fill it with whole stacks and craft until the ingredients
/// run out.
pub fn craft_everything_with_recipe(d: &mut ClickDispatcher<'_>, recipe: &RecipePattern, output: SlotId) -> bool {
    let Some(range) = d.layout().crafting_grid(d.container(), output) else {
        return false;
    };
    if !clear_grid(d, range) {
        return false;
    }
    fill_grid_from_recipe(d, recipe, output, true);
    if d.container().has_stack(output) {
        craft_as_many_as_possible(d, recipe, output);
    }
    true
}

/// Right-click the output repeatedly, collecting one full cursor stack.
pub fn right_click_craft_one_stack(d: &mut ClickDispatcher<'_>, output: SlotId) -> bool {
    let result = d.container().stack(output);
    if result.is_empty() || (!d.cursor().is_empty() && !d.cursor().matches(&result)) {
        return false;
    }

    for _ in 0..CRAFT_AS_MANY_FAIL_SAFE {
        let held = d.cursor().size();
        d.right_click(output);
        let cursor = d.cursor();
        if cursor.is_empty()
            || cursor.size() <= held
            || cursor.is_full()
            || !d.container().stack(output).matches(cursor)
        {
            break;
        }
    }
    !d.cursor().is_empty()
}

/// Shift-click every crafted result out of the player inventory into the
/// inventory above it.
pub fn move_all_crafting_results_to_other_inventory(d: &mut ClickDispatcher<'_>, recipe: &RecipePattern) -> bool {
    let result = recipe.result();
    if result.is_empty() {
        return false;
    }
    let container = d.container();
    let Some(first) = container
        .slots()
        .iter()
        .find(|slot| !slot.is_output() && slot.stack.matches(result) && container.inventory_exists_above(slot.id))
        .map(|slot| slot.id)
    else {
        return false;
    };

    let sources = query::matching_stacks(container, first, result, true, false, true, false);
    for id in sources {
        d.shift_click(id);
    }
    true
}

/// Throw every stack of the recipe's result outside the output's inventory.
pub fn throw_all_crafting_results(d: &mut ClickDispatcher<'_>, recipe: &RecipePattern, output: SlotId) {
    transfer::drop_stacks(d, recipe.result(), output, false);
}

/// Scroll over a crafting output with the selected recipe.
///
/// Towards the other inventory this takes results (one set, one stack, or
/// everything craftable); an empty output clears the grid. The other way it
/// fills the grid from the recipe.
pub fn scroll_crafting(
    d: &mut ClickDispatcher<'_>,
    recipe: &RecipePattern,
    output: SlotId,
    to_other: bool,
    stacks: bool,
    everything: bool,
) -> bool {
    if !to_other {
        return recipe.is_valid() && fill_grid_from_recipe(d, recipe, output, stacks);
    }

    let current = d.container().stack(output);
    if current.matches(recipe.result()) {
        if everything {
            craft_as_many_as_possible(d, recipe, output);
        } else if stacks {
            d.shift_click(output);
        } else {
            transfer::move_one_set_to_player_inventory(d, output);
        }
        true
    } else if current.is_empty() {
        match d.layout().crafting_grid(d.container(), output) {
            Some(range) => clear_grid(d, range),
            None => false,
        }
    } else {
        false
    }
}

/// React to a click on recipe entry `hovered`.
///
/// Left and right select the recipe (clearing the grid when the selection
/// changes) and fill the first grid, whole stacks with shift. Right also
/// takes the result: thrown with the drop key, shift-clicked with shift,
/// otherwise one set into the player inventory. Pick-block clears the grid.
pub fn handle_recipe_click(
    d: &mut ClickDispatcher<'_>,
    recipes: &mut RecipeStorage,
    hovered: usize,
    click: RecipeClick,
    config: &EngineConfig,
) -> bool {
    if hovered >= recipes.capacity() {
        return false;
    }
    let Some(output) = d.layout().first_crafting_output(d.container()) else {
        return false;
    };
    let Some(range) = d.layout().crafting_grid(d.container(), output) else {
        return false;
    };

    if click.button == RecipeButton::PickBlock {
        return clear_grid(d, range);
    }

    let changed = recipes.selection() != hovered;
    recipes.change_selection(hovered);
    if changed {
        clear_grid(d, range);
    }

    let recipe = recipes.recipe(hovered).clone();
    fill_grid_from_recipe(d, &recipe, output, click.shift);

    if click.button == RecipeButton::Right {
        if click.drop_key {
            if !click.shift {
                d.drop_one(output);
            } else if config.carpet_ctrl_q_crafting {
                d.drop_stack(output);
            } else {
                transfer::drop_stacks_until_empty(d, output);
            }
        } else if click.shift {
            d.shift_click(output);
        } else {
            transfer::move_one_set_to_player_inventory(d, output);
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::click::ClickOp;
    use crate::layout::Layout;
    use crate::predict::refresh_outputs;
    use stackshift_core::{Container, InventoryId, ItemId, Slot, SlotKind};

    const PLANKS: ItemId = ItemId(1);
    const STICK: ItemId = ItemId(2);
    const LOG: ItemId = ItemId(3);

    /// Output 0, 2x1 grid 1..=2, nine player slots.
    struct StickBench;

    impl Layout for StickBench {
        fn crafting_grid(&self, _container: &Container, slot: SlotId) -> Option<SlotRange> {
            (slot == 0).then(|| SlotRange::new(1, 2))
        }

        fn craft_result(&self, container: &Container, range: SlotRange) -> ItemStack {
            if range.iter().all(|id| container.stack(id).item == PLANKS) {
                ItemStack::new(STICK, 4)
            } else {
                ItemStack::empty()
            }
        }
    }

    fn bench() -> Container {
        let mut slots = vec![Slot::new(0, InventoryId(2), 0, 124, 35).with_kind(SlotKind::CraftingOutput)];
        slots.push(Slot::new(0, InventoryId(0), 0, 30, 17));
        slots.push(Slot::new(0, InventoryId(0), 1, 30, 35));
        for index in 0..9 {
            slots.push(Slot::new(0, InventoryId(1), index, 8 + index as i32 * 18, 142));
        }
        Container::new(1, slots).with_player_inventory(InventoryId(1))
    }

    fn stick_recipe() -> RecipePattern {
        let mut recipe = RecipePattern::with_grid_size(2);
        recipe.set(vec![ItemStack::new(PLANKS, 1), ItemStack::new(PLANKS, 1)], ItemStack::new(STICK, 4));
        recipe
    }

    fn run<R>(container: &mut Container, f: impl FnOnce(&mut ClickDispatcher<'_>) -> R) -> R {
        refresh_outputs(container, &StickBench);
        let mut sent: Vec<ClickOp> = Vec::new();
        let mut dispatcher = ClickDispatcher::new(container, &StickBench, &mut sent);
        f(&mut dispatcher)
    }

    #[test]
    fn one_per_cell_fill() {
        let mut container = bench();
        container.set_stack(3, ItemStack::new(PLANKS, 10));
        assert!(run(&mut container, |d| fill_grid_from_recipe(d, &stick_recipe(), 0, false)));

        assert_eq!(container.count(1), 1);
        assert_eq!(container.count(2), 1);
        assert_eq!(container.count(3), 8);
        assert_eq!(container.stack(0).item, STICK);
        assert!(container.cursor().is_empty());
    }

    #[test]
    fn stack_fill_spreads_evenly() {
        let mut container = bench();
        container.set_stack(3, ItemStack::new(PLANKS, 10));
        container.set_stack(4, ItemStack::new(PLANKS, 3));
        let total = container.total_units();
        run(&mut container, |d| fill_grid_from_recipe(d, &stick_recipe(), 0, true));

        assert_eq!(container.count(1) + container.count(2) + container.count(3) + container.count(4), 13);
        assert_eq!(container.count(1), 7);
        assert_eq!(container.count(2), 6);
        assert!(container.stack(1).item == PLANKS && container.stack(2).item == PLANKS);
        assert!(container.cursor().is_empty());
        assert_eq!(container.total_units() - u64::from(container.count(0)), total);
    }

    #[test]
    fn stack_fill_returns_leftovers_to_last_source() {
        let mut container = bench();
        container.set_stack(1, ItemStack::new(PLANKS, 62));
        container.set_stack(2, ItemStack::new(PLANKS, 62));
        container.set_stack(3, ItemStack::new(PLANKS, 64));
        container.set_stack(4, ItemStack::new(PLANKS, 63));
        let total = container.total_units() - u64::from(container.count(0));
        run(&mut container, |d| fill_grid_from_recipe(d, &stick_recipe(), 0, true));

        assert!(container.cursor().is_empty());
        assert_eq!(container.count(1), 64);
        assert_eq!(container.count(2), 64);
        assert_eq!(container.count(3), 60);
        assert_eq!(container.count(4), 63);
        assert_eq!(container.total_units() - u64::from(container.count(0)), total);
    }

    #[test]
    fn stack_fill_draws_on_several_sources() {
        let mut container = bench();
        container.set_stack(1, ItemStack::new(PLANKS, 40));
        container.set_stack(2, ItemStack::new(PLANKS, 40));
        container.set_stack(3, ItemStack::new(PLANKS, 20));
        container.set_stack(4, ItemStack::new(PLANKS, 30));
        container.set_stack(5, ItemStack::new(PLANKS, 5));
        run(&mut container, |d| fill_grid_from_recipe(d, &stick_recipe(), 0, true));

        assert!(container.cursor().is_empty());
        assert_eq!(container.count(1), 64);
        assert_eq!(container.count(2), 64);
        assert_eq!(container.count(3), 0);
        assert_eq!(container.count(4), 2);
        assert_eq!(container.count(5), 5);
    }

    #[test]
    fn foreign_grid_items_are_cleared_first() {
        let mut container = bench();
        container.set_stack(1, ItemStack::new(LOG, 2));
        container.set_stack(3, ItemStack::new(PLANKS, 4));
        run(&mut container, |d| fill_grid_from_recipe(d, &stick_recipe(), 0, false));

        assert_eq!(container.stack(1).item, PLANKS);
        assert_eq!(container.stack(4).item, LOG);
        assert_eq!(container.count(4), 2);
    }

    #[test]
    fn crafting_drains_all_ingredients() {
        let mut container = bench();
        container.set_stack(3, ItemStack::new(PLANKS, 6));
        let crafts = run(&mut container, |d| {
            fill_grid_from_recipe(d, &stick_recipe(), 0, false);
            craft_as_many_as_possible(d, &stick_recipe(), 0)
        });

        assert!(crafts <= CRAFT_AS_MANY_FAIL_SAFE);
        assert_eq!(crafts, 3);
        let sticks: u32 = (3..12).filter(|&id| container.stack(id).item == STICK).map(|id| container.count(id)).sum();
        assert_eq!(sticks, 12);
        assert!(!container.has_stack(1));
        assert!(!container.has_stack(0));
    }

    #[test]
    fn invalid_recipe_does_nothing() {
        let mut container = bench();
        container.set_stack(3, ItemStack::new(PLANKS, 6));
        let filled = run(&mut container, |d| fill_grid_from_recipe(d, &RecipePattern::with_grid_size(2), 0, true));
        assert!(!filled);
        assert_eq!(container.count(3), 6);
    }

    #[test]
    fn right_click_collects_one_stack() {
        let mut container = bench();
        container.set_stack(1, ItemStack::new(PLANKS, 20));
        container.set_stack(2, ItemStack::new(PLANKS, 20));
        run(&mut container, |d| right_click_craft_one_stack(d, 0));

        assert_eq!(container.cursor().item, STICK);
        assert_eq!(container.cursor().count, 64);
        assert_eq!(container.count(1), 4);
    }
}
