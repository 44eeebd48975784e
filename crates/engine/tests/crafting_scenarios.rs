//! Scenario: recipe-driven crafting and trading against the simulated peer.
//!
//! Validates:
//! - Scroll fills the grid one unit per cell from the selected recipe
//! - Crafting everything drains the ingredients and conserves units
//! - Recipe clicks fill the grid and collect one set
//! - Merchant price slots fill from the player inventory
//! - Trades taken by stacks land in the player inventory

use stackshift_core::{ItemStack, SlotRange};
use stackshift_engine::{
    crafting, handle_recipe_click, try_move_items, EngineConfig, RecipeButton, RecipeClick,
    ScrollModifiers,
};
use stackshift_storage::{RecipePattern, RecipeStorage, SaveScope};
use stackshift_testkit::fixtures::{self, Items};
use stackshift_testkit::Bench;

/// First player slot on the crafting table.
const PLAYER_FIRST: usize = 10;
const GRID: SlotRange = SlotRange { first: 1, last: 9 };

fn stick_recipe(items: &Items) -> RecipePattern {
    let mut ingredients = vec![ItemStack::empty(); 9];
    ingredients[0] = items.stack(items.planks, 1);
    ingredients[3] = items.stack(items.planks, 1);
    let mut recipe = RecipePattern::with_grid_size(9);
    recipe.set(ingredients, items.stack(items.stick, 4));
    recipe
}

fn units_of(bench: &Bench, item: stackshift_core::ItemId) -> u32 {
    bench
        .container
        .slots()
        .iter()
        .filter(|slot| slot.stack.item == item && !slot.is_output())
        .map(|slot| slot.stack.size())
        .sum()
}

#[test]
fn scroll_fills_then_crafts_everything() {
    let items = Items::new().expect("items");
    let mut bench = Bench::from_fixture(fixtures::crafting_table(&items));
    bench.set_stack(PLAYER_FIRST, items.stack(items.planks, 10));
    let recipe = stick_recipe(&items);
    let config = EngineConfig::default();

    let filled = bench.run(|d| try_move_items(d, &config, &recipe, Some(0), false, ScrollModifiers::default()));
    assert!(filled);
    assert_eq!(bench.container.count(1), 1);
    assert_eq!(bench.container.count(4), 1);
    assert_eq!(bench.container.count(PLAYER_FIRST), 8);
    assert_eq!(bench.container.stack(0).item, items.stick);

    let everything = ScrollModifiers {
        everything: true,
        ..ScrollModifiers::default()
    };
    assert!(bench.run(|d| try_move_items(d, &config, &recipe, Some(0), true, everything)));

    assert_eq!(units_of(&bench, items.planks), 0);
    assert_eq!(units_of(&bench, items.stick), 20);
    assert!(!bench.container.has_stack(0));
    assert!(bench.in_sync());
}

#[test]
fn crafting_loop_stops_without_ingredients() {
    let items = Items::new().expect("items");
    let mut bench = Bench::from_fixture(fixtures::crafting_table(&items));
    bench.set_stack(1, items.stack(items.planks, 1));
    bench.set_stack(4, items.stack(items.planks, 1));
    let recipe = stick_recipe(&items);

    let transfers = bench.run(|d| crafting::craft_as_many_as_possible(d, &recipe, 0));

    assert_eq!(transfers, 1);
    assert!(transfers <= crafting::CRAFT_AS_MANY_FAIL_SAFE);
    assert_eq!(units_of(&bench, items.stick), 4);
}

#[test]
fn stored_recipe_click_collects_one_set() {
    let items = Items::new().expect("items");
    let mut bench = Bench::from_fixture(fixtures::crafting_table(&items));
    bench.set_stack(1, items.stack(items.planks, 1));
    bench.set_stack(4, items.stack(items.planks, 1));

    let mut recipes = RecipeStorage::new(9, SaveScope::Global);
    recipes.store_recipe(0, &bench.container, 0, GRID, false);
    assert!(recipes.recipe(0).is_valid());

    bench.set_stack(1, ItemStack::empty());
    bench.set_stack(4, ItemStack::empty());
    bench.set_stack(PLAYER_FIRST, items.stack(items.planks, 8));

    let click = RecipeClick {
        button: RecipeButton::Right,
        shift: false,
        drop_key: false,
    };
    let config = EngineConfig::default();
    assert!(bench.run(|d| handle_recipe_click(d, &mut recipes, 0, click, &config)));

    assert_eq!(bench.container.count(PLAYER_FIRST), 6);
    assert_eq!(bench.container.stack(PLAYER_FIRST + 1).item, items.stick);
    assert_eq!(bench.container.count(PLAYER_FIRST + 1), 4);
    assert!(GRID.iter().all(|id| !bench.container.has_stack(id)));
    assert!(bench.container.cursor().is_empty());
    assert!(bench.in_sync());
}

#[test]
fn merchant_fill_and_take_by_stacks() {
    let items = Items::new().expect("items");
    let mut bench = Bench::from_fixture(fixtures::merchant(&items));
    let player_first = 3;
    bench.set_stack(player_first, items.stack(items.emerald, 20));
    let config = EngineConfig::default();
    let recipe = RecipePattern::new();
    let stacks = ScrollModifiers {
        stacks: true,
        ..ScrollModifiers::default()
    };

    assert!(bench.run(|d| try_move_items(d, &config, &recipe, Some(2), false, stacks)));
    assert_eq!(bench.container.count(0), 20);
    assert_eq!(bench.container.stack(2).item, items.book);

    bench.run(|d| try_move_items(d, &config, &recipe, Some(2), true, stacks));

    assert!(!bench.container.has_stack(0));
    assert!(!bench.container.has_stack(2));
    assert_eq!(units_of(&bench, items.book), 4);
    assert!(bench.in_sync());
}
