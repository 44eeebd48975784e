//! Property-based tests for gesture transfers.
//!
//! Critical properties:
//! - Non-drop gestures never create or destroy units (cursor included)
//! - No slot ever holds more than its stack limit
//! - The client's prediction always agrees with the simulated peer
//! - Filling a crafting grid with whole stacks never leaves items on the cursor

use proptest::prelude::*;
use stackshift_core::{ItemId, ItemStack};
use stackshift_engine::{crafting, drag, try_move_items, EngineConfig, MoveAction, ScrollModifiers};
use stackshift_storage::RecipePattern;
use stackshift_testkit::fixtures::{self, Items};
use stackshift_testkit::Bench;

const SLOTS: usize = 9 + fixtures::PLAYER_SLOTS;

#[derive(Debug, Clone)]
enum Gesture {
    Scroll {
        slot: usize,
        up: bool,
        modifiers: ScrollModifiers,
    },
    Action {
        slot: usize,
        action: MoveAction,
    },
}

fn modifiers() -> impl Strategy<Value = ScrollModifiers> {
    prop_oneof![
        Just(ScrollModifiers::default()),
        Just(ScrollModifiers {
            stacks: true,
            ..ScrollModifiers::default()
        }),
        Just(ScrollModifiers {
            matching: true,
            ..ScrollModifiers::default()
        }),
        Just(ScrollModifiers {
            everything: true,
            ..ScrollModifiers::default()
        }),
    ]
}

fn keeping_action() -> impl Strategy<Value = MoveAction> {
    prop_oneof![
        Just(MoveAction::MoveToOtherMoveOne),
        Just(MoveAction::MoveToOtherLeaveOne),
        Just(MoveAction::MoveToOtherStacks),
        Just(MoveAction::MoveToOtherMatching),
        Just(MoveAction::MoveUpMoveOne),
        Just(MoveAction::MoveUpLeaveOne),
        Just(MoveAction::MoveUpStacks),
        Just(MoveAction::MoveUpMatching),
        Just(MoveAction::MoveDownMoveOne),
        Just(MoveAction::MoveDownLeaveOne),
        Just(MoveAction::MoveDownStacks),
        Just(MoveAction::MoveDownMatching),
    ]
}

fn gesture() -> impl Strategy<Value = Gesture> {
    prop_oneof![
        (0..SLOTS, any::<bool>(), modifiers()).prop_map(|(slot, up, modifiers)| Gesture::Scroll {
            slot,
            up,
            modifiers
        }),
        (0..SLOTS, keeping_action()).prop_map(|(slot, action)| Gesture::Action { slot, action }),
    ]
}

fn contents() -> impl Strategy<Value = Vec<(usize, usize, u32)>> {
    prop::collection::vec((0..SLOTS, 0..3usize, 1..=64u32), 0..24)
}

fn bench_with(items: &Items, contents: &[(usize, usize, u32)]) -> Bench {
    let kinds: [ItemId; 3] = [items.iron, items.pearl, items.sword];
    let mut bench = Bench::from_fixture(fixtures::chest(1));
    for &(slot, kind, count) in contents {
        let template = items.stack(kinds[kind], 1);
        bench.set_stack(slot, template.copy_with_count(count.min(template.max_stack)));
    }
    bench
}

fn run(bench: &mut Bench, gesture: &Gesture) {
    let config = EngineConfig::default();
    let recipe = RecipePattern::new();
    match gesture.clone() {
        Gesture::Scroll { slot, up, modifiers } => {
            bench.run(|d| try_move_items(d, &config, &recipe, Some(slot), up, modifiers));
        }
        Gesture::Action { slot, action } => {
            bench.run(|d| drag::apply_action(d, action, slot));
        }
    }
}

/// First player slot on the crafting table.
const TABLE_PLAYER_FIRST: usize = 10;

fn stick_recipe(items: &Items) -> RecipePattern {
    let mut ingredients = vec![ItemStack::empty(); 9];
    ingredients[0] = items.stack(items.planks, 1);
    ingredients[3] = items.stack(items.planks, 1);
    let mut recipe = RecipePattern::with_grid_size(9);
    recipe.set(ingredients, items.stack(items.stick, 4));
    recipe
}

fn units_outside_outputs(bench: &Bench) -> u64 {
    let container = &bench.container;
    let stored: u64 = container
        .slots()
        .iter()
        .filter(|slot| !slot.is_output())
        .map(|slot| u64::from(slot.stack.size()))
        .sum();
    stored + u64::from(container.cursor().size())
}

fn within_limits(bench: &Bench) -> bool {
    bench
        .container
        .slots()
        .iter()
        .all(|slot| slot.stack.size() <= slot.max_stack_for(&slot.stack))
}

proptest! {
    /// Property: Units are conserved across any sequence of non-drop gestures
    #[test]
    fn gestures_conserve_units(
        contents in contents(),
        gestures in prop::collection::vec(gesture(), 1..12),
    ) {
        let items = Items::new().expect("items");
        let mut bench = bench_with(&items, &contents);
        let total = bench.total_units();

        for gesture in &gestures {
            run(&mut bench, gesture);
            prop_assert_eq!(bench.total_units(), total);
            prop_assert_eq!(bench.container.total_units(), total);
        }
    }

    /// Property: Stack limits hold and both sides agree after every gesture
    #[test]
    fn gestures_keep_limits_and_agreement(
        contents in contents(),
        gestures in prop::collection::vec(gesture(), 1..12),
    ) {
        let items = Items::new().expect("items");
        let mut bench = bench_with(&items, &contents);

        for gesture in &gestures {
            run(&mut bench, gesture);
            prop_assert!(within_limits(&bench));
            prop_assert!(bench.in_sync());
        }
    }

    /// Property: A single-unit scroll into an empty player inventory moves
    /// exactly one unit and leaves the cursor empty
    #[test]
    fn single_scroll_moves_exactly_one(
        slot in 0..9usize,
        count in 1..=64u32,
    ) {
        let items = Items::new().expect("items");
        let mut bench = Bench::from_fixture(fixtures::chest(1));
        bench.set_stack(slot, ItemStack::new(items.iron, count));

        let config = EngineConfig::default();
        let recipe = RecipePattern::new();
        bench.run(|d| try_move_items(d, &config, &recipe, Some(slot), true, ScrollModifiers::default()));

        prop_assert_eq!(bench.container.count(slot), count - 1);
        prop_assert!(bench.container.cursor().is_empty());
    }

    /// Property: A whole-stack grid fill returns every leftover, whatever the
    /// source layout and the cells already hold
    #[test]
    fn stack_fill_leaves_cursor_empty(
        sources in prop::collection::vec((0..fixtures::PLAYER_SLOTS, any::<bool>(), 1..=64u32), 1..16),
        first_cell in 0..=64u32,
        second_cell in 0..=64u32,
    ) {
        let items = Items::new().expect("items");
        let mut bench = Bench::from_fixture(fixtures::crafting_table(&items));
        for &(offset, planks, count) in &sources {
            let item = if planks { items.planks } else { items.iron };
            bench.set_stack(TABLE_PLAYER_FIRST + offset, items.stack(item, count));
        }
        if first_cell > 0 {
            bench.set_stack(1, items.stack(items.planks, first_cell));
        }
        if second_cell > 0 {
            bench.set_stack(4, items.stack(items.planks, second_cell));
        }
        let total = units_outside_outputs(&bench);
        let recipe = stick_recipe(&items);

        bench.run(|d| crafting::fill_grid_from_recipe(d, &recipe, 0, true));

        prop_assert!(bench.container.cursor().is_empty());
        prop_assert_eq!(units_outside_outputs(&bench), total);
        prop_assert!(within_limits(&bench));
        prop_assert!(bench.in_sync());
    }
}
