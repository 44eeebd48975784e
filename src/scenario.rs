//! Scripted gesture scenarios run against the simulated peer.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use stackshift_core::{ItemStack, SlotId};
use stackshift_engine::{
    handle_recipe_click, pickup, try_move_items, DragSession, Layout, MoveAction, PickupTracker,
    RecipeClick, ScrollModifiers,
};
use stackshift_storage::{ActorId, RecipeStorage, SaveScope, VillagerDataStorage};
use stackshift_testkit::fixtures::{self, Items};
use stackshift_testkit::Bench;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenName {
    Chest,
    CraftingTable,
    Player,
    Merchant,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlotFill {
    pub slot: SlotId,
    pub item: String,
    pub count: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Scroll {
        slot: SlotId,
        up: bool,
        #[serde(default)]
        modifiers: ScrollModifiers,
    },
    /// Pointer path of one drag; the first point is the click.
    Drag {
        action: MoveAction,
        path: Vec<(i32, i32)>,
    },
    Release,
    RecipeClick {
        index: usize,
        click: RecipeClick,
    },
    StoreRecipe {
        index: usize,
    },
    PickUp {
        slot: SlotId,
    },
    ShiftDrop,
    ShiftPlace {
        slot: SlotId,
    },
    FavoriteTrade {
        actor: u64,
        index: u32,
        #[serde(default)]
        global: bool,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub screen: ScreenName,
    #[serde(default = "default_rows")]
    pub rows: usize,
    #[serde(default)]
    pub slots: Vec<SlotFill>,
    pub steps: Vec<Step>,
}

fn default_rows() -> usize {
    3
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("failed to read scenario {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| format!("failed to parse scenario {}", path.display()))
    }
}

/// Everything a scenario touches while it runs.
pub struct Runner<'a> {
    config: &'a AppConfig,
    items: Items,
    bench: Bench,
    recipes: RecipeStorage,
    villagers: VillagerDataStorage,
    session: DragSession,
    tracker: PickupTracker,
}

impl<'a> Runner<'a> {
    pub fn new(config: &'a AppConfig, scenario: &Scenario) -> Result<Self> {
        let items = Items::new()?;
        let fixture = match scenario.screen {
            ScreenName::Chest => fixtures::chest(scenario.rows),
            ScreenName::CraftingTable => fixtures::crafting_table(&items),
            ScreenName::Player => fixtures::player_screen(&items),
            ScreenName::Merchant => fixtures::merchant(&items),
        };
        let mut bench = Bench::from_fixture(fixture);

        for fill in &scenario.slots {
            let item = items
                .registry
                .resolve(&fill.item)
                .with_context(|| format!("unknown item {}", fill.item))?;
            if fill.slot >= bench.container.len() {
                bail!("slot {} is outside the {} slot screen", fill.slot, bench.container.len());
            }
            bench.set_stack(fill.slot, items.stack(item, fill.count));
        }

        let mut recipes = RecipeStorage::new(config.engine.recipe_count, config.recipe_scope());
        let scope = SaveScope::from_world_or_server(config.world.as_deref(), config.server.as_deref());
        let mut villagers = VillagerDataStorage::new(scope);
        if let Some(dir) = &config.save_dir {
            recipes.read_from_disk(dir);
            villagers.read_from_disk(dir, &items.registry);
        }

        Ok(Self {
            config,
            items,
            bench,
            recipes,
            villagers,
            session: DragSession::new(),
            tracker: PickupTracker::new(),
        })
    }

    pub fn bench(&self) -> &Bench {
        &self.bench
    }

    pub fn run_step(&mut self, step: &Step) -> Result<bool> {
        debug!(?step, "scenario step");
        let config = self.config;
        let engine = &config.engine;
        let handled = match step {
            Step::Scroll { slot, up, modifiers } => {
                let recipe = self.recipes.selected_recipe().clone();
                self.bench
                    .run(|d| try_move_items(d, engine, &recipe, Some(*slot), *up, *modifiers))
            }
            Step::Drag { action, path } => {
                let session = &mut self.session;
                self.bench.run(|d| {
                    path.iter().enumerate().fold(false, |handled, (index, &(x, y))| {
                        session.update(d, *action, x, y, index == 0) || handled
                    })
                })
            }
            Step::Release => {
                self.session.stop();
                true
            }
            Step::RecipeClick { index, click } => {
                let recipes = &mut self.recipes;
                self.bench
                    .run(|d| handle_recipe_click(d, recipes, *index, *click, engine))
            }
            Step::StoreRecipe { index } => {
                let Some(output) = self.bench.layout.crafting_output() else {
                    bail!("store_recipe needs a crafting screen");
                };
                let Some(range) = self.bench.layout.crafting_grid(&self.bench.container, output) else {
                    bail!("crafting output {output} has no grid");
                };
                self.recipes.store_recipe(*index, &self.bench.container, output, range, true);
                self.recipes.change_selection(*index);
                true
            }
            Step::PickUp { slot } => {
                self.tracker.store_candidate(&self.bench.container, Some(*slot));
                self.bench.run(|d| d.left_click(*slot));
                self.tracker.check_for_pickup(&self.bench.container);
                !self.bench.container.cursor().is_empty()
            }
            Step::ShiftDrop => {
                let tracker = &self.tracker;
                self.bench.run(|d| pickup::shift_drop_items(d, tracker))
            }
            Step::ShiftPlace { slot } => {
                if !pickup::can_shift_place_items(&self.bench.container, Some(*slot)) {
                    false
                } else {
                    let session = &mut self.session;
                    self.bench.run(|d| pickup::shift_place_items(d, session, *slot))
                }
            }
            Step::FavoriteTrade { actor, index, global } => {
                self.villagers.data_for(Some(ActorId(*actor)), true);
                self.villagers.set_last_interacted(ActorId(*actor));
                if *global {
                    let Some(offer) = self.bench.layout.selected_trade() else {
                        bail!("favorite_trade with global needs a merchant screen");
                    };
                    self.villagers.toggle_global_favorite(&offer);
                } else {
                    self.villagers.toggle_favorite(*index);
                }
                true
            }
        };
        Ok(handled)
    }

    /// Run every step, then persist recipes and favorites when a save
    /// directory is configured.
    pub fn run(&mut self, scenario: &Scenario) -> Result<usize> {
        let mut handled = 0;
        for step in &scenario.steps {
            if self.run_step(step)? {
                handled += 1;
            }
        }
        self.session.stop();

        if let Some(dir) = &self.config.save_dir {
            self.recipes.write_to_disk(dir);
            self.villagers.write_to_disk(dir, &self.items.registry);
        }
        info!(steps = scenario.steps.len(), handled, ops = self.bench.ops().len(), "scenario finished");
        Ok(handled)
    }

    /// Human-readable summary of the final state.
    pub fn report(&self) -> String {
        let container = &self.bench.container;
        let mut lines = Vec::new();
        for slot in container.slots().iter().filter(|slot| slot.has_stack()) {
            lines.push(format!("slot {:>3}: {}", slot.id, self.describe(&slot.stack)));
        }
        if !container.cursor().is_empty() {
            lines.push(format!("cursor  : {}", self.describe(container.cursor())));
        }
        if let Some(output) = self.bench.layout.crafting_output() {
            let recipe = self.recipes.selected_recipe();
            if recipe.is_valid() {
                let state = if container.has_stack(output) { "ready" } else { "empty" };
                lines.push(format!(
                    "recipe {}: {} (output {state})",
                    self.recipes.selection(),
                    self.describe(recipe.result()),
                ));
            }
        }
        let offers: Vec<_> = self.bench.layout.selected_trade().into_iter().collect();
        let favorites = self
            .villagers
            .favorites_for_current(&offers, self.config.engine.villager_trade_use_global_favorites);
        if !favorites.indices.is_empty() {
            lines.push(format!("favorites: {:?} (global: {})", favorites.indices, favorites.is_global));
        }
        lines.push(format!("ops sent: {}", self.bench.ops().len()));
        lines.push(format!("peer agrees: {}", if self.bench.in_sync() { "yes" } else { "no" }));
        lines.join("\n")
    }

    fn describe(&self, stack: &ItemStack) -> String {
        let name = self
            .items
            .registry
            .key_of(stack.item)
            .map(ToString::to_string)
            .unwrap_or_else(|| stack.item.to_string());
        format!("{name} x{}", stack.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(json: &str) -> Scenario {
        serde_json::from_str(json).expect("scenario parses")
    }

    #[test]
    fn scroll_scenario_moves_one_unit() {
        let config = AppConfig::default();
        let scenario = scenario(
            r#"{
                "screen": "chest",
                "slots": [{ "slot": 0, "item": "iron_ingot", "count": 5 }],
                "steps": [{ "op": "scroll", "slot": 0, "up": true }]
            }"#,
        );
        let mut runner = Runner::new(&config, &scenario).expect("runner");
        assert_eq!(runner.run(&scenario).expect("run"), 1);

        assert_eq!(runner.bench().container.count(0), 4);
        assert_eq!(runner.bench().container.count(27), 1);
        assert!(runner.report().contains("peer agrees: yes"));
    }

    #[test]
    fn stored_recipe_drives_scroll_fill() {
        let config = AppConfig::default();
        let scenario = scenario(
            r#"{
                "screen": "crafting_table",
                "slots": [
                    { "slot": 1, "item": "oak_planks", "count": 1 },
                    { "slot": 4, "item": "oak_planks", "count": 1 },
                    { "slot": 10, "item": "oak_planks", "count": 6 }
                ],
                "steps": [
                    { "op": "store_recipe", "index": 2 },
                    { "op": "scroll", "slot": 0, "up": true, "modifiers": { "everything": true } }
                ]
            }"#,
        );
        let mut runner = Runner::new(&config, &scenario).expect("runner");
        runner.run(&scenario).expect("run");

        let container = &runner.bench().container;
        let sticks: u32 = container
            .slots()
            .iter()
            .filter(|slot| !slot.is_output() && slot.stack.item == runner.items.stick)
            .map(|slot| slot.stack.size())
            .sum();
        assert_eq!(sticks, 16);
        assert!(runner.bench().in_sync());
    }

    #[test]
    fn recipes_persist_to_save_dir() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = AppConfig {
            save_dir: Some(dir.path().to_path_buf()),
            ..AppConfig::default()
        };
        let scenario = scenario(
            r#"{
                "screen": "crafting_table",
                "slots": [
                    { "slot": 1, "item": "oak_planks", "count": 1 },
                    { "slot": 4, "item": "oak_planks", "count": 1 }
                ],
                "steps": [{ "op": "store_recipe", "index": 0 }]
            }"#,
        );
        let mut runner = Runner::new(&config, &scenario).expect("runner");
        runner.run(&scenario).expect("run");

        let mut reloaded = RecipeStorage::new(config.engine.recipe_count, config.recipe_scope());
        reloaded.read_from_disk(dir.path());
        assert!(reloaded.recipe(0).is_valid());
    }

    #[test]
    fn unknown_item_is_an_error() {
        let config = AppConfig::default();
        let scenario = scenario(
            r#"{ "screen": "chest", "slots": [{ "slot": 0, "item": "unobtainium", "count": 1 }], "steps": [] }"#,
        );
        assert!(Runner::new(&config, &scenario).is_err());
    }
}
