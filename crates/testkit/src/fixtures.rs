//! Ready-made items and screens.

use crate::layout::{GridRecipe, StandardLayout};
use anyhow::Result;
use stackshift_core::{
    Container, InventoryId, ItemId, ItemRegistry, ItemStack, RegistryKey, Slot, SlotKind, SlotRange,
};
use stackshift_storage::TradeOffer;

/// Inventory id of the player inventory on every standard screen.
pub const PLAYER_INVENTORY: InventoryId = InventoryId(100);

/// Player inventory slots shown on a screen: 27 main slots then 9 hot-bar.
pub const PLAYER_SLOTS: usize = 36;

/// Item types used by the standard fixtures.
#[derive(Debug, Clone)]
pub struct Items {
    /// Registry holding every item below.
    pub registry: ItemRegistry,
    pub iron: ItemId,
    pub gold: ItemId,
    pub dirt: ItemId,
    pub log: ItemId,
    pub planks: ItemId,
    pub stick: ItemId,
    pub emerald: ItemId,
    pub book: ItemId,
    pub pearl: ItemId,
    pub sword: ItemId,
}

impl Items {
    /// Register the standard item set.
    pub fn new() -> Result<Self> {
        let mut registry = ItemRegistry::new();
        let mut add = |name: &str, max_stack: u32| -> Result<ItemId> {
            Ok(registry.register(RegistryKey::parse(name)?, max_stack))
        };
        let iron = add("iron_ingot", 64)?;
        let gold = add("gold_ingot", 64)?;
        let dirt = add("dirt", 64)?;
        let log = add("oak_log", 64)?;
        let planks = add("oak_planks", 64)?;
        let stick = add("stick", 64)?;
        let emerald = add("emerald", 64)?;
        let book = add("enchanted_book", 1)?;
        let pearl = add("ender_pearl", 16)?;
        let sword = add("iron_sword", 1)?;
        Ok(Self {
            registry,
            iron,
            gold,
            dirt,
            log,
            planks,
            stick,
            emerald,
            book,
            pearl,
            sword,
        })
    }

    /// Stack of `count` units with the item's registered limit.
    pub fn stack(&self, item: ItemId, count: u32) -> ItemStack {
        self.registry.stack(item, count)
    }

    /// Recipes for a square grid `width` cells wide: planks above planks make
    /// four sticks, a log makes four planks.
    pub fn recipes(&self, width: usize) -> Vec<GridRecipe> {
        let mut sticks = vec![None; width * width];
        sticks[0] = Some(self.planks);
        sticks[width] = Some(self.planks);
        vec![
            GridRecipe::shaped(sticks, self.stack(self.stick, 4)),
            GridRecipe::shapeless(vec![self.log], self.stack(self.planks, 4)),
        ]
    }

    /// Five emeralds buy one enchanted book.
    pub fn book_trade(&self) -> TradeOffer {
        TradeOffer::new(
            self.stack(self.emerald, 5),
            ItemStack::empty(),
            self.stack(self.book, 1),
        )
    }
}

fn push_player_slots(slots: &mut Vec<Slot>, left: i32, top: i32) {
    for row in 0..3 {
        for column in 0..9 {
            let index = 9 + row * 9 + column;
            slots.push(Slot::new(
                0,
                PLAYER_INVENTORY,
                index,
                left + column as i32 * 18,
                top + row as i32 * 18,
            ));
        }
    }
    for column in 0..9 {
        slots.push(Slot::new(0, PLAYER_INVENTORY, column, left + column as i32 * 18, top + 58));
    }
}

/// First slot id of the player's hot-bar on a screen with `other` non-player
/// slots in front.
pub fn hotbar_start(other: usize) -> usize {
    other + 27
}

/// A chest with `rows` rows of nine slots over the player inventory.
pub fn chest(rows: usize) -> (Container, StandardLayout) {
    let mut slots = Vec::new();
    for row in 0..rows {
        for column in 0..9 {
            slots.push(Slot::new(
                0,
                InventoryId(0),
                row * 9 + column,
                8 + column as i32 * 18,
                18 + row as i32 * 18,
            ));
        }
    }
    push_player_slots(&mut slots, 8, 32 + rows as i32 * 18);
    let container = Container::new(1, slots).with_player_inventory(PLAYER_INVENTORY);
    (container, StandardLayout::chest())
}

/// A crafting table: output slot 0, a 3x3 grid in slots 1..=9, then the
/// player inventory.
pub fn crafting_table(items: &Items) -> (Container, StandardLayout) {
    let mut slots = vec![Slot::new(0, InventoryId(2), 0, 124, 35).with_kind(SlotKind::CraftingOutput)];
    for row in 0..3 {
        for column in 0..3 {
            slots.push(Slot::new(
                0,
                InventoryId(1),
                row * 3 + column,
                30 + column as i32 * 18,
                17 + row as i32 * 18,
            ));
        }
    }
    push_player_slots(&mut slots, 8, 84);
    let container = Container::new(2, slots).with_player_inventory(PLAYER_INVENTORY);
    (container, crafting_layout(items, 3))
}

/// The player's own screen: output slot 0, a 2x2 grid in slots 1..=4, then
/// the player inventory.
pub fn player_screen(items: &Items) -> (Container, StandardLayout) {
    let mut slots = vec![Slot::new(0, InventoryId(2), 0, 154, 28).with_kind(SlotKind::CraftingOutput)];
    for row in 0..2 {
        for column in 0..2 {
            slots.push(Slot::new(
                0,
                InventoryId(1),
                row * 2 + column,
                98 + column as i32 * 18,
                18 + row as i32 * 18,
            ));
        }
    }
    push_player_slots(&mut slots, 8, 84);
    let container = Container::new(0, slots).with_player_inventory(PLAYER_INVENTORY);
    (container, crafting_layout(items, 2))
}

fn crafting_layout(items: &Items, width: usize) -> StandardLayout {
    let grid = SlotRange::from_count(1, width * width);
    items
        .recipes(width)
        .into_iter()
        .fold(StandardLayout::crafting(0, grid), |layout, recipe| layout.with_recipe(recipe))
}

/// A merchant: price slots 0 and 1, result slot 2, then the player inventory.
/// The book trade is selected.
pub fn merchant(items: &Items) -> (Container, StandardLayout) {
    let mut slots = vec![
        Slot::new(0, InventoryId(3), 0, 136, 37),
        Slot::new(0, InventoryId(3), 1, 162, 37),
        Slot::new(0, InventoryId(3), 2, 220, 37).with_kind(SlotKind::TradeOutput),
    ];
    push_player_slots(&mut slots, 108, 84);
    let container = Container::new(3, slots).with_player_inventory(PLAYER_INVENTORY);
    let layout = StandardLayout::merchant([0, 1], 2).with_trade(items.book_trade());
    (container, layout)
}
