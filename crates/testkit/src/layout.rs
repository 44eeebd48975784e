//! Screen layouts for the standard chest, crafting table and merchant
//! screens, with a small recipe book.

use stackshift_core::{Container, ItemId, ItemStack, SlotId, SlotRange};
use stackshift_engine::Layout;
use stackshift_storage::TradeOffer;

/// A recipe the simulated peer knows.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRecipe {
    /// One entry per grid cell, `None` for a cell that must stay empty.
    pub pattern: Vec<Option<ItemId>>,
    /// Crafted result.
    pub result: ItemStack,
    /// Shapeless recipes ignore cell positions.
    pub shapeless: bool,
}

impl GridRecipe {
    /// Positional recipe.
    pub fn shaped(pattern: Vec<Option<ItemId>>, result: ItemStack) -> Self {
        Self {
            pattern,
            result,
            shapeless: false,
        }
    }

    /// Recipe that only cares about the multiset of ingredients.
    pub fn shapeless(ingredients: Vec<ItemId>, result: ItemStack) -> Self {
        Self {
            pattern: ingredients.into_iter().map(Some).collect(),
            result,
            shapeless: true,
        }
    }

    fn matches(&self, grid: &[ItemStack]) -> bool {
        if self.shapeless {
            let mut wanted: Vec<ItemId> = self.pattern.iter().flatten().copied().collect();
            let mut given: Vec<ItemId> = grid.iter().filter(|s| !s.is_empty()).map(|s| s.item).collect();
            wanted.sort();
            given.sort();
            return wanted == given;
        }
        self.pattern.len() == grid.len()
            && self.pattern.iter().zip(grid).all(|(cell, stack)| match cell {
                Some(item) => !stack.is_empty() && stack.item == *item,
                None => stack.is_empty(),
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Screen {
    Chest,
    Crafting { output: SlotId, grid: SlotRange },
    Merchant { buy: [SlotId; 2], output: SlotId },
}

/// Layout of one of the standard screens.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardLayout {
    screen: Screen,
    recipes: Vec<GridRecipe>,
    trade: Option<TradeOffer>,
}

impl StandardLayout {
    /// Chest-like screen: no crafting, no trading.
    pub fn chest() -> Self {
        Self {
            screen: Screen::Chest,
            recipes: Vec::new(),
            trade: None,
        }
    }

    /// Crafting screen whose `output` is fed by `grid`.
    pub fn crafting(output: SlotId, grid: SlotRange) -> Self {
        Self {
            screen: Screen::Crafting { output, grid },
            recipes: Vec::new(),
            trade: None,
        }
    }

    /// Merchant screen with price slots `buy` and result slot `output`.
    pub fn merchant(buy: [SlotId; 2], output: SlotId) -> Self {
        Self {
            screen: Screen::Merchant { buy, output },
            recipes: Vec::new(),
            trade: None,
        }
    }

    /// Add a recipe to the book.
    pub fn with_recipe(mut self, recipe: GridRecipe) -> Self {
        self.recipes.push(recipe);
        self
    }

    /// Select a trade offer.
    pub fn with_trade(mut self, offer: TradeOffer) -> Self {
        self.trade = Some(offer);
        self
    }

    /// The crafting output slot, if this is a crafting screen.
    pub fn crafting_output(&self) -> Option<SlotId> {
        match self.screen {
            Screen::Crafting { output, .. } => Some(output),
            _ => None,
        }
    }

    /// The trade result slot, if this is a merchant screen.
    pub fn trade_output(&self) -> Option<SlotId> {
        match self.screen {
            Screen::Merchant { output, .. } => Some(output),
            _ => None,
        }
    }
}

impl Layout for StandardLayout {
    fn crafting_grid(&self, _container: &Container, slot: SlotId) -> Option<SlotRange> {
        match self.screen {
            Screen::Crafting { output, grid } if output == slot => Some(grid),
            _ => None,
        }
    }

    fn craft_result(&self, container: &Container, range: SlotRange) -> ItemStack {
        let grid: Vec<ItemStack> = range.iter().map(|id| container.stack(id)).collect();
        self.recipes
            .iter()
            .find(|recipe| recipe.matches(&grid))
            .map(|recipe| recipe.result.clone())
            .unwrap_or_else(ItemStack::empty)
    }

    fn selected_trade(&self) -> Option<TradeOffer> {
        match self.screen {
            Screen::Merchant { .. } => self.trade.clone(),
            _ => None,
        }
    }

    fn merchant_buy_slots(&self) -> [SlotId; 2] {
        match self.screen {
            Screen::Merchant { buy, .. } => buy,
            _ => [0, 1],
        }
    }
}
