use serde::{Deserialize, Serialize};
use stackshift_storage::DEFAULT_RECIPE_COUNT;

/// Feature toggles consulted by the gesture entry points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Scrolling moves single units.
    pub scroll_single: bool,
    /// Scrolling with the stack modifier moves whole stacks.
    pub scroll_stacks: bool,
    /// Scrolling with the matching modifier moves every matching stack.
    pub scroll_matching: bool,
    /// Scrolling with the everything modifier moves every stack.
    pub scroll_everything: bool,
    /// Scrolling over a trade output fills or empties the price slots.
    pub scroll_villager: bool,
    /// Scrolling over a crafting output uses the selected recipe.
    pub crafting_features: bool,
    /// Retry failed quick-transfers of whole stacks with plain clicks.
    pub scroll_stacks_fallback: bool,
    pub reverse_scroll_direction_single: bool,
    pub reverse_scroll_direction_stacks: bool,
    /// Scroll direction follows where the other inventory sits on screen.
    pub slot_position_aware_scroll_direction: bool,
    /// Drop-key on a crafting output throws a single stack.
    pub carpet_ctrl_q_crafting: bool,
    pub villager_trade_use_global_favorites: bool,
    /// Number of recipe patterns kept per save scope.
    pub recipe_count: usize,
    /// Share recipe patterns across every world and server.
    pub global_recipes: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scroll_single: true,
            scroll_stacks: true,
            scroll_matching: true,
            scroll_everything: true,
            scroll_villager: true,
            crafting_features: true,
            scroll_stacks_fallback: true,
            reverse_scroll_direction_single: false,
            reverse_scroll_direction_stacks: false,
            slot_position_aware_scroll_direction: false,
            carpet_ctrl_q_crafting: false,
            villager_trade_use_global_favorites: true,
            recipe_count: DEFAULT_RECIPE_COUNT,
            global_recipes: false,
        }
    }
}
