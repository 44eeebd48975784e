#![warn(missing_docs)]
//! Recipe templates, trade favorites and their on-disk documents.

pub mod persist;
pub mod recipe;
pub mod recipe_storage;
pub mod scope;
pub mod trade;
pub mod villager;

pub use persist::{read_document, write_atomic, PersistError};
pub use recipe::{RecipePattern, DEFAULT_GRID_SIZE};
pub use recipe_storage::{RecipeStorage, DEFAULT_RECIPE_COUNT};
pub use scope::SaveScope;
pub use trade::{TradeOffer, TradeType, TradeTypeRecord};
pub use villager::{ActorId, FavoriteData, VillagerData, VillagerDataStorage};
