//! Per-merchant favorite trades and the global favorites list.

use crate::persist::{read_document, write_atomic};
use crate::scope::SaveScope;
use crate::trade::{TradeOffer, TradeType, TradeTypeRecord};
use serde::{Deserialize, Serialize};
use stackshift_core::ItemRegistry;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Base file name of villager documents.
pub const VILLAGER_BASE_NAME: &str = "villager_data";

/// Stable identity of a merchant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Remembered state for one merchant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VillagerData {
    actor: ActorId,
    favorites: Vec<u32>,
    trade_list_position: u32,
}

impl VillagerData {
    /// Fresh data with no favorites.
    pub fn new(actor: ActorId) -> Self {
        Self {
            actor,
            favorites: Vec::new(),
            trade_list_position: 0,
        }
    }

    /// Merchant this data belongs to.
    pub fn actor(&self) -> ActorId {
        self.actor
    }

    /// Favorite trade indices in the order they were marked.
    pub fn favorites(&self) -> &[u32] {
        &self.favorites
    }

    /// Scroll position of the trade list.
    pub fn trade_list_position(&self) -> u32 {
        self.trade_list_position
    }

    /// Set the scroll position of the trade list.
    pub fn set_trade_list_position(&mut self, position: u32) {
        self.trade_list_position = position;
    }

    /// Add `index` to the favorites, or remove it if already present.
    pub fn toggle_favorite(&mut self, index: u32) {
        if let Some(position) = self.favorites.iter().position(|&fav| fav == index) {
            self.favorites.remove(position);
        } else {
            self.favorites.push(index);
        }
    }
}

/// Favorite trade indices for the merchant currently on screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FavoriteData {
    /// Indices into the merchant's offer list.
    pub indices: Vec<usize>,
    /// Whether the indices came from the global list.
    pub is_global: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct VillagerDocument {
    villagers: Vec<VillagerData>,
    global_favorites: Vec<TradeTypeRecord>,
}

/// All remembered merchant data of one save scope.
#[derive(Debug, Clone, Default)]
pub struct VillagerDataStorage {
    data: BTreeMap<ActorId, VillagerData>,
    global_favorites: Vec<TradeType>,
    last_interacted: Option<ActorId>,
    scope: SaveScope,
    dirty: bool,
}

impl VillagerDataStorage {
    /// Create an empty storage for `scope`.
    pub fn new(scope: SaveScope) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    /// Check for unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Merchant most recently interacted with.
    pub fn last_interacted(&self) -> Option<ActorId> {
        self.last_interacted
    }

    /// Remember which merchant is on screen.
    pub fn set_last_interacted(&mut self, actor: ActorId) {
        self.last_interacted = Some(actor);
    }

    /// Data for `actor`, created (and made the last interacted merchant) when
    /// missing and `create` is set.
    pub fn data_for(&mut self, actor: Option<ActorId>, create: bool) -> Option<&VillagerData> {
        let actor = actor?;
        if create && !self.data.contains_key(&actor) {
            self.last_interacted = Some(actor);
            self.data.insert(actor, VillagerData::new(actor));
            self.dirty = true;
        }
        self.data.get(&actor)
    }

    fn current_mut(&mut self) -> Option<&mut VillagerData> {
        let actor = self.last_interacted?;
        self.data_for(Some(actor), true);
        self.data.get_mut(&actor)
    }

    /// Set the trade list position of the current merchant.
    pub fn set_trade_list_position(&mut self, position: u32) {
        if let Some(data) = self.current_mut() {
            data.set_trade_list_position(position);
            self.dirty = true;
        }
    }

    /// Toggle trade `index` as a favorite of the current merchant.
    pub fn toggle_favorite(&mut self, index: u32) {
        if let Some(data) = self.current_mut() {
            data.toggle_favorite(index);
            self.dirty = true;
        }
    }

    /// Toggle the signature of `offer` in the global favorites.
    pub fn toggle_global_favorite(&mut self, offer: &TradeOffer) {
        let trade = TradeType::of(offer);
        if let Some(position) = self.global_favorites.iter().position(|fav| *fav == trade) {
            self.global_favorites.remove(position);
        } else {
            self.global_favorites.push(trade);
        }
        self.dirty = true;
    }

    /// Global favorite signatures.
    pub fn global_favorites(&self) -> &[TradeType] {
        &self.global_favorites
    }

    /// Favorites to highlight for the current merchant's `offers`.
    ///
    /// Per-merchant favorites win. Without any, and with `use_global` set,
    /// offers matching a global favorite are returned instead.
    pub fn favorites_for_current(&self, offers: &[TradeOffer], use_global: bool) -> FavoriteData {
        let data = self
            .last_interacted
            .and_then(|actor| self.data.get(&actor));

        if let Some(data) = data.filter(|data| !data.favorites.is_empty()) {
            return FavoriteData {
                indices: data.favorites.iter().map(|&index| index as usize).collect(),
                is_global: false,
            };
        }

        if use_global && self.last_interacted.is_some() {
            let indices = offers
                .iter()
                .enumerate()
                .filter(|(_, offer)| self.global_favorites.iter().any(|fav| fav.matches(offer)))
                .map(|(index, _)| index)
                .collect();
            return FavoriteData {
                indices,
                is_global: true,
            };
        }

        FavoriteData {
            indices: Vec::new(),
            is_global: data.is_none(),
        }
    }

    /// Document path of this storage inside `dir`.
    pub fn file_path(&self, dir: &Path) -> PathBuf {
        self.scope.document_path(dir, VILLAGER_BASE_NAME)
    }

    /// Load merchant data from `dir`, resolving item names through `registry`.
    pub fn read_from_disk(&mut self, dir: &Path, registry: &ItemRegistry) {
        self.data.clear();
        self.global_favorites.clear();

        let path = self.file_path(dir);
        match read_document::<VillagerDocument>(&path) {
            Ok(Some(doc)) => {
                self.data = doc
                    .villagers
                    .into_iter()
                    .map(|data| (data.actor, data))
                    .collect();
                self.global_favorites = doc
                    .global_favorites
                    .iter()
                    .filter_map(|record| TradeType::from_record(record, registry))
                    .collect();
            }
            Ok(None) => debug!("No villager data at {}", path.display()),
            Err(err) => warn!(
                "Failed to read villager data from {}: {err}. Starting empty",
                path.display()
            ),
        }
        self.dirty = false;
    }

    /// Write merchant data to `dir` if it has unsaved changes.
    pub fn write_to_disk(&mut self, dir: &Path, registry: &ItemRegistry) -> bool {
        if !self.dirty {
            return false;
        }

        let doc = VillagerDocument {
            villagers: self.data.values().cloned().collect(),
            global_favorites: self
                .global_favorites
                .iter()
                .map(|trade| trade.to_record(registry))
                .collect(),
        };
        let path = self.file_path(dir);
        match write_atomic(&path, &doc) {
            Ok(()) => {
                self.dirty = false;
                true
            }
            Err(err) => {
                warn!("Failed to write villager data to {}: {err}", path.display());
                false
            }
        }
    }
}
