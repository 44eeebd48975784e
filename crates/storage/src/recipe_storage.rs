//! Fixed-capacity recipe book with a selection cursor and lazy write-back.

use crate::persist::{read_document, write_atomic};
use crate::recipe::RecipePattern;
use crate::scope::SaveScope;
use serde::{Deserialize, Serialize};
use stackshift_core::{Container, ItemStack, SlotId, SlotRange};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Base file name of recipe documents.
pub const RECIPES_BASE_NAME: &str = "recipes";

/// Default number of stored recipes.
pub const DEFAULT_RECIPE_COUNT: usize = 18;

#[derive(Debug, Serialize, Deserialize)]
struct RecipeRecord {
    index: u8,
    ingredients: Vec<ItemStack>,
    result: ItemStack,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RecipesDocument {
    recipes: Vec<RecipeRecord>,
    selected: u8,
}

/// Indexed array of [`RecipePattern`]s plus the selected index.
///
/// The selection never wraps: changes to an index outside `[0, capacity)` are
/// ignored. Every mutation marks the storage dirty; [`write_to_disk`]
/// only touches the file when something changed.
///
/// [`write_to_disk`]: RecipeStorage::write_to_disk
#[derive(Debug, Clone)]
pub struct RecipeStorage {
    recipes: Vec<RecipePattern>,
    selected: usize,
    scope: SaveScope,
    dirty: bool,
}

impl RecipeStorage {
    /// Create a storage holding `capacity` empty patterns (at least one).
    pub fn new(capacity: usize, scope: SaveScope) -> Self {
        Self {
            recipes: vec![RecipePattern::new(); capacity.max(1)],
            selected: 0,
            scope,
            dirty: false,
        }
    }

    /// Number of pattern slots.
    pub fn capacity(&self) -> usize {
        self.recipes.len()
    }

    /// Save scope this storage reads and writes.
    pub fn scope(&self) -> &SaveScope {
        &self.scope
    }

    /// Currently selected index.
    pub fn selection(&self) -> usize {
        self.selected
    }

    /// Check for unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Select `index` if it is in range; out-of-range requests are ignored.
    pub fn change_selection(&mut self, index: usize) {
        if index < self.recipes.len() {
            self.selected = index;
            self.dirty = true;
        }
    }

    /// Move the selection one step forward or back, clamped at both ends.
    pub fn scroll_selection(&mut self, forward: bool) {
        let next = if forward {
            self.selected.checked_add(1)
        } else {
            self.selected.checked_sub(1)
        };
        if let Some(index) = next {
            self.change_selection(index);
        }
    }

    /// Pattern at `index`; invalid indices yield the first pattern.
    pub fn recipe(&self, index: usize) -> &RecipePattern {
        self.recipes.get(index).unwrap_or(&self.recipes[0])
    }

    /// The selected pattern.
    pub fn selected_recipe(&self) -> &RecipePattern {
        self.recipe(self.selected)
    }

    fn recipe_mut(&mut self, index: usize) -> &mut RecipePattern {
        let index = if index < self.recipes.len() { index } else { 0 };
        &mut self.recipes[index]
    }

    /// Store the grid feeding `output` into pattern `index`.
    pub fn store_recipe(
        &mut self,
        index: usize,
        container: &Container,
        output: SlotId,
        range: SlotRange,
        clear_if_empty: bool,
    ) {
        self.recipe_mut(index)
            .store_from_grid(container, output, range, clear_if_empty);
        self.dirty = true;
    }

    /// Store the grid feeding `output` into the selected pattern.
    pub fn store_to_selection(
        &mut self,
        container: &Container,
        output: SlotId,
        range: SlotRange,
        clear_if_empty: bool,
    ) {
        self.store_recipe(self.selected, container, output, range, clear_if_empty);
    }

    /// Replace pattern `index` directly.
    pub fn set_recipe(&mut self, index: usize, pattern: RecipePattern) {
        *self.recipe_mut(index) = pattern;
        self.dirty = true;
    }

    /// Clear pattern `index`.
    pub fn clear_recipe(&mut self, index: usize) {
        self.recipe_mut(index).clear();
        self.dirty = true;
    }

    /// Document path of this storage inside `dir`.
    pub fn file_path(&self, dir: &Path) -> PathBuf {
        self.scope.document_path(dir, RECIPES_BASE_NAME)
    }

    /// Load patterns and the selection from `dir`.
    ///
    /// A missing or unreadable document leaves every pattern empty. The
    /// storage is clean afterwards.
    pub fn read_from_disk(&mut self, dir: &Path) {
        self.recipes.iter_mut().for_each(RecipePattern::clear);
        self.selected = 0;

        let path = self.file_path(dir);
        match read_document::<RecipesDocument>(&path) {
            Ok(Some(doc)) => self.apply_document(doc),
            Ok(None) => debug!("No recipe file at {}", path.display()),
            Err(err) => warn!(
                "Failed to read recipes from {}: {err}. Starting empty",
                path.display()
            ),
        }
        self.dirty = false;
    }

    /// Write the storage to `dir` if it has unsaved changes.
    ///
    /// Returns `true` when a file was written. Failures are logged and keep
    /// the storage dirty so the next save point retries.
    pub fn write_to_disk(&mut self, dir: &Path) -> bool {
        if !self.dirty {
            return false;
        }

        let path = self.file_path(dir);
        match write_atomic(&path, &self.to_document()) {
            Ok(()) => {
                debug!("Saved recipes to {}", path.display());
                self.dirty = false;
                true
            }
            Err(err) => {
                warn!("Failed to write recipes to {}: {err}", path.display());
                false
            }
        }
    }

    fn apply_document(&mut self, doc: RecipesDocument) {
        for record in doc.recipes {
            let index = usize::from(record.index);
            if let Some(pattern) = self.recipes.get_mut(index) {
                pattern.set(record.ingredients, record.result);
            }
        }
        self.change_selection(usize::from(doc.selected));
    }

    fn to_document(&self) -> RecipesDocument {
        let recipes = self
            .recipes
            .iter()
            .enumerate()
            .filter(|(_, pattern)| pattern.is_valid())
            .filter_map(|(index, pattern)| {
                Some(RecipeRecord {
                    index: u8::try_from(index).ok()?,
                    ingredients: pattern.ingredients().to_vec(),
                    result: pattern.result().clone(),
                })
            })
            .collect();
        RecipesDocument {
            recipes,
            selected: u8::try_from(self.selected).unwrap_or(0),
        }
    }
}
