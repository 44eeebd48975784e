//! Namespaced item keys and the item type registry.
//!
//! Item keys are stable string identifiers (e.g. `stackshift:iron_ingot`)
//! used wherever an item type has to survive a restart: trade favorites are
//! persisted by name and resolved back to an [`ItemId`] on load.

use crate::item::{ItemId, ItemStack, DEFAULT_MAX_STACK};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default namespace used when a key omits an explicit namespace.
pub const DEFAULT_NAMESPACE: &str = "stackshift";

/// Error returned when parsing an invalid [`RegistryKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RegistryKeyError {
    message: String,
}

impl RegistryKeyError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A namespaced key of the form `namespace:path`.
///
/// Ordering is lexical by `(namespace, path)` and is stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegistryKey {
    namespace: String,
    path: String,
}

impl RegistryKey {
    /// Parse a key, using [`DEFAULT_NAMESPACE`] when none is given.
    pub fn parse(input: &str) -> Result<Self, RegistryKeyError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(RegistryKeyError::new("item key cannot be empty"));
        }

        let (namespace, path) = input
            .split_once(':')
            .unwrap_or((DEFAULT_NAMESPACE, input));
        let namespace = namespace.trim();
        let path = path.trim();

        validate_part("namespace", namespace, 64, |c| {
            matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.')
        })?;
        validate_part("path", path, 128, |c| {
            matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.' | '/')
        })?;

        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    /// Key namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Key path.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for RegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for RegistryKey {
    type Err = RegistryKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn validate_part(
    what: &str,
    value: &str,
    max_len: usize,
    allowed: impl Fn(char) -> bool,
) -> Result<(), RegistryKeyError> {
    if value.is_empty() {
        return Err(RegistryKeyError::new(format!("item key {what} cannot be empty")));
    }
    if value.len() > max_len {
        return Err(RegistryKeyError::new(format!(
            "item key {what} too long (max {max_len})"
        )));
    }
    if !value.chars().all(allowed) {
        return Err(RegistryKeyError::new(format!(
            "item key {what} has invalid characters"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone)]
struct ItemEntry {
    key: RegistryKey,
    max_stack: u32,
}

/// Bidirectional map between item keys and runtime item ids.
///
/// Ids are handed out in registration order starting at 1; id 0 is reserved
/// for "no item".
#[derive(Debug, Clone, Default)]
pub struct ItemRegistry {
    entries: Vec<ItemEntry>,
    by_key: BTreeMap<RegistryKey, ItemId>,
}

impl ItemRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item type, returning its id. Re-registering a key returns the
    /// existing id and keeps the original stack limit.
    pub fn register(&mut self, key: RegistryKey, max_stack: u32) -> ItemId {
        if let Some(id) = self.by_key.get(&key) {
            return *id;
        }
        let id = ItemId(self.entries.len() as u16 + 1);
        self.entries.push(ItemEntry {
            key: key.clone(),
            max_stack: max_stack.max(1),
        });
        self.by_key.insert(key, id);
        id
    }

    /// Parse and register `name` with the default stack limit.
    pub fn register_name(&mut self, name: &str) -> Result<ItemId, RegistryKeyError> {
        Ok(self.register(RegistryKey::parse(name)?, DEFAULT_MAX_STACK))
    }

    /// Look up the id registered for `key`.
    pub fn id_of(&self, key: &RegistryKey) -> Option<ItemId> {
        self.by_key.get(key).copied()
    }

    /// Resolve a name to an id. Unparseable or unknown names resolve to `None`.
    pub fn resolve(&self, name: &str) -> Option<ItemId> {
        RegistryKey::parse(name).ok().and_then(|key| self.id_of(&key))
    }

    /// Key for an id.
    pub fn key_of(&self, id: ItemId) -> Option<&RegistryKey> {
        self.entry(id).map(|entry| &entry.key)
    }

    /// Max stack size for an id (defaults when the id is unknown).
    pub fn max_stack(&self, id: ItemId) -> u32 {
        self.entry(id)
            .map(|entry| entry.max_stack)
            .unwrap_or(DEFAULT_MAX_STACK)
    }

    /// Build a stack of `count` units of `id` with the registered stack limit.
    pub fn stack(&self, id: ItemId, count: u32) -> ItemStack {
        ItemStack::with_max_stack(id, count, self.max_stack(id))
    }

    /// Number of registered item types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, id: ItemId) -> Option<&ItemEntry> {
        (id.0 as usize)
            .checked_sub(1)
            .and_then(|index| self.entries.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_namespaced_key() {
        let key = RegistryKey::parse("minecraft:iron_ingot").unwrap();
        assert_eq!(key.namespace(), "minecraft");
        assert_eq!(key.path(), "iron_ingot");
        assert_eq!(key.to_string(), "minecraft:iron_ingot");
    }

    #[test]
    fn parses_with_default_namespace() {
        let key = RegistryKey::parse("stick").unwrap();
        assert_eq!(key.to_string(), "stackshift:stick");
    }

    #[test]
    fn rejects_invalid_keys() {
        assert!(RegistryKey::parse("").is_err());
        assert!(RegistryKey::parse("   ").is_err());
        assert!(RegistryKey::parse("stackshift:Stick").is_err());
        assert!(RegistryKey::parse("stackshift:").is_err());
        assert!(RegistryKey::parse(":stick").is_err());
    }

    #[test]
    fn registry_round_trips_names() {
        let mut registry = ItemRegistry::new();
        let iron = registry.register_name("iron_ingot").unwrap();
        let pearl = registry.register(RegistryKey::parse("ender_pearl").unwrap(), 16);

        assert_ne!(iron, pearl);
        assert_eq!(registry.resolve("stackshift:iron_ingot"), Some(iron));
        assert_eq!(registry.key_of(pearl).unwrap().path(), "ender_pearl");
        assert_eq!(registry.max_stack(pearl), 16);
        assert_eq!(registry.stack(pearl, 3).max_stack, 16);
        assert_eq!(registry.resolve("not_registered"), None);
        assert_eq!(registry.resolve("Bad Name"), None);
    }

    #[test]
    fn reregistering_keeps_first_id() {
        let mut registry = ItemRegistry::new();
        let first = registry.register_name("stick").unwrap();
        let second = registry.register_name("stick").unwrap();
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }
}
