//! Save scopes: which document a storage reads and writes.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File extension used for stackshift documents.
pub const DOCUMENT_EXTENSION: &str = "bin";

/// Where a storage's data belongs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SaveScope {
    /// One document shared by every world and server.
    #[default]
    Global,
    /// A local world, keyed by its level name.
    World(String),
    /// A remote server, keyed by its address.
    Server(String),
}

impl SaveScope {
    /// Scope for a world or server name, or global when unknown.
    pub fn from_world_or_server(world: Option<&str>, server: Option<&str>) -> Self {
        match (world, server) {
            (Some(world), _) => Self::World(world.to_string()),
            (None, Some(address)) => Self::Server(address.to_string()),
            (None, None) => Self::Global,
        }
    }

    /// Suffix appended to a document's base name, if any.
    pub fn suffix(&self) -> Option<String> {
        match self {
            Self::Global => None,
            Self::World(name) => Some(sanitize(name)),
            Self::Server(address) => Some(sanitize(&address.replace(':', "_"))),
        }
    }

    /// File name for a document with base name `base` (e.g. `recipes`).
    pub fn file_name(&self, base: &str) -> String {
        match self.suffix() {
            Some(suffix) => format!("{base}_{suffix}.{DOCUMENT_EXTENSION}"),
            None => format!("{base}.{DOCUMENT_EXTENSION}"),
        }
    }

    /// Full document path inside `dir`.
    pub fn document_path(&self, dir: &Path, base: &str) -> PathBuf {
        dir.join(self.file_name(base))
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | '<' | '>' | '"' | '|' | '?' | '*' => '_',
            c => c,
        })
        .collect()
}
