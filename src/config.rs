use anyhow::Result;
use serde::{Deserialize, Serialize};
use stackshift_engine::EngineConfig;
use stackshift_storage::SaveScope;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

const DEFAULT_CONFIG_PATH: &str = "config/stackshift.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory recipe and favorite documents are kept in. Nothing is
    /// persisted when unset.
    pub save_dir: Option<PathBuf>,
    /// Local world name, used to scope per-world documents.
    pub world: Option<String>,
    /// Server address, used when no world name is set.
    pub server: Option<String>,
    pub engine: EngineConfig,
}

impl AppConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    AppConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH) || err.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!("Config not found at {}. Using defaults", path.display());
                }
                AppConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }

    /// Scope recipes are stored under.
    pub fn recipe_scope(&self) -> SaveScope {
        if self.engine.global_recipes {
            SaveScope::Global
        } else {
            SaveScope::from_world_or_server(self.world.as_deref(), self.server.as_deref())
        }
    }
}
