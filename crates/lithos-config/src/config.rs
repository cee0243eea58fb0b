//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use lithos_geology::{
    DEFAULT_NAMESPACE, LayerCodec, ResourceIdError, RockCategory, RockDef, RockRegistry,
    RockTypeRegistry, StorageFormat,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Chunk geology persistence settings.
    pub storage: StorageConfig,
    /// Rock types available to the world.
    pub rocks: RocksConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Chunk geology persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Layout written when chunks are saved. Loading accepts every layout.
    pub format: StorageFormat,
    /// Transition height given to columns loaded from legacy saves, which
    /// do not record one.
    pub legacy_rock_height: i32,
}

/// Rock type definitions, registered in order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RocksConfig {
    pub definitions: Vec<RockDef>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            format: StorageFormat::V1,
            legacy_rock_height: 0,
        }
    }
}

/// Rock types registered by default, in id order.
const DEFAULT_ROCKS: [(&str, RockCategory); 21] = [
    ("granite", RockCategory::IgneousIntrusive),
    ("diorite", RockCategory::IgneousIntrusive),
    ("gabbro", RockCategory::IgneousIntrusive),
    ("shale", RockCategory::Sedimentary),
    ("claystone", RockCategory::Sedimentary),
    ("rocksalt", RockCategory::Sedimentary),
    ("limestone", RockCategory::Sedimentary),
    ("conglomerate", RockCategory::Sedimentary),
    ("dolomite", RockCategory::Sedimentary),
    ("chert", RockCategory::Sedimentary),
    ("chalk", RockCategory::Sedimentary),
    ("rhyolite", RockCategory::IgneousExtrusive),
    ("basalt", RockCategory::IgneousExtrusive),
    ("andesite", RockCategory::IgneousExtrusive),
    ("dacite", RockCategory::IgneousExtrusive),
    ("quartzite", RockCategory::Metamorphic),
    ("slate", RockCategory::Metamorphic),
    ("phyllite", RockCategory::Metamorphic),
    ("schist", RockCategory::Metamorphic),
    ("gneiss", RockCategory::Metamorphic),
    ("marble", RockCategory::Metamorphic),
];

fn default_rock_defs() -> Result<Vec<RockDef>, ResourceIdError> {
    DEFAULT_ROCKS
        .iter()
        .map(|&(name, category)| RockDef::new(&format!("{DEFAULT_NAMESPACE}:{name}"), category))
        .collect()
}

impl Default for RocksConfig {
    fn default() -> Self {
        let definitions = default_rock_defs().unwrap_or_else(|err| {
            log::error!("Invalid built-in rock definition: {err}");
            Vec::new()
        });
        debug_assert_eq!(definitions.len(), DEFAULT_ROCKS.len());
        Self { definitions }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform config directory for Lithos, or `./lithos` if the platform has none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lithos")
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Builds a rock registry from `rocks.definitions`.
    pub fn build_registry(&self) -> Result<RockTypeRegistry, ConfigError> {
        let registry = RockTypeRegistry::from_defs(self.rocks.definitions.iter().cloned())?;
        log::debug!("Registered {} rock types", registry.len());
        Ok(registry)
    }

    /// Returns a layer codec over `registry` using the storage settings.
    pub fn layer_codec<'r, R: RockRegistry + ?Sized>(&self, registry: &'r R) -> LayerCodec<'r, R> {
        LayerCodec::new(registry)
            .with_format(self.storage.format)
            .with_legacy_rock_height(self.storage.legacy_rock_height)
    }
}
