//! Configuration for the Lithos geology store.
//!
//! Settings persist to disk as RON files and tolerate missing or unknown
//! fields, so older and newer config files both load.

mod config;
mod error;

pub use config::{Config, DebugConfig, RocksConfig, StorageConfig, default_config_dir};
pub use error::ConfigError;
