//! Configuration Module
//!
//! Loads and validates configuration from TOML files.

pub mod loader;

pub use loader::{
    Config, ConfigError, expand_dir, load_config, load_config_or_default, DEFAULT_CONFIG_PATH,
};
