//! Tocc Configuration System
//!
//! Configuration of the tocc bindings:
//! - Project configuration (tocc.toml)
//! - Global user configuration (~/.tocc/config.toml)
//! - Environment overrides (TOCC_*)
//!
//! # Configuration Hierarchy
//!
//! Later sources override earlier ones:
//! 1. Global config (~/.tocc/config.toml)
//! 2. Project config (nearest tocc.toml walking up from the start directory)
//! 3. Environment variables
//!
//! # Example
//!
//! ```no_run
//! use tocc_config::ConfigLoader;
//! use std::path::Path;
//!
//! let mut loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("{}", config.bindings.log_filter());
//! ```

pub mod bindings;
pub mod loader;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

pub use bindings::{BindingsConfig, LoggingConfig, ManagerConfig, DEFAULT_LOG_FILTER};
pub use loader::{Config, ConfigLoader, CONFIG_FILE_NAME};
