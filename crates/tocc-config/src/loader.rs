//! Configuration Loader
//!
//! Loads the global and project configuration and applies environment
//! overrides in order of precedence.

use crate::bindings::BindingsConfig;
use crate::{ConfigError, ConfigResult};
use std::env;
use std::path::{Path, PathBuf};

/// Project configuration file name
pub const CONFIG_FILE_NAME: &str = "tocc.toml";

/// Configuration loader
///
/// Precedence, lowest first:
/// 1. Global config (~/.tocc/config.toml)
/// 2. Project config (tocc.toml)
/// 3. Environment variables (TOCC_LOG, TOCC_LOG_TARGET, TOCC_REQUIRE_ABSOLUTE_PATH)
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Merged configuration result
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Effective settings after merging every source
    pub bindings: BindingsConfig,

    /// Directory where tocc.toml was found
    pub project_root: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Loader reading the global config from `path` instead of the home directory
    pub fn with_global_config_path(path: impl Into<PathBuf>) -> Self {
        Self {
            global_config_path: Some(path.into()),
        }
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find tocc.toml. A missing project or
    /// global file is not an error.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project) = Self::find_project_config(start_dir)?;
        let global = self.load_global_config()?;
        let bindings = Self::apply_env_overrides(global.merged_with(project))?;

        Ok(Config {
            bindings,
            project_root,
        })
    }

    /// Load configuration from a specific project config file
    pub fn load_from_file(&mut self, config_path: &Path) -> ConfigResult<Config> {
        let project = BindingsConfig::load_from_file(config_path)?;
        let global = self.load_global_config()?;
        let bindings = Self::apply_env_overrides(global.merged_with(project))?;

        Ok(Config {
            bindings,
            project_root: config_path.parent().map(Path::to_path_buf),
        })
    }

    fn find_project_config(start_dir: &Path) -> ConfigResult<(Option<PathBuf>, BindingsConfig)> {
        for dir in start_dir.ancestors() {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                let config = BindingsConfig::load_from_file(&config_path)?;
                return Ok((Some(dir.to_path_buf()), config));
            }
        }
        Ok((None, BindingsConfig::default()))
    }

    fn load_global_config(&mut self) -> ConfigResult<BindingsConfig> {
        let path = match &self.global_config_path {
            Some(path) => path.clone(),
            None => match Self::global_config_dir() {
                Ok(dir) => {
                    let path = dir.join("config.toml");
                    self.global_config_path = Some(path.clone());
                    path
                }
                // No home directory: there is no global layer
                Err(ConfigError::HomeNotFound) => return Ok(BindingsConfig::default()),
                Err(e) => return Err(e),
            },
        };

        if !path.exists() {
            return Ok(BindingsConfig::default());
        }
        BindingsConfig::load_from_file(&path)
    }

    fn apply_env_overrides(mut config: BindingsConfig) -> ConfigResult<BindingsConfig> {
        if let Ok(filter) = env::var("TOCC_LOG") {
            config.logging_mut().filter = Some(filter);
        }

        if let Ok(value) = env::var("TOCC_LOG_TARGET") {
            config.logging_mut().with_target = Some(parse_flag("TOCC_LOG_TARGET", &value)?);
        }

        if let Ok(value) = env::var("TOCC_REQUIRE_ABSOLUTE_PATH") {
            config.manager_mut().require_absolute_base_path =
                Some(parse_flag("TOCC_REQUIRE_ABSOLUTE_PATH", &value)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Get the global configuration directory (~/.tocc)
    pub fn global_config_dir() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".tocc"))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_flag(field: &str, value: &str) -> ConfigResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("expected a boolean, found '{}'", value),
        }),
    }
}

impl Config {
    /// Check if a tocc.toml was found
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }

    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }
}
