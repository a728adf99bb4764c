//! Bindings configuration (tocc.toml / ~/.tocc/config.toml)
//!
//! Both files share one schema. Every field is optional so a file only
//! states what it overrides.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Filter used when neither `RUST_LOG` nor the config sets one
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct BindingsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<ManagerConfig>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing-subscriber` filter directive, e.g. "tocc.manager=debug"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    /// Print the event target in each line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_target: Option<bool>,
}

/// Manager type settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ManagerConfig {
    /// Reject relative base paths at construction (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_absolute_base_path: Option<bool>,
}

impl BindingsConfig {
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config = Self::parse(&content).map_err(|e| match e {
            ConfigError::TomlParseError { error, .. } => ConfigError::TomlParseError {
                file: path.to_path_buf(),
                error,
            },
            other => other,
        })?;
        Ok(config)
    }

    /// Parse and validate a TOML document
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::TomlParseError {
            file: Default::default(),
            error: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(filter) = self.logging.as_ref().and_then(|l| l.filter.as_deref()) {
            if filter.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "logging.filter".to_string(),
                    reason: "filter must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Overlay `other` on top of `self`; fields set in `other` win
    pub fn merged_with(self, other: BindingsConfig) -> BindingsConfig {
        BindingsConfig {
            logging: merge_section(self.logging, other.logging, |base, top| LoggingConfig {
                filter: top.filter.or(base.filter),
                with_target: top.with_target.or(base.with_target),
            }),
            manager: merge_section(self.manager, other.manager, |base, top| ManagerConfig {
                require_absolute_base_path: top
                    .require_absolute_base_path
                    .or(base.require_absolute_base_path),
            }),
        }
    }

    /// Effective log filter (config > default)
    pub fn log_filter(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.filter.as_deref())
            .unwrap_or(DEFAULT_LOG_FILTER)
    }

    pub fn log_with_target(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.with_target)
            .unwrap_or(false)
    }

    pub fn require_absolute_base_path(&self) -> bool {
        self.manager
            .as_ref()
            .and_then(|m| m.require_absolute_base_path)
            .unwrap_or(true)
    }

    pub(crate) fn logging_mut(&mut self) -> &mut LoggingConfig {
        self.logging.get_or_insert_with(Default::default)
    }

    pub(crate) fn manager_mut(&mut self) -> &mut ManagerConfig {
        self.manager.get_or_insert_with(Default::default)
    }
}

fn merge_section<T>(base: Option<T>, top: Option<T>, merge: impl FnOnce(T, T) -> T) -> Option<T> {
    match (base, top) {
        (Some(base), Some(top)) => Some(merge(base, top)),
        (base, None) => base,
        (None, top) => top,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = BindingsConfig::default();
        assert_eq!(config.log_filter(), "warn");
        assert!(!config.log_with_target());
        assert!(config.require_absolute_base_path());
    }

    #[test]
    fn test_parse_sections() {
        let config = BindingsConfig::parse(
            r#"
[logging]
filter = "tocc.manager=debug"

[manager]
require_absolute_base_path = false
"#,
        )
        .unwrap();
        assert_eq!(config.log_filter(), "tocc.manager=debug");
        assert!(!config.require_absolute_base_path());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = BindingsConfig::parse("[logging]\nlevel = \"debug\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParseError { .. }));
    }

    #[test]
    fn test_empty_filter_rejected() {
        let err = BindingsConfig::parse("[logging]\nfilter = \"  \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_merge_prefers_top() {
        let global = BindingsConfig::parse(
            "[logging]\nfilter = \"info\"\nwith_target = true\n",
        )
        .unwrap();
        let project = BindingsConfig::parse("[logging]\nfilter = \"debug\"\n").unwrap();
        let merged = global.merged_with(project);
        assert_eq!(merged.log_filter(), "debug");
        assert!(merged.log_with_target());
        assert_eq!(merged.manager, None);
    }
}
