//! Logging setup
//!
//! Events use the targets `tocc.host`, `tocc.file_info`, `tocc.manager`,
//! `tocc.engine` and `tocc.config`. The filter comes from `RUST_LOG` when set,
//! else from the `logging.filter` config value. A `logging.filter` that does
//! not parse is replaced by `warn`, and a warning naming it is emitted once the
//! subscriber is up.

use tocc_config::{BindingsConfig, DEFAULT_LOG_FILTER};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Filter parsed from the `logging.filter` config value
pub fn config_filter(config: &BindingsConfig) -> Result<EnvFilter, ParseError> {
    EnvFilter::try_new(config.log_filter())
}

/// Filter the subscriber would be installed with
pub fn env_filter(config: &BindingsConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| config_filter(config))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install a global fmt subscriber on stderr
///
/// Returns false if a global subscriber was already installed; the existing
/// one is kept.
pub fn init(config: &BindingsConfig) -> bool {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(config.log_with_target())
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();

    if let Err(err) = config_filter(config) {
        tracing::warn!(
            target: "tocc.config",
            filter = config.log_filter(),
            error = %err,
            "invalid logging.filter, using '{}'",
            DEFAULT_LOG_FILTER
        );
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_filter(filter: &str) -> BindingsConfig {
        BindingsConfig::parse(&format!("[logging]\nfilter = \"{}\"\n", filter)).unwrap()
    }

    #[test]
    fn test_config_filter_accepts_directives() {
        let config = with_filter("tocc.manager=debug,warn");
        assert!(config_filter(&config).is_ok());
    }

    #[test]
    fn test_config_filter_rejects_bad_level() {
        let config = with_filter("tocc.manager=loud");
        assert!(config_filter(&config).is_err());
    }

    #[test]
    fn test_default_config_filter_parses() {
        assert!(config_filter(&BindingsConfig::default()).is_ok());
    }
}
