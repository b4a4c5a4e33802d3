//! TOML configuration loading.
//!
//! Loading merges the stored overrides over the defaults (every field of
//! `ChangelogConfig` has one) and validates the result:
//!
//! 1. `data_max_age`, when set, must parse as a retention age.
//! 2. `trash_id` must not be 0.
//! 3. `front_controller` must be an absolute script path.
//!
//! A disabled operation list is allowed (nothing gets logged), but it is
//! reported with a warning.

use std::path::Path;

use tracing::{debug, warn};

use changelog_contracts::{
    config::ChangelogConfig,
    error::{ChangelogError, ChangelogResult},
};

/// Parse `s` as TOML and validate it.
///
/// Returns `ChangelogError::ConfigError` if the TOML is malformed, names an
/// unknown operation or caller mode, or fails validation.
pub fn from_toml_str(s: &str) -> ChangelogResult<ChangelogConfig> {
    let config: ChangelogConfig = toml::from_str(s).map_err(|e| ChangelogError::ConfigError {
        reason: format!("failed to parse changelog TOML: {}", e),
    })?;
    validate(&config)?;
    Ok(config)
}

/// Read the file at `path` and parse it as changelog configuration.
pub fn from_file(path: &Path) -> ChangelogResult<ChangelogConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| ChangelogError::ConfigError {
        reason: format!("failed to read config file '{}': {}", path.display(), e),
    })?;
    debug!(path = %path.display(), "loading changelog configuration");
    from_toml_str(&contents)
}

/// Load from `path` when given, otherwise use the defaults.
pub fn load(path: Option<&Path>) -> ChangelogResult<ChangelogConfig> {
    match path {
        Some(path) => from_file(path),
        None => {
            debug!("no config file given; using defaults");
            Ok(ChangelogConfig::default())
        }
    }
}

/// Check the invariants TOML deserialization cannot express.
pub fn validate(config: &ChangelogConfig) -> ChangelogResult<()> {
    config.retention()?;

    if config.trash_id == 0 {
        return Err(ChangelogError::ConfigError {
            reason: "trash_id must not be 0".to_string(),
        });
    }

    if !config.front_controller.starts_with('/') {
        return Err(ChangelogError::ConfigError {
            reason: format!(
                "front_controller '{}' must be an absolute script path",
                config.front_controller
            ),
        });
    }

    if config.operations.iter().next().is_none() {
        warn!("no operations enabled; nothing will be logged");
    }

    Ok(())
}
