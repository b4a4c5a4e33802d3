//! # changelog-config
//!
//! TOML-driven configuration for the page changelog.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//!
//! let config = changelog_config::from_file(Path::new("changelog.toml"))?;
//! // Pass `config` to `changelog_core::Recorder::new(...)`.
//! ```
//!
//! ## Example file
//!
//! ```toml
//! operations = ["added", "moved", "edited", "trashed", "restored"]
//! log_callers = "enabled"
//! data_max_age = "6 MONTH"
//! trash_id = 7
//! front_controller = "/index.php"
//! ```

pub mod loader;

pub use loader::{from_file, from_toml_str, load, validate};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::io::Write;

    use changelog_contracts::{
        config::{CallerLogging, ChangelogConfig, DEFAULT_TRASH_ID},
        error::ChangelogError,
        operation::Operation,
        retention::{AgeUnit, RetentionAge},
    };

    use crate::{from_file, from_toml_str, load};

    fn expect_config_error(toml: &str, needle: &str) {
        match from_toml_str(toml) {
            Err(ChangelogError::ConfigError { reason }) => assert!(
                reason.contains(needle),
                "expected '{needle}' in reason, got: {reason}"
            ),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    // ── 1. defaults ───────────────────────────────────────────────────────────

    /// An empty document is the default configuration.
    #[test]
    fn test_empty_document_is_default() {
        let config = from_toml_str("").unwrap();
        assert_eq!(config, ChangelogConfig::default());
        assert_eq!(config.trash_id, DEFAULT_TRASH_ID);
        assert_eq!(config.log_callers, CallerLogging::Disabled);
        assert!(config.retention().unwrap().is_none());
        for op in Operation::ALL {
            assert!(config.is_enabled(op));
        }
    }

    #[test]
    fn test_load_without_path_uses_defaults() {
        assert_eq!(load(None).unwrap(), ChangelogConfig::default());
    }

    // ── 2. overrides ──────────────────────────────────────────────────────────

    #[test]
    fn test_overrides_merge_over_defaults() {
        let toml = r#"
            operations = ["added", "trashed", "restored"]
            log_callers = "all"
            data_max_age = "3 MONTH"
        "#;

        let config = from_toml_str(toml).unwrap();
        assert!(config.is_enabled(Operation::Trashed));
        assert!(!config.is_enabled(Operation::Edited));
        assert_eq!(config.log_callers, CallerLogging::All);
        assert_eq!(
            config.retention().unwrap(),
            Some(RetentionAge::new(3, AgeUnit::Month))
        );
        assert_eq!(config.front_controller, "/index.php", "unset fields keep defaults");
    }

    #[test]
    fn test_empty_operation_list_is_allowed() {
        let config = from_toml_str("operations = []").unwrap();
        assert_eq!(config.operations.iter().count(), 0);
    }

    // ── 3. rejection ──────────────────────────────────────────────────────────

    #[test]
    fn test_unknown_operation_rejected() {
        expect_config_error(r#"operations = ["added", "archived"]"#, "failed to parse");
    }

    #[test]
    fn test_unknown_caller_mode_rejected() {
        expect_config_error(r#"log_callers = "sometimes""#, "failed to parse");
    }

    #[test]
    fn test_bad_retention_rejected() {
        expect_config_error(r#"data_max_age = "forever""#, "invalid retention age");
    }

    #[test]
    fn test_zero_trash_id_rejected() {
        expect_config_error("trash_id = 0", "trash_id");
    }

    #[test]
    fn test_relative_front_controller_rejected() {
        expect_config_error(r#"front_controller = "index.php""#, "front_controller");
    }

    // ── 4. files ──────────────────────────────────────────────────────────────

    #[test]
    fn test_from_file_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "data_max_age = \"1 YEAR\"").unwrap();
        writeln!(file, "trash_id = 9").unwrap();

        let config = from_file(file.path()).unwrap();

        assert_eq!(config.trash_id, 9);
        assert_eq!(
            config.retention().unwrap(),
            Some(RetentionAge::new(1, AgeUnit::Year))
        );
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(matches!(
            from_file(&path),
            Err(ChangelogError::ConfigError { .. })
        ));
    }
}
