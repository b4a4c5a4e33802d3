//! # changelog-contracts
//!
//! Shared types, configuration schema, and errors for the page changelog.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate: only data definitions, the details encoding, and error types.

pub mod config;
pub mod context;
pub mod details;
pub mod error;
pub mod event;
pub mod operation;
pub mod record;
pub mod retention;

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use config::ChangelogConfig;
    use details::Details;
    use error::ChangelogError;
    use event::{LifecycleEvent, LifecycleMethod, PageKind, PageRef, PageSnapshot, TemplateRef};
    use operation::{Operation, OperationSet};
    use retention::{AgeUnit, RetentionAge};

    fn snapshot() -> PageSnapshot {
        PageSnapshot::new(
            42,
            "about",
            PageRef::new(1, "/"),
            TemplateRef::new(29, "basic-page"),
        )
    }

    // ── Operation ────────────────────────────────────────────────────────────

    #[test]
    fn operation_labels_parse_back() {
        for op in Operation::ALL {
            let parsed: Operation = op.as_str().parse().unwrap();
            assert_eq!(parsed, op);
        }
    }

    #[test]
    fn operation_unknown_label_is_rejected() {
        let err = "archived".parse::<Operation>().unwrap_err();
        match err {
            ChangelogError::UnknownOperation { operation } => assert_eq!(operation, "archived"),
            other => panic!("expected UnknownOperation, got {:?}", other),
        }
    }

    #[test]
    fn operation_for_status() {
        assert_eq!(Operation::for_status(true), Operation::Published);
        assert_eq!(Operation::for_status(false), Operation::Unpublished);
    }

    // ── OperationSet ─────────────────────────────────────────────────────────

    #[test]
    fn operation_set_default_enables_all_nine() {
        let ops = OperationSet::default();
        assert_eq!(ops.iter().count(), 9);
        for op in Operation::ALL {
            assert!(ops.contains(op), "{op} should be enabled by default");
        }
    }

    #[test]
    fn operation_set_enable_and_disable() {
        let mut ops = OperationSet::empty();
        assert!(!ops.contains(Operation::Moved));

        ops.enable(Operation::Moved);
        ops.enable(Operation::Moved);
        assert!(ops.contains(Operation::Moved));
        assert_eq!(ops.iter().count(), 1);

        ops.disable(Operation::Moved);
        assert!(!ops.contains(Operation::Moved));
    }

    // ── LifecycleMethod ──────────────────────────────────────────────────────

    #[test]
    fn lifecycle_method_dispatch_table() {
        assert_eq!("saveReady".parse::<LifecycleMethod>().unwrap(), LifecycleMethod::SaveReady);
        assert_eq!("moved".parse::<LifecycleMethod>().unwrap(), LifecycleMethod::Moved);
        assert!(matches!(
            "trashed".parse::<LifecycleMethod>(),
            Err(ChangelogError::InvalidEvent { .. })
        ));
    }

    #[test]
    fn lifecycle_event_deserializes_with_defaults() {
        let json = r#"{
            "method": "saveReady",
            "page": {
                "id": 5,
                "name": "draft",
                "parent": { "id": 1, "url": "/" },
                "template": { "id": 29, "name": "basic-page" },
                "published": true,
                "previous_published": false,
                "url": "/draft/"
            }
        }"#;

        let event: LifecycleEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.method, LifecycleMethod::SaveReady);
        assert_eq!(event.page.kind, PageKind::Standard);
        assert_eq!(event.page.status_change(), Some(true));
        assert!(event.page.changed.is_empty());
    }

    // ── PageSnapshot ─────────────────────────────────────────────────────────

    #[test]
    fn snapshot_builds_url_from_parent() {
        let page = snapshot();
        assert_eq!(page.url, "/about/");
        assert_eq!(page.previous_url(), "/about/");
    }

    #[test]
    fn snapshot_previous_url_uses_previous_parent_and_name() {
        let mut page = snapshot();
        page.previous_parent = Some(PageRef::new(7, "/trash"));
        page.previous_name = Some("7.1.2_about".to_string());
        assert_eq!(page.previous_url(), "/trash/7.1.2_about/");
    }

    #[test]
    fn snapshot_any_previous_parent_means_parent_changing() {
        let mut page = snapshot();
        assert!(!page.parent_changing());

        page.previous_parent = Some(PageRef::new(1, "/"));
        assert!(page.parent_changing(), "same id still counts");

        page.previous_parent = Some(PageRef::new(1001, "/section/"));
        assert!(page.parent_changing());
    }

    #[test]
    fn snapshot_changed_fields_follow_template_order() {
        let mut page = snapshot();
        page.fields = vec!["title".into(), "body".into(), "sidebar".into()];
        page.changed = ["sidebar".to_string(), "title".to_string(), "unknown".to_string()]
            .into_iter()
            .collect();
        assert_eq!(page.changed_fields(), vec!["title", "sidebar"]);
    }

    // ── Details encoding ─────────────────────────────────────────────────────

    #[test]
    fn details_empty_encodes_to_null_marker() {
        let encoded = Details::new().encode().unwrap();
        assert!(encoded.is_none(), "empty details must encode to None");
        assert!(Details::decode(encoded.as_deref()).unwrap().is_empty());
        assert!(Details::decode(Some("")).unwrap().is_empty());
    }

    #[test]
    fn details_round_trip_keeps_order() {
        let details: Details = [
            ("Page title", "Draft"),
            ("Page name", "draft"),
            ("Page URL", "/draft/"),
        ]
        .into_iter()
        .collect();

        let encoded = details.encode().unwrap().unwrap();
        assert_eq!(
            encoded,
            r#"{"Page title":"Draft","Page name":"draft","Page URL":"/draft/"}"#
        );

        let decoded = Details::decode(Some(&encoded)).unwrap();
        assert_eq!(decoded, details);
        assert_eq!(
            decoded.labels().collect::<Vec<_>>(),
            vec!["Page title", "Page name", "Page URL"]
        );
    }

    #[test]
    fn details_insert_replaces_in_place() {
        let mut details = Details::new();
        details.insert("a", "1");
        details.insert("b", "2");
        details.insert("a", "3");
        assert_eq!(details.len(), 2);
        assert_eq!(details.iter().next(), Some(("a", "3")));
    }

    #[test]
    fn details_decode_rejects_non_map() {
        let err = Details::decode(Some("[1,2]")).unwrap_err();
        assert!(err.to_string().contains("details encoding error"));
    }

    // ── RetentionAge ─────────────────────────────────────────────────────────

    #[test]
    fn retention_age_parses_units() {
        assert_eq!("1 MONTH".parse::<RetentionAge>().unwrap(), RetentionAge::new(1, AgeUnit::Month));
        assert_eq!("2 weeks".parse::<RetentionAge>().unwrap(), RetentionAge::new(2, AgeUnit::Week));
        assert_eq!(" 30  days ".parse::<RetentionAge>().unwrap(), RetentionAge::new(30, AgeUnit::Day));
        assert_eq!("1 Year".parse::<RetentionAge>().unwrap(), RetentionAge::new(1, AgeUnit::Year));
    }

    #[test]
    fn retention_age_rejects_garbage() {
        for bad in ["", "MONTH", "1", "0 DAY", "-1 DAY", "1 FORTNIGHT", "1 MONTH AGO"] {
            assert!(bad.parse::<RetentionAge>().is_err(), "'{bad}' should not parse");
        }
    }

    #[test]
    fn retention_age_month_cutoff_is_calendar_based() {
        let now = Utc.with_ymd_and_hms(2026, 3, 31, 12, 0, 0).unwrap();
        let cutoff = RetentionAge::new(1, AgeUnit::Month).cutoff(now).unwrap();
        assert_eq!(cutoff, Utc.with_ymd_and_hms(2026, 2, 28, 12, 0, 0).unwrap());

        let cutoff = RetentionAge::new(1, AgeUnit::Week).cutoff(now).unwrap();
        assert_eq!(cutoff, Utc.with_ymd_and_hms(2026, 3, 24, 12, 0, 0).unwrap());
    }

    // ── ChangelogConfig ──────────────────────────────────────────────────────

    #[test]
    fn config_blank_retention_means_none() {
        let mut config = ChangelogConfig::default();
        assert!(config.retention().unwrap().is_none());

        config.data_max_age = Some("   ".to_string());
        assert!(config.retention().unwrap().is_none());

        config.data_max_age = Some("6 MONTH".to_string());
        assert_eq!(config.retention().unwrap(), Some(RetentionAge::new(6, AgeUnit::Month)));
    }

    // ── ChangelogError display messages ──────────────────────────────────────

    #[test]
    fn error_storage_display() {
        let err = ChangelogError::Storage {
            reason: "disk full".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("storage error"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn error_migration_display() {
        let err = ChangelogError::Migration {
            reason: "duplicate column".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("schema migration failed"));
        assert!(msg.contains("duplicate column"));
    }

    #[test]
    fn error_config_error_display() {
        let err = ChangelogError::ConfigError {
            reason: "trash_id must not be 0".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("configuration error"));
        assert!(msg.contains("trash_id"));
    }
}
