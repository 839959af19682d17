//! BoardConfig loading from TOML and JSON.
//!
//! Run:
//!   cargo test -p regroup-runtime --features config --test config_loading

use regroup_core::constraint::MovementConstraint;
use regroup_runtime::config::{BoardConfig, DEFAULT_ROLLBACK_MESSAGE};
use regroup_runtime::error::ConfigError;

#[test]
fn empty_toml_is_default() {
    let config = BoardConfig::from_toml_str("").unwrap();
    assert_eq!(config, BoardConfig::default());
}

#[test]
fn partial_toml_overrides_only_given_fields() {
    let config = BoardConfig::from_toml_str(
        r#"
        rollback_message = "Order not saved."

        [gesture]
        activation_distance = 6

        [constraints]
        item_vertical_only = false
        "#,
    )
    .unwrap();

    assert_eq!(config.rollback_message, "Order not saved.");
    assert_eq!(config.gesture.activation_distance, 6);
    assert!(config.gesture.keyboard);
    assert_eq!(
        config.to_drag_constraints().item,
        MovementConstraint {
            vertical_only: false,
            within_parent: true,
        }
    );
    assert_eq!(config.notices, BoardConfig::default().notices);
}

#[test]
fn json_round_trips_through_serde() {
    let mut config = BoardConfig::default();
    config.notices.max_queued = 3;
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(BoardConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn malformed_input_reports_parser_error() {
    assert!(matches!(
        BoardConfig::from_toml_str("[gesture\nactivation_distance = 3"),
        Err(ConfigError::Toml(_))
    ));
    assert!(matches!(
        BoardConfig::from_json_str("{\"gesture\": 3}"),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn loaded_config_still_needs_validation() {
    let config = BoardConfig::from_json_str(r#"{"rollback_message": ""}"#).unwrap();
    let errors = config.validate();
    assert_eq!(errors, ["rollback_message must not be empty"]);
    assert_ne!(DEFAULT_ROLLBACK_MESSAGE, "");
}

#[test]
fn missing_file_is_io_error() {
    let err = BoardConfig::from_toml_file("/nonexistent/regroup.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
