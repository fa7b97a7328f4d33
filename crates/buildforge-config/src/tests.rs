//! Tests for optimizer configuration.

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        compaction_threshold = 500
        progress_interval = 2500

        [pruning]
        enabled = false

        [termination]
        minutes_spent_limit = 2
    "#;

    let config = OptimizerConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.compaction_threshold, 500);
    assert_eq!(config.progress_interval, 2500);
    assert!(!config.pruning.enabled);
    assert_eq!(config.time_limit(), Some(Duration::from_secs(120)));
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        progress_interval: 100
        termination:
          seconds_spent_limit: 30
    "#;

    let config = OptimizerConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.progress_interval, 100);
    assert_eq!(config.compaction_threshold, DEFAULT_COMPACTION_THRESHOLD);
    assert!(config.pruning.enabled);
    assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
}

#[test]
fn test_empty_document_uses_defaults() {
    let config = OptimizerConfig::from_toml_str("").unwrap();
    assert_eq!(config.compaction_threshold, 1000);
    assert_eq!(config.progress_interval, 10_000);
    assert!(config.pruning.enabled);
    assert!(config.termination.is_none());
}

#[test]
fn test_zero_interval_is_invalid() {
    let err = OptimizerConfig::from_toml_str("progress_interval = 0").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = OptimizerConfig::load("does/not/exist/optimizer.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_builder() {
    let config = OptimizerConfig::new()
        .with_compaction_threshold(64)
        .with_progress_interval(0)
        .with_pruning(false)
        .with_termination_seconds(60);

    assert_eq!(config.compaction_threshold, 64);
    assert_eq!(config.progress_interval, 1);
    assert!(!config.pruning.enabled);
    assert_eq!(config.time_limit(), Some(Duration::from_secs(60)));
}

#[test]
fn test_zero_time_limit_means_none() {
    let termination = TerminationConfig::default();
    assert_eq!(termination.time_limit(), None);
}
