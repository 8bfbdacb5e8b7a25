//! Configuration layering through files and environment variables.

use std::fs;

use opsfeed_core::config::{ConfigManager, LogFormat};

#[test]
fn test_files_and_environment_layer_in_order() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("opsfeed.toml"),
        r#"
[scheduler]
metrics_interval_ms = 1000
skip_if_busy = true

[health.thresholds.warning]
cpu = 60.0
memory = 70.0
load = 2.5

[logging]
format = "json"
"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("opsfeed.staging.toml"),
        "[seed_data]\nenabled = false\n",
    )
    .unwrap();

    std::env::set_var("OPSFEED__SIMULATION__SEED", "42");
    let result = ConfigManager::load_from_directory_with_env(Some(dir.path().to_path_buf()), "staging");
    std::env::remove_var("OPSFEED__SIMULATION__SEED");

    let manager = result.unwrap();
    let config = manager.config();

    assert_eq!(manager.environment(), "staging");
    assert_eq!(config.scheduler.metrics_interval_ms, 1000);
    assert!(config.scheduler.skip_if_busy);
    assert_eq!(config.health.thresholds.warning.cpu, 60.0);
    assert_eq!(config.health.thresholds.unhealthy.cpu, 85.0);
    assert!(!config.seed_data.enabled);
    assert_eq!(config.simulation.seed, Some(42));
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_unknown_environment_file_is_optional() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("opsfeed.toml"), "[events]\nchannel_capacity = 16\n").unwrap();

    let manager =
        ConfigManager::load_from_directory_with_env(Some(dir.path().to_path_buf()), "nowhere")
            .unwrap();
    assert_eq!(manager.config().events.channel_capacity, 16);
}

#[test]
fn test_malformed_file_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("opsfeed.toml"), "[scheduler\nbroken").unwrap();

    let err = ConfigManager::load_from_directory_with_env(Some(dir.path().to_path_buf()), "test")
        .unwrap_err();
    assert!(matches!(
        err,
        opsfeed_core::error::FeedError::ConfigurationError(_)
    ));
}
