//! Integration tests for layered configuration
//!
//! Precedence: host overrides > environment variables > config file > defaults

use roofline_core::config::{ConfigOverrides, ConfigSource, DetectorEndpoint, LayeredConfig};
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

const ENV_KEYS: [&str; 5] = [
    "ROOFLINE_IMAGERY_URL",
    "ROOFLINE_DETECTORS",
    "ROOFLINE_MIN_CONFIDENCE",
    "ROOFLINE_PIXELS_PER_FOOT",
    "ROOFLINE_TIMEOUT_SECS",
];

fn clear_env() {
    for key in ENV_KEYS {
        env::remove_var(key);
    }
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", contents).unwrap();
    file
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let file = config_file("min_confidence = 0.8\npixels_per_foot = 8.0");
    env::set_var("ROOFLINE_MIN_CONFIDENCE", "0.9");

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap().load_from_env();

    assert_eq!(config.min_confidence.value, 0.9);
    assert_eq!(config.min_confidence.source, ConfigSource::Environment);
    assert_eq!(config.pixels_per_foot.value, 8.0);
    assert_eq!(config.pixels_per_foot.source, ConfigSource::File);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_env_values_are_ignored() {
    clear_env();
    env::set_var("ROOFLINE_PIXELS_PER_FOOT", "ten");
    env::set_var("ROOFLINE_TIMEOUT_SECS", "-3");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.pixels_per_foot.value, 10.0);
    assert_eq!(config.pixels_per_foot.source, ConfigSource::Default);
    assert_eq!(config.timeout_secs.value, 30);

    clear_env();
}

#[test]
#[serial]
fn test_env_detector_list_and_overrides() {
    clear_env();
    env::set_var(
        "ROOFLINE_DETECTORS",
        "primary=https://detect.example.com/roof/2,https://detect.example.com/bldg/1",
    );

    let mut config = LayeredConfig::with_defaults().load_from_env();
    assert_eq!(config.detectors.value.len(), 2);
    assert_eq!(config.detectors.source, ConfigSource::Environment);

    config.apply_overrides(ConfigOverrides {
        detectors: Some(vec![DetectorEndpoint {
            name: "local".to_string(),
            url: "http://localhost:9001/infer".to_string(),
        }]),
        ..Default::default()
    });

    assert_eq!(config.detectors.value.len(), 1);
    assert_eq!(config.detectors.value[0].name, "local");
    assert_eq!(config.detectors.source, ConfigSource::Override);

    clear_env();
}

#[test]
#[serial]
fn test_preferred_imagery_from_env_without_key_placeholder() {
    clear_env();
    env::set_var("ROOFLINE_IMAGERY_URL", "https://imagery.example.com/{west}/{south}/{east}/{north}");

    let config = LayeredConfig::with_defaults().load_from_env();
    let (url, key) = config.preferred_imagery().unwrap().unwrap();

    assert!(url.starts_with("https://imagery.example.com/"));
    assert!(key.is_none());

    clear_env();
}

#[test]
fn test_malformed_file_is_config_error() {
    let file = config_file("min_confidence = [not toml");
    let err = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("file"));
}
