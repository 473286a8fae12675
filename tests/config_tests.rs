//! Integration tests for configuration management

use grade_analytics::category::MissingPolicy;
use grade_analytics::config::{Config, ConfigOverrides};
use grade_analytics::scale::GpaScale;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a temporary config directory
fn setup_temp_config() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_file = temp_dir.path().join("config.toml");
    (temp_dir, config_file)
}

#[test]
fn test_config_from_defaults() {
    let config = Config::from_defaults();

    assert!(
        !config.logging.level.is_empty(),
        "Default log level should not be empty"
    );
    assert!(
        !config.paths.reports_dir.is_empty(),
        "Default reports_dir should not be empty"
    );
    assert_eq!(config.missing_policy(), MissingPolicy::Exclude);
    assert_eq!(config.default_gpa_scale(), GpaScale::Standard4);
    assert!((config.grading.default_credit_hours - 3.0).abs() < f64::EPSILON);
}

#[test]
fn test_config_from_toml_basic() {
    let toml_str = r#"
[logging]
level = "info"
file = "/tmp/test.log"
verbose = true

[grading]
missing_policy = "zero"
default_gpa_scale = "5.0"
default_credit_hours = 4

[paths]
reports_dir = "./reports"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file, "/tmp/test.log");
    assert!(config.logging.verbose);
    assert_eq!(config.missing_policy(), MissingPolicy::Zero);
    assert_eq!(config.default_gpa_scale(), GpaScale::Standard5);
    assert!((config.grading.default_credit_hours - 4.0).abs() < f64::EPSILON);
    assert_eq!(config.paths.reports_dir, "./reports");
}

#[test]
fn test_config_from_toml_partial() {
    // Missing sections and fields take their defaults
    let toml_str = r#"
[logging]
level = "error"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse partial TOML");

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "");
    assert!(!config.logging.verbose);
    assert_eq!(config.grading.missing_policy, "");
    assert_eq!(config.missing_policy(), MissingPolicy::Exclude);
    assert_eq!(config.default_gpa_scale(), GpaScale::Standard4);
}

#[test]
fn test_invalid_grading_values_fall_back() {
    let toml_str = r#"
[logging]

[grading]
missing_policy = "guess"
default_gpa_scale = "7.0"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML");
    assert_eq!(config.missing_policy(), MissingPolicy::Exclude);
    assert_eq!(config.default_gpa_scale(), GpaScale::Standard4);
}

#[test]
fn test_config_variable_expansion() {
    let toml_str = r#"
[logging]
file = "$GRADE_ANALYTICS/test.log"

[paths]
reports_dir = "$GRADE_ANALYTICS/reports"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML with variables");

    assert!(config.logging.file.contains("gradeanalytics"));
    assert!(!config.logging.file.contains("$GRADE_ANALYTICS"));
    assert!(config.paths.reports_dir.ends_with("reports"));
    assert!(!config.paths.reports_dir.contains("$GRADE_ANALYTICS"));
}

#[test]
fn test_config_get_set() {
    let mut config = Config::from_defaults();

    assert!(config.get("level").is_some());

    config.set("level", "debug").expect("Failed to set level");
    assert_eq!(config.get("level").unwrap(), "debug");

    config
        .set("verbose", "true")
        .expect("Failed to set verbose");
    assert_eq!(config.get("verbose").unwrap(), "true");
    assert!(config.logging.verbose);

    config
        .set("missing-policy", "zero")
        .expect("Failed to set missing policy");
    assert_eq!(config.missing_policy(), MissingPolicy::Zero);

    config
        .set("gpa_scale", "Inverted-4.0")
        .expect("Failed to set GPA scale");
    assert_eq!(config.get("default_gpa_scale").unwrap(), "inverted-4.0");

    config
        .set("credit_hours", "4.5")
        .expect("Failed to set credit hours");
    assert_eq!(config.get("default-credit-hours").unwrap(), "4.5");

    assert!(config.get("unknown_key").is_none());
    assert!(config.set("unknown_key", "value").is_err());
}

#[test]
fn test_config_set_rejects_invalid_values() {
    let mut config = Config::from_defaults();
    let before = config.get("level");

    assert!(config.set("level", "loud").is_err());
    assert!(config.set("verbose", "sometimes").is_err());
    assert!(config.set("missing_policy", "guess").is_err());
    assert!(config.set("gpa_scale", "10.0").is_err());
    assert!(config.set("credit_hours", "-1").is_err());
    assert!(config.set("credit_hours", "three").is_err());

    assert_eq!(config.get("level"), before);
}

#[test]
fn test_config_unset() {
    let mut config = Config::from_defaults();
    let defaults = Config::from_defaults();

    config.set("missing_policy", "zero").expect("Failed to set policy");
    assert_eq!(config.grading.missing_policy, "zero");

    config
        .unset("missing_policy", &defaults)
        .expect("Failed to unset policy");
    assert_eq!(config.grading.missing_policy, defaults.grading.missing_policy);
    assert!(config.unset("nope", &defaults).is_err());
}

#[test]
fn test_config_save_and_load() {
    let (_temp_dir, config_file) = setup_temp_config();

    let mut config = Config::from_defaults();
    config.set("level", "info").expect("Failed to set level");
    config.set("gpa_scale", "bucket").expect("Failed to set scale");
    config.save_to(&config_file).expect("Failed to save config");

    let loaded = Config::load_from(&config_file);
    assert_eq!(loaded.logging.level, "info");
    assert_eq!(loaded.default_gpa_scale(), GpaScale::Bucket);
}

#[test]
fn test_load_from_creates_missing_file() {
    let (_temp_dir, config_file) = setup_temp_config();
    assert!(!config_file.exists());

    let config = Config::load_from(&config_file);
    assert!(config_file.exists());
    assert_eq!(config.logging.level, Config::from_defaults().logging.level);
}

#[test]
fn test_load_from_merges_new_fields() {
    let (_temp_dir, config_file) = setup_temp_config();
    fs::write(&config_file, "[logging]\nlevel = \"error\"\n").expect("Failed to write config");

    let config = Config::load_from(&config_file);
    assert_eq!(config.logging.level, "error");
    assert!(!config.grading.default_gpa_scale.is_empty());

    // Merged fields were written back
    let content = fs::read_to_string(&config_file).expect("Failed to read config");
    assert!(content.contains("default_gpa_scale"));
}

#[test]
fn test_load_from_invalid_file_uses_defaults() {
    let (_temp_dir, config_file) = setup_temp_config();
    fs::write(&config_file, "this is = = not toml").expect("Failed to write config");

    let config = Config::load_from(&config_file);
    assert_eq!(config.logging.level, Config::from_defaults().logging.level);
}

#[test]
fn test_config_overrides_apply() {
    let mut config = Config::from_defaults();

    let overrides = ConfigOverrides {
        level: Some("error".to_string()),
        file: Some("/custom/path.log".to_string()),
        verbose: Some(true),
        missing_policy: Some("zero".to_string()),
        gpa_scale: Some("5.0".to_string()),
        reports_dir: Some("./custom_reports".to_string()),
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/custom/path.log");
    assert!(config.logging.verbose);
    assert_eq!(config.missing_policy(), MissingPolicy::Zero);
    assert_eq!(config.default_gpa_scale(), GpaScale::Standard5);
    assert_eq!(config.paths.reports_dir, "./custom_reports");
}

#[test]
fn test_config_overrides_partial() {
    let mut config = Config::from_defaults();
    let defaults = Config::from_defaults();

    let overrides = ConfigOverrides {
        level: Some("debug".to_string()),
        ..ConfigOverrides::default()
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.grading.missing_policy, defaults.grading.missing_policy);
    assert_eq!(config.paths.reports_dir, defaults.paths.reports_dir);
}

#[test]
fn test_config_display_format() {
    let config = Config::from_defaults();
    let display_str = format!("{config}");

    assert!(display_str.contains("[logging]"));
    assert!(display_str.contains("[grading]"));
    assert!(display_str.contains("[paths]"));
    assert!(display_str.contains("missing_policy"));
    assert!(display_str.contains("default_gpa_scale"));
    assert!(display_str.contains("reports_dir"));
}

#[test]
fn test_merge_defaults_adds_missing_fields() {
    let toml_str = r#"
[logging]
level = "error"

[grading]
missing_policy = ""
default_credit_hours = 0

[paths]
reports_dir = ""
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse minimal config");
    let defaults = Config::from_defaults();

    let changed = config.merge_defaults(&defaults);

    assert!(
        changed,
        "merge_defaults should return true when fields are added"
    );
    assert_eq!(config.logging.level, "error");
    assert_eq!(config.grading.missing_policy, defaults.grading.missing_policy);
    assert!(config.grading.default_credit_hours > 0.0);
}

#[test]
fn test_merge_defaults_is_idempotent() {
    let mut config = Config::from_defaults();
    let defaults = Config::from_defaults();

    // Debug defaults leave `file` empty, so only a full config is a no-op
    config.logging.file = "/my/custom/path.log".to_string();
    assert!(!config.merge_defaults(&defaults));
    assert_eq!(config.logging.file, "/my/custom/path.log");
}

#[test]
fn test_get_gradeanalytics_dir() {
    let dir = Config::get_gradeanalytics_dir();

    assert!(dir.to_string_lossy().contains("gradeanalytics"));
    assert_ne!(dir, PathBuf::from("."));
}

#[test]
fn test_get_config_file_path() {
    let path = Config::get_config_file_path();

    let path_str = path.to_string_lossy();
    assert!(path_str.ends_with("config.toml") || path_str.ends_with("dconfig.toml"));
}
