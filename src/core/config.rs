//! Configuration module for `GradeAnalytics`

use crate::core::category::MissingPolicy;
use crate::core::scale::GpaScale;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the configuration directory in path values
const DIR_VARIABLE: &str = "$GRADE_ANALYTICS";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Grading defaults applied to records that leave them unset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GradingConfig {
    /// How ungraded assessments enter category averages (exclude, zero)
    #[serde(default)]
    pub missing_policy: String,
    /// GPA scale for courses that do not name one
    #[serde(default)]
    pub default_gpa_scale: String,
    /// Credit hours for courses that do not state any (0 = unset)
    #[serde(default)]
    pub default_credit_hours: f64,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for report output files
    #[serde(default)]
    pub reports_dir: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Grading defaults
    #[serde(default)]
    pub grading: GradingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override the missing-score policy
    pub missing_policy: Option<String>,
    /// Override the default GPA scale
    pub gpa_scale: Option<String>,
    /// Override reports output directory
    pub reports_dir: Option<String>,
}

impl Config {
    /// Get the `$GRADE_ANALYTICS` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/gradeanalytics`
    /// - macOS: `~/Library/Application Support/gradeanalytics`
    /// - Windows: `%APPDATA%\gradeanalytics`
    #[must_use]
    pub fn get_gradeanalytics_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gradeanalytics")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Only fields that are empty (or zero) here and set in `defaults` are
    /// updated, so upgrading adds new settings without touching existing ones.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    #[allow(clippy::useless_let_if_seq)]
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        if self.logging.level.is_empty() && !defaults.logging.level.is_empty() {
            self.logging.level.clone_from(&defaults.logging.level);
            changed = true;
        }
        if self.logging.file.is_empty() && !defaults.logging.file.is_empty() {
            self.logging.file.clone_from(&defaults.logging.file);
            changed = true;
        }

        if self.grading.missing_policy.is_empty() && !defaults.grading.missing_policy.is_empty() {
            self.grading
                .missing_policy
                .clone_from(&defaults.grading.missing_policy);
            changed = true;
        }
        if self.grading.default_gpa_scale.is_empty()
            && !defaults.grading.default_gpa_scale.is_empty()
        {
            self.grading
                .default_gpa_scale
                .clone_from(&defaults.grading.default_gpa_scale);
            changed = true;
        }
        if self.grading.default_credit_hours <= 0.0 && defaults.grading.default_credit_hours > 0.0 {
            self.grading.default_credit_hours = defaults.grading.default_credit_hours;
            changed = true;
        }

        if self.paths.reports_dir.is_empty() && !defaults.paths.reports_dir.is_empty() {
            self.paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir);
            changed = true;
        }

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Only non-`None` values replace config values; the file is not modified.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }
        if let Some(policy) = &overrides.missing_policy {
            self.grading.missing_policy.clone_from(policy);
        }
        if let Some(scale) = &overrides.gpa_scale {
            self.grading.default_gpa_scale.clone_from(scale);
        }
        if let Some(reports_dir) = &overrides.reports_dir {
            self.paths.reports_dir.clone_from(reports_dir);
        }
    }

    /// Effective missing-score policy (falls back to `exclude`)
    #[must_use]
    pub fn missing_policy(&self) -> MissingPolicy {
        if self.grading.missing_policy.is_empty() {
            return MissingPolicy::default();
        }
        self.grading.missing_policy.parse().unwrap_or_else(|e| {
            crate::warn!("{e}; using '{}'", MissingPolicy::default());
            MissingPolicy::default()
        })
    }

    /// Effective default GPA scale (falls back to 4.0)
    #[must_use]
    pub fn default_gpa_scale(&self) -> GpaScale {
        if self.grading.default_gpa_scale.is_empty() {
            return GpaScale::default();
        }
        self.grading.default_gpa_scale.parse().unwrap_or_else(|e| {
            crate::warn!("{e}; using '{}'", GpaScale::default());
            GpaScale::default()
        })
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds,
    /// inside [`get_gradeanalytics_dir`](Self::get_gradeanalytics_dir).
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_gradeanalytics_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$GRADE_ANALYTICS` in a string to the configuration directory
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_gradeanalytics_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Missing fields take their serde defaults; `$GRADE_ANALYTICS` is expanded
    /// in path values.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.reports_dir = Self::expand_variables(&config.paths.reports_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// Debug builds use `DefaultCLIConfigDebug.toml`, release builds
    /// `DefaultCLIConfigRelease.toml`.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).unwrap_or_else(|e| {
            crate::error!("Compiled-in default configuration is invalid: {e}");
            Self::default()
        })
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// - If the file exists: load it, merge missing fields from defaults and
    ///   save it back when something was added
    /// - Otherwise (first run): write the defaults to the file
    ///
    /// Falls back to defaults if the file cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_file_path())
    }

    /// [`load`](Self::load) with an explicit file path
    #[must_use]
    pub fn load_from(config_file: &Path) -> Self {
        let defaults = Self::from_defaults();

        if config_file.exists() {
            match fs::read_to_string(config_file) {
                Ok(content) => match Self::from_toml(&content) {
                    Ok(mut config) => {
                        if config.merge_defaults(&defaults) {
                            let _ = config.save_to(config_file);
                        }
                        return config;
                    }
                    Err(e) => {
                        crate::warn!("Ignoring invalid config {}: {e}", config_file.display());
                    }
                },
                Err(e) => {
                    crate::warn!("Cannot read config {}: {e}", config_file.display());
                }
            }
        } else {
            let _ = defaults.save_to(config_file);
        }

        defaults
    }

    /// Save configuration to the user config file
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be created or the file
    /// cannot be written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(&Self::get_config_file_path())
    }

    /// [`save`](Self::save) with an explicit file path
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file cannot
    /// be written.
    pub fn save_to(&self, config_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys: `level`, `file`, `verbose`, `missing_policy`,
    /// `default_gpa_scale` (`gpa_scale`), `default_credit_hours`
    /// (`credit_hours`), `reports_dir`. Dashes and underscores are interchangeable.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key.replace('-', "_").as_str() {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "missing_policy" => Some(self.grading.missing_policy.clone()),
            "default_gpa_scale" | "gpa_scale" => Some(self.grading.default_gpa_scale.clone()),
            "default_credit_hours" | "credit_hours" => {
                Some(self.grading.default_credit_hours.to_string())
            }
            "reports_dir" => Some(self.paths.reports_dir.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Values are validated before they are stored. Call
    /// [`save()`](Config::save) to persist changes.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or the value is invalid
    /// for it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key.replace('-', "_").as_str() {
            "level" => {
                value.parse::<crate::logger::Level>()?;
                self.logging.level = value.to_string();
            }
            "file" => self.logging.file = value.to_string(),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "missing_policy" => {
                value.parse::<MissingPolicy>().map_err(|e| e.to_string())?;
                self.grading.missing_policy = value.to_string();
            }
            "default_gpa_scale" | "gpa_scale" => {
                let scale = value.parse::<GpaScale>().map_err(|e| e.to_string())?;
                self.grading.default_gpa_scale = scale.id().to_string();
            }
            "default_credit_hours" | "credit_hours" => {
                let hours = value
                    .parse::<f64>()
                    .ok()
                    .filter(|h| h.is_finite() && *h > 0.0)
                    .ok_or_else(|| format!("Invalid credit hours: '{value}'"))?;
                self.grading.default_credit_hours = hours;
            }
            "reports_dir" => self.paths.reports_dir = value.to_string(),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset it to `defaults`)
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key.replace('-', "_").as_str() {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "missing_policy" => self
                .grading
                .missing_policy
                .clone_from(&defaults.grading.missing_policy),
            "default_gpa_scale" | "gpa_scale" => self
                .grading
                .default_gpa_scale
                .clone_from(&defaults.grading.default_gpa_scale),
            "default_credit_hours" | "credit_hours" => {
                self.grading.default_credit_hours = defaults.grading.default_credit_hours;
            }
            "reports_dir" => self
                .paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file so that the next [`load()`](Config::load)
    /// recreates it. Succeeds if the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be deleted.
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[grading]")?;
        writeln!(f, "  missing_policy = \"{}\"", self.grading.missing_policy)?;
        writeln!(f, "  default_gpa_scale = \"{}\"", self.grading.default_gpa_scale)?;
        writeln!(f, "  default_credit_hours = {}", self.grading.default_credit_hours)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  reports_dir = \"{}\"", self.paths.reports_dir)?;

        Ok(())
    }
}
