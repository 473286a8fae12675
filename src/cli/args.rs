//! CLI argument definitions for `GradeAnalytics`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use grade_analytics::config::ConfigOverrides;
use grade_analytics::logger::Level;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `logger::Level`
/// for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Level::from(*self))
    }
}

/// Missing-score policy argument
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum MissingPolicyArg {
    /// Leave ungraded assessments out of averages
    Exclude,
    /// Count ungraded assessments as 0
    Zero,
}

impl std::fmt::Display for MissingPolicyArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exclude => write!(f, "exclude"),
            Self::Zero => write!(f, "zero"),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `missing_policy`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Show course grades, GPA, progress and the overall GPA.
    Grades {
        /// Path to a student record (TOML)
        #[arg(value_name = "RECORD")]
        record: PathBuf,

        /// Show the midterm / final-term split per course
        #[arg(long)]
        terms: bool,
    },
    /// Evaluate stored goals and course targets.
    Goals {
        /// Path to a student record (TOML)
        #[arg(value_name = "RECORD")]
        record: PathBuf,
    },
    /// Convert between percentages and GPA values.
    Convert {
        /// Value to convert (a percentage, or a GPA with --to-percentage)
        #[arg(value_name = "VALUE", allow_negative_numbers = true)]
        value: f64,

        /// GPA scale: 4.0, 5.0, inverted-4.0, inverted-5.0 or bucket
        #[arg(short, long, value_name = "SCALE", default_value = "4.0")]
        scale: String,

        /// Convert a GPA value to a percentage instead
        #[arg(long)]
        to_percentage: bool,
    },
    /// Check a student record for data-entry problems.
    Validate {
        /// Path to a student record (TOML)
        #[arg(value_name = "RECORD")]
        record: PathBuf,
    },
    /// Generate a grade report from a student record.
    Report {
        /// Path to a student record (TOML)
        #[arg(value_name = "RECORD")]
        record: PathBuf,

        /// Output file path (optional; defaults to the reports directory)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Report format: markdown (md) or html
        #[arg(short, long, value_name = "FORMAT", default_value = "html")]
        format: String,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "gradeanalytics",
    about = "GradeAnalytics command-line interface",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config missing-score policy
    #[arg(long = "config-missing-policy", value_enum)]
    pub config_missing_policy: Option<MissingPolicyArg>,

    /// Override config missing-score policy (short form)
    #[arg(long = "missing", value_enum)]
    pub missing: Option<MissingPolicyArg>,

    /// Override config default GPA scale
    #[arg(long = "config-gpa-scale", value_name = "SCALE")]
    pub config_gpa_scale: Option<String>,

    /// Override config default GPA scale (short form)
    #[arg(long = "gpa-scale", value_name = "SCALE")]
    pub gpa_scale: Option<String>,

    /// Override config reports directory
    #[arg(long = "config-reports-dir", value_name = "DIR")]
    pub config_reports_dir: Option<PathBuf>,

    /// Override config reports directory (short form)
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Short-form flags (e.g., `--missing`) take precedence over long-form
    /// flags (e.g., `--config-missing-policy`) when both are provided.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self
                .config_log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.config_verbose,
            missing_policy: self
                .missing
                .or(self.config_missing_policy)
                .map(|p| p.to_string()),
            gpa_scale: self
                .gpa_scale
                .clone()
                .or_else(|| self.config_gpa_scale.clone()),
            reports_dir: self
                .reports_dir
                .as_ref()
                .or(self.config_reports_dir.as_ref())
                .map(|p| p.to_string_lossy().to_string()),
        }
    }
}
