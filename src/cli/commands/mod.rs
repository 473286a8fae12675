//! CLI command handlers for `GradeAnalytics`.
//!
//! Each command is implemented in its own submodule.

pub mod config;
pub mod convert;
pub mod goals;
pub mod grades;
pub mod report;
pub mod validate;

use grade_analytics::config::Config;
use grade_analytics::record::StudentRecord;
use std::path::Path;

/// Load a record and fill its unset course defaults from `config`.
///
/// Prints the error and exits with status 1 if the record cannot be loaded.
pub fn load_record_or_exit(path: &Path, config: &Config) -> StudentRecord {
    match StudentRecord::load(path) {
        Ok(mut record) => {
            record.apply_defaults(
                config.default_gpa_scale(),
                config.grading.default_credit_hours,
            );
            record
        }
        Err(e) => {
            eprintln!("✗ {}: {e}", path.display());
            std::process::exit(1);
        }
    }
}
