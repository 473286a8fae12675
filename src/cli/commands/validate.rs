//! Validate command handler

use grade_analytics::config::Config;
use grade_analytics::validation::validate_course;
use std::path::Path;

/// Print data-entry problems in a record; exits with status 1 if any are found
pub fn run(record_path: &Path, config: &Config) {
    let record = super::load_record_or_exit(record_path, config);

    let problems: Vec<String> = record.courses.iter().flat_map(validate_course).collect();
    if problems.is_empty() {
        println!(
            "✓ {} course(s) in {} look valid",
            record.courses.len(),
            record_path.display()
        );
        return;
    }

    for problem in &problems {
        eprintln!("✗ {problem}");
    }
    eprintln!("\n{} problem(s) found", problems.len());
    std::process::exit(1);
}
