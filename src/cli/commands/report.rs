//! Report command handler

use grade_analytics::config::Config;
use grade_analytics::report::{
    HtmlReporter, MarkdownReporter, ReportContext, ReportFormat, ReportGenerator,
};
use std::path::{Path, PathBuf};

/// Generate a grade report for a record
pub fn run(record_path: &Path, output: Option<&Path>, format_str: &str, config: &Config) {
    let format: ReportFormat = match format_str.parse() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    };

    let record = super::load_record_or_exit(record_path, config);
    let ctx = ReportContext::build(&record, config.missing_policy());

    let output_path = output.map_or_else(
        || default_output_path(record_path, &config.paths.reports_dir, format),
        Path::to_path_buf,
    );

    let generator: Box<dyn ReportGenerator> = match format {
        ReportFormat::Markdown => Box::new(MarkdownReporter::new()),
        ReportFormat::Html => Box::new(HtmlReporter::new()),
    };

    match generator.generate(&ctx, &output_path) {
        Ok(()) => println!("✓ Report generated: {}", output_path.display()),
        Err(e) => {
            eprintln!("✗ Failed to generate report: {e}");
            std::process::exit(1);
        }
    }
}

/// `<reports_dir>/<record stem>.<ext>`, or next to the record when no
/// reports directory is configured
fn default_output_path(record_path: &Path, reports_dir: &str, format: ReportFormat) -> PathBuf {
    let stem = record_path
        .file_stem()
        .map_or_else(|| "report".into(), |s| s.to_string_lossy().to_string());
    let file_name = format!("{stem}_report.{}", format.extension());
    if reports_dir.is_empty() {
        record_path.with_file_name(file_name)
    } else {
        PathBuf::from(reports_dir).join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_uses_reports_dir() {
        let path = default_output_path(Path::new("data/alice.toml"), "/out", ReportFormat::Html);
        assert_eq!(path, PathBuf::from("/out/alice_report.html"));
    }

    #[test]
    fn default_path_falls_back_to_record_dir() {
        let path = default_output_path(Path::new("data/alice.toml"), "", ReportFormat::Markdown);
        assert_eq!(path, PathBuf::from("data/alice_report.md"));
    }
}
