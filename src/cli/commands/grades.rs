//! Grades command handler

use grade_analytics::category::MissingPolicy;
use grade_analytics::config::Config;
use grade_analytics::grade::CourseGrade;
use grade_analytics::report::{display_grade, CourseRow, ReportContext};
use grade_analytics::verbose;
use std::path::Path;

/// Print per-course grades and the overall GPA for a record
pub fn run(record_path: &Path, show_terms: bool, config: &Config) {
    let record = super::load_record_or_exit(record_path, config);
    let policy = config.missing_policy();
    verbose!("Missing scores: {policy}");

    let ctx = ReportContext::build(&record, policy);
    println!("\n=== Grades: {} ===\n", ctx.student_name());

    for row in &ctx.courses {
        print_course(row);
        if show_terms {
            print_terms(row, policy);
        }
    }

    println!();
    println!(
        "Overall GPA: {} ({} of {} course(s) graded, {:.1} credit hour(s))",
        ctx.overall_gpa_display(),
        ctx.cgpa.contributions.len(),
        ctx.course_count(),
        ctx.cgpa.total_credit_hours()
    );
    for skipped in &ctx.cgpa.skipped {
        verbose!("  {skipped}: no recorded grades, not counted");
    }
}

fn print_course(row: &CourseRow) {
    let gpa = row
        .gpa
        .map_or_else(|| "-".to_string(), |g| format!("{g:.2}"));
    println!(
        "{:<10} {:<30} {:>12}  GPA {:>5} ({})  {:<2}  progress {:>3}%",
        row.course.id,
        row.course.name,
        row.display,
        gpa,
        row.course.scale(),
        row.letter.unwrap_or("-"),
        row.progress
    );
}

fn print_terms(row: &CourseRow, policy: MissingPolicy) {
    let cell = |grade: &CourseGrade| {
        if grade.has_grades {
            display_grade(row.course, grade)
        } else {
            "-".to_string()
        }
    };
    println!(
        "           midterm {:>12}  final term {:>12}  ({policy})",
        cell(&row.terms.midterm),
        cell(&row.terms.final_term)
    );
}
