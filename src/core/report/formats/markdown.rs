//! Markdown report generator
//!
//! Generates grade reports as Markdown tables. These render well in GitHub,
//! GitLab, and VS Code.

use crate::core::goals::GoalStatus;
use crate::core::report::{term_cell, ReportContext, ReportGenerator};
use std::error::Error;
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Embedded Markdown report template
const MARKDOWN_TEMPLATE: &str = include_str!("../templates/report.md");

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the report using template substitution
    #[allow(clippy::unused_self)]
    fn render_template(&self, ctx: &ReportContext) -> String {
        let mut output = MARKDOWN_TEMPLATE.to_string();

        output = output.replace("{{student_name}}", ctx.student_name());
        output = output.replace("{{course_count}}", &ctx.course_count().to_string());
        output = output.replace("{{total_credits}}", &format!("{:.1}", ctx.total_credits()));
        output = output.replace("{{overall_gpa}}", &ctx.overall_gpa_display());
        output = output.replace("{{missing_policy}}", &ctx.policy.to_string());

        output = output.replace("{{course_table}}", &Self::generate_course_table(ctx));
        output = output.replace("{{term_table}}", &Self::generate_term_table(ctx));
        output = output.replace("{{target_table}}", &Self::generate_target_table(ctx));
        output = output.replace("{{goal_table}}", &Self::generate_goal_table(ctx));

        output
    }

    fn generate_course_table(ctx: &ReportContext) -> String {
        let mut table = String::new();
        table.push_str("| Course | Name | Credits | Scale | Grade | GPA | Letter | Progress |\n");
        table.push_str("|---|---|---|---|---|---|---|---|\n");

        for row in &ctx.courses {
            let gpa = row.gpa.map_or_else(|| "-".to_string(), |g| format!("{g:.2}"));
            let _ = writeln!(
                table,
                "| {} | {} | {:.1} | {} | {} | {gpa} | {} | {}% |",
                row.course.id,
                row.course.name,
                row.course.credit_hours(),
                row.course.scale(),
                row.display,
                row.letter.unwrap_or("-"),
                row.progress
            );
        }

        table
    }

    fn generate_term_table(ctx: &ReportContext) -> String {
        let mut table = String::new();
        table.push_str("| Course | Midterm | Final term |\n");
        table.push_str("|---|---|---|\n");

        for row in &ctx.courses {
            let _ = writeln!(
                table,
                "| {} | {} | {} |",
                row.course.id,
                term_cell(row.course, &row.terms.midterm),
                term_cell(row.course, &row.terms.final_term)
            );
        }

        table
    }

    fn generate_target_table(ctx: &ReportContext) -> String {
        let mut table = String::new();
        table.push_str("| Course | Current | Target | Difference | Status | Needed on remaining |\n");
        table.push_str("|---|---|---|---|---|---|\n");

        for row in &ctx.courses {
            let report = &row.feasibility;
            if !report.success {
                let _ = writeln!(
                    table,
                    "| {} | - | - | - | ✗ {} | - |",
                    row.course.id, report.message
                );
                continue;
            }
            if report.feasibility == GoalStatus::NoGoalSet {
                continue;
            }
            let needed = report
                .required_remaining_average
                .map_or_else(|| "-".to_string(), |n| format!("{n:.1}%"));
            let _ = writeln!(
                table,
                "| {} | {} | {} | {:+.2} | {} | {needed} |",
                row.course.id,
                report.current_grade,
                report.target_grade,
                report.difference,
                report.feasibility
            );
        }

        table
    }

    fn generate_goal_table(ctx: &ReportContext) -> String {
        if ctx.goals.is_empty() {
            return "No goals recorded.\n".to_string();
        }

        let mut table = String::new();
        table.push_str("| Goal | Type | Current | Target | Completion | Status |\n");
        table.push_str("|---|---|---|---|---|---|\n");

        for goal in &ctx.goals {
            match &goal.result {
                Ok(eval) => {
                    let _ = writeln!(
                        table,
                        "| {} | {} | {:.2} | {:.2} | {:.0}% | {} |",
                        eval.goal_id,
                        eval.goal_type,
                        eval.current_value,
                        eval.target_value,
                        eval.completion,
                        eval.status
                    );
                }
                Err(message) => {
                    let _ = writeln!(table, "| {} | - | - | - | - | ✗ {message} |", goal.goal_id);
                }
            }
        }

        table
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for MarkdownReporter {
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let report_content = self.render(ctx)?;
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(output_path, report_content)?;
        Ok(())
    }

    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        Ok(self.render_template(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::category::MissingPolicy;
    use crate::core::models::{Assessment, Category, Course, Goal, GoalType, RawTarget};
    use crate::core::record::{StudentInfo, StudentRecord};

    fn record() -> StudentRecord {
        let mut course = Course::new("cs".to_string(), "Data Structures".to_string());
        course.target_grade = Some(RawTarget::Text("95%".to_string()));
        course.add_category(
            Category::new("hw".to_string(), "Homework".to_string(), 100.0)
                .with_grade(Assessment::new("h1".to_string(), String::new(), 10.0).with_score(9.0))
                .with_grade(Assessment::new("h2".to_string(), String::new(), 10.0)),
        );
        StudentRecord {
            student: Some(StudentInfo {
                name: "Ada".to_string(),
            }),
            courses: vec![course],
            goals: vec![Goal::new("g".to_string(), GoalType::SemesterGpa, 3.0)
                .for_semester("Spring", None)],
        }
    }

    #[test]
    fn renders_all_sections() {
        let record = record();
        let ctx = ReportContext::build(&record, MissingPolicy::Exclude);
        let output = MarkdownReporter::new().render(&ctx).expect("render");

        assert!(output.starts_with("# Grade Report: Ada"));
        assert!(output.contains("| cs | Data Structures | 3.0 | 4.0 | 90.00% | 3.70 | B+ | 50% |"));
        assert!(output.contains("| Overall GPA | 3.70 |"));
        assert!(output.contains("Likely (65%)"));
        assert!(output.contains("✗ No data: no courses in scope for goal 'g'"));
        assert!(!output.contains("{{"));
    }

    #[test]
    fn writes_file() {
        let record = record();
        let ctx = ReportContext::build(&record, MissingPolicy::Exclude);
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out").join("report.md");
        MarkdownReporter::new().generate(&ctx, &path).expect("generate");
        assert!(path.exists());
    }
}
