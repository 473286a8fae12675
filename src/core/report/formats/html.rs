//! HTML report generator
//!
//! Generates a self-contained HTML page with embedded CSS. Courses without
//! grades are styled as ongoing, goal rows are colored by status.

use crate::core::goals::GoalStatus;
use crate::core::report::{term_cell, ReportContext, ReportGenerator};
use std::error::Error;
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Embedded HTML report template
const HTML_TEMPLATE: &str = include_str!("../templates/report.html");

/// HTML report generator
pub struct HtmlReporter;

/// Escape text for use inside HTML elements
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// CSS class for a goal status
const fn status_class(status: GoalStatus) -> &'static str {
    match status {
        GoalStatus::NoGoalSet => "status-none",
        GoalStatus::Achieved => "status-achieved",
        GoalStatus::NotAchievable => "status-not-achievable",
        GoalStatus::VeryLikely => "status-very-likely",
        GoalStatus::Likely => "status-likely",
        GoalStatus::Possible => "status-possible",
        GoalStatus::Unlikely => "status-unlikely",
    }
}

impl HtmlReporter {
    /// Create a new HTML reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the report using template substitution
    #[allow(clippy::unused_self)]
    fn render_template(&self, ctx: &ReportContext) -> String {
        let mut output = HTML_TEMPLATE.to_string();

        output = output.replace("{{student_name}}", &escape(ctx.student_name()));
        output = output.replace("{{course_count}}", &ctx.course_count().to_string());
        output = output.replace("{{total_credits}}", &format!("{:.1}", ctx.total_credits()));
        output = output.replace("{{overall_gpa}}", &ctx.overall_gpa_display());
        output = output.replace("{{missing_policy}}", &ctx.policy.to_string());

        output = output.replace("{{course_rows}}", &Self::generate_course_rows(ctx));
        output = output.replace("{{term_rows}}", &Self::generate_term_rows(ctx));
        output = output.replace("{{target_rows}}", &Self::generate_target_rows(ctx));
        output = output.replace("{{goal_rows}}", &Self::generate_goal_rows(ctx));

        output
    }

    fn generate_course_rows(ctx: &ReportContext) -> String {
        let mut html = String::new();

        for row in &ctx.courses {
            let class = if row.grade.has_grades { "" } else { " class=\"ongoing\"" };
            let gpa = row.gpa.map_or_else(|| "-".to_string(), |g| format!("{g:.2}"));
            let _ = writeln!(
                html,
                "  <tr{class}><td>{}</td><td>{}</td><td>{:.1}</td><td>{}</td><td>{}</td><td>{gpa}</td><td>{}</td>\
                 <td><div class=\"progress\"><span style=\"width: {}%\"></span></div> {}%</td></tr>",
                escape(&row.course.id),
                escape(&row.course.name),
                row.course.credit_hours(),
                row.course.scale(),
                row.display,
                row.letter.unwrap_or("-"),
                row.progress,
                row.progress
            );
        }

        html
    }

    fn generate_term_rows(ctx: &ReportContext) -> String {
        let mut html = String::new();

        for row in &ctx.courses {
            let _ = writeln!(
                html,
                "  <tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&row.course.id),
                term_cell(row.course, &row.terms.midterm),
                term_cell(row.course, &row.terms.final_term)
            );
        }

        html
    }

    fn generate_target_rows(ctx: &ReportContext) -> String {
        let mut html = String::new();

        for row in &ctx.courses {
            let report = &row.feasibility;
            if !report.success {
                let _ = writeln!(
                    html,
                    "  <tr class=\"status-unlikely\"><td>{}</td><td colspan=\"5\">✗ {}</td></tr>",
                    escape(&row.course.id),
                    escape(&report.message)
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
                html,
                "  <tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{:+.2}</td><td>{}</td><td>{needed}</td></tr>",
                status_class(report.feasibility),
                escape(&row.course.id),
                report.current_grade,
                report.target_grade,
                report.difference,
                report.feasibility
            );
        }

        html
    }

    fn generate_goal_rows(ctx: &ReportContext) -> String {
        let mut html = String::new();

        for goal in &ctx.goals {
            match &goal.result {
                Ok(eval) => {
                    let _ = writeln!(
                        html,
                        "  <tr class=\"{}\"><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{:.0}%</td><td>{}</td></tr>",
                        status_class(eval.status),
                        escape(&eval.goal_id),
                        eval.goal_type,
                        eval.current_value,
                        eval.target_value,
                        eval.completion,
                        eval.status
                    );
                }
                Err(message) => {
                    let _ = writeln!(
                        html,
                        "  <tr class=\"status-unlikely\"><td>{}</td><td colspan=\"5\">✗ {}</td></tr>",
                        escape(&goal.goal_id),
                        escape(message)
                    );
                }
            }
        }

        html
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for HtmlReporter {
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
