//! Grade report generation
//!
//! Builds a per-course summary of a student record (grade, GPA, letter,
//! progress, term split and goal feasibility) and renders it as Markdown or
//! HTML. Courses without any recorded score are shown as "Ongoing"; that is a
//! display decision made here, the engine itself still reports a numeric 0.

pub mod formats;

use crate::core::category::MissingPolicy;
use crate::core::cgpa::{compute_cgpa, CgpaSummary};
use crate::core::goals::{evaluate_goal, FeasibilityReport, GoalEvaluation};
use crate::core::grade::{compute_course_grade, compute_term_breakdown, CourseGrade, TermBreakdown};
use crate::core::models::{Course, GradingScale};
use crate::core::progress::compute_embedded_progress;
use crate::core::record::StudentRecord;
use crate::core::service;
use std::error::Error;
use std::path::Path;

pub use formats::{HtmlReporter, MarkdownReporter, ReportFormat};

/// Label shown for courses that have no recorded score yet
pub const ONGOING: &str = "Ongoing";

/// Format a course grade for display in the course's own units
#[must_use]
pub fn display_grade(course: &Course, grade: &CourseGrade) -> String {
    if !grade.has_grades {
        return ONGOING.to_string();
    }
    let value = grade.present(course);
    match course.grading_scale {
        GradingScale::Percentage => format!("{value:.2}%"),
        GradingScale::Gpa => format!("{value:.2}"),
        GradingScale::Points => format!("{value:.1} / {:.0}", course.max_points()),
    }
}

/// One course line of a report
#[derive(Debug, Clone)]
pub struct CourseRow<'a> {
    /// The course
    pub course: &'a Course,
    /// Computed grade
    pub grade: CourseGrade,
    /// Grade formatted for display ("Ongoing" when nothing is graded)
    pub display: String,
    /// GPA on the course's scale, when graded
    pub gpa: Option<f64>,
    /// Letter grade, when graded
    pub letter: Option<&'static str>,
    /// Completion percentage
    pub progress: u32,
    /// Midterm / final-term split
    pub terms: TermBreakdown,
    /// Feasibility of the course's target grade
    pub feasibility: FeasibilityReport,
}

/// A stored goal and its evaluation (or the reason it could not be evaluated)
#[derive(Debug, Clone)]
pub struct GoalRow {
    /// Goal identifier
    pub goal_id: String,
    /// Evaluation or error message
    pub result: Result<GoalEvaluation, String>,
}

/// Data context for report generation
///
/// Everything a template needs, computed once from the record.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    /// Source record
    pub record: &'a StudentRecord,
    /// Missing-score policy used for the numbers
    pub policy: MissingPolicy,
    /// Per-course rows, in record order
    pub courses: Vec<CourseRow<'a>>,
    /// Cumulative GPA
    pub cgpa: CgpaSummary,
    /// Goal evaluations
    pub goals: Vec<GoalRow>,
}

impl<'a> ReportContext<'a> {
    /// Compute the context for `record`
    #[must_use]
    pub fn build(record: &'a StudentRecord, policy: MissingPolicy) -> Self {
        let grades_by_course = record.grades_by_course();

        let courses = record
            .courses
            .iter()
            .map(|course| {
                let grade = compute_course_grade(&course.categories, policy);
                let graded = grade.has_grades;
                let feasibility = service::analyze_goal_feasibility(
                    course,
                    course.target_grade.as_ref(),
                    &course.all_grades(),
                    policy,
                );
                CourseRow {
                    course,
                    display: display_grade(course, &grade),
                    gpa: graded.then(|| grade.to_gpa(course.converter())),
                    letter: graded.then(|| grade.letter(course.converter())),
                    progress: compute_embedded_progress(&course.categories),
                    terms: compute_term_breakdown(&course.categories, policy),
                    grade,
                    feasibility,
                }
            })
            .collect();

        let goals = record
            .goals
            .iter()
            .map(|goal| GoalRow {
                goal_id: goal.id.clone(),
                result: evaluate_goal(goal, &record.courses, &grades_by_course, policy)
                    .map_err(|e| e.to_string()),
            })
            .collect();

        Self {
            record,
            policy,
            courses,
            cgpa: compute_cgpa(&record.courses, &grades_by_course, policy),
            goals,
        }
    }

    /// Student display name
    #[must_use]
    pub fn student_name(&self) -> &str {
        self.record.student_name()
    }

    /// Total credit hours across all courses
    #[must_use]
    pub fn total_credits(&self) -> f64 {
        self.record.courses.iter().map(Course::credit_hours).sum()
    }

    /// Course count
    #[must_use]
    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// Overall GPA formatted for display
    #[must_use]
    pub fn overall_gpa_display(&self) -> String {
        if self.cgpa.contributions.is_empty() {
            ONGOING.to_string()
        } else {
            format!("{:.2}", self.cgpa.overall_gpa)
        }
    }
}

/// Format a term grade cell
fn term_cell(course: &Course, grade: &CourseGrade) -> String {
    if grade.has_grades {
        display_grade(course, grade)
    } else {
        "-".to_string()
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report to a file
    ///
    /// # Errors
    /// Returns an error if report generation or file writing fails
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>>;

    /// Generate report content as a string
    ///
    /// # Errors
    /// Returns an error if report generation fails
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>>;
}
