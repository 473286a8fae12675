//! Fail-soft service surface
//!
//! Every operation here returns a value even when the underlying calculation
//! fails: scalar calls fall back to `0` and envelope calls report
//! `success = false` with a message. Discarded errors are logged at warn level.

use crate::core::category::{compute_category_average, present_in_scale, MissingPolicy};
use crate::core::cgpa::compute_cgpa;
use crate::core::error::{CalcError, Result};
use crate::core::goals::{self, FeasibilityReport};
use crate::core::grade::compute_course_grade;
use crate::core::models::{
    Assessment, Category, Course, GradesByCategory, GradesByCourse, GradingScale, RawTarget,
};
use crate::core::progress::compute_course_progress;
use crate::core::scale::{clamp_percentage, GpaScale};
use std::fmt;

/// Result envelope of a service call
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    /// Whether the call produced a value
    pub success: bool,
    /// The value, when `success` is set
    pub value: Option<T>,
    /// Human-readable status
    pub message: String,
}

impl<T> Outcome<T> {
    /// Successful outcome
    pub fn ok(value: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            value: Some(value),
            message: message.into(),
        }
    }

    /// Failed outcome; the error is logged before it is discarded
    pub fn failed(operation: &str, err: &CalcError) -> Self {
        crate::warn!("{operation} failed: {err}");
        Self {
            success: false,
            value: None,
            message: err.to_string(),
        }
    }

    /// Wrap an engine result
    pub fn from_result(operation: &str, result: Result<T>) -> Self
    where
        T: fmt::Display,
    {
        match result {
            Ok(value) => {
                let message = format!("{operation}: {value}");
                Self::ok(value, message)
            }
            Err(err) => Self::failed(operation, &err),
        }
    }

    /// The value, or `fallback` when the call failed
    pub fn value_or(self, fallback: T) -> T {
        self.value.unwrap_or(fallback)
    }
}

fn finite(operation: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::Computation(format!("{operation} produced {value}")))
    }
}

fn parse_scale(scale_id: &str) -> Result<GpaScale> {
    scale_id.parse()
}

/// Category average in the course's native units, as an envelope
#[must_use]
pub fn try_calculate_category_average(
    assessments: &[Assessment],
    grading_scale: GradingScale,
    max_points: Option<f64>,
    policy: MissingPolicy,
) -> Outcome<f64> {
    let average = compute_category_average(assessments, policy);
    let value = present_in_scale(average.percent, grading_scale, max_points);
    Outcome::from_result("Category average", finite("Category average", value))
}

/// Category average in the course's native units; `0` on failure
#[must_use]
pub fn calculate_category_average(
    assessments: &[Assessment],
    grading_scale: GradingScale,
    max_points: Option<f64>,
    policy: MissingPolicy,
) -> f64 {
    try_calculate_category_average(assessments, grading_scale, max_points, policy).value_or(0.0)
}

/// Weighted course grade in the course's native units, as an envelope
#[must_use]
pub fn try_calculate_course_grade(
    categories: &[Category],
    grading_scale: GradingScale,
    max_points: Option<f64>,
    policy: MissingPolicy,
) -> Outcome<f64> {
    let grade = compute_course_grade(categories, policy);
    let value = present_in_scale(grade.percent, grading_scale, max_points);
    Outcome::from_result("Course grade", finite("Course grade", value))
}

/// Weighted course grade in the course's native units; `0` on failure
#[must_use]
pub fn calculate_course_grade(
    categories: &[Category],
    grading_scale: GradingScale,
    max_points: Option<f64>,
    policy: MissingPolicy,
) -> f64 {
    try_calculate_course_grade(categories, grading_scale, max_points, policy).value_or(0.0)
}

/// Percentage to GPA on the scale named `scale_id`, as an envelope
#[must_use]
pub fn try_convert_percentage_to_gpa(percentage: f64, scale_id: &str) -> Outcome<f64> {
    let result = parse_scale(scale_id)
        .map(|scale| scale.converter().percentage_to_gpa(clamp_percentage(percentage)));
    Outcome::from_result("Percentage to GPA", result)
}

/// Percentage to GPA on the scale named `scale_id`; `0` on failure
#[must_use]
pub fn convert_percentage_to_gpa(percentage: f64, scale_id: &str) -> f64 {
    try_convert_percentage_to_gpa(percentage, scale_id).value_or(0.0)
}

/// GPA to percentage on the scale named `scale_id`, as an envelope
#[must_use]
pub fn try_convert_gpa_to_percentage(gpa: f64, scale_id: &str) -> Outcome<f64> {
    let result = parse_scale(scale_id).and_then(|scale| {
        if gpa.is_finite() {
            Ok(scale.converter().gpa_to_percentage(gpa))
        } else {
            Err(CalcError::Computation(format!("cannot convert GPA {gpa}")))
        }
    });
    Outcome::from_result("GPA to percentage", result)
}

/// GPA to percentage on the scale named `scale_id`; `0` on failure
#[must_use]
pub fn convert_gpa_to_percentage(gpa: f64, scale_id: &str) -> f64 {
    try_convert_gpa_to_percentage(gpa, scale_id).value_or(0.0)
}

/// Weighted completion percentage of a course
#[must_use]
pub fn calculate_course_progress(
    categories: &[Category],
    grades_by_category: &GradesByCategory,
) -> u32 {
    compute_course_progress(categories, grades_by_category)
}

/// Overall credit-weighted GPA across `courses`
#[must_use]
pub fn update_cgpa(
    courses: &[Course],
    grades_by_course: &GradesByCourse,
    policy: MissingPolicy,
) -> Outcome<f64> {
    let summary = compute_cgpa(courses, grades_by_course, policy);
    if summary.contributions.is_empty() {
        return Outcome::ok(0.0, "No graded courses yet; overall GPA is 0");
    }
    match finite("CGPA", summary.overall_gpa) {
        Ok(gpa) => Outcome::ok(
            gpa,
            format!(
                "Overall GPA {gpa:.2} over {} course(s), {} credit hour(s)",
                summary.contributions.len(),
                summary.total_credit_hours()
            ),
        ),
        Err(err) => Outcome::failed("CGPA", &err),
    }
}

/// Feasibility of a course target; failures come back with `success = false`
#[must_use]
pub fn analyze_goal_feasibility(
    course: &Course,
    target: Option<&RawTarget>,
    grades: &[Assessment],
    policy: MissingPolicy,
) -> FeasibilityReport {
    match goals::analyze_goal_feasibility(course, target, grades, policy) {
        Ok(report) => report,
        Err(err) => {
            crate::warn!("Goal feasibility for '{}' failed: {err}", course.id);
            FeasibilityReport::failed(err.to_string())
        }
    }
}
