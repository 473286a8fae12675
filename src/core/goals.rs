//! Goal likelihood estimation
//!
//! The estimator is a fixed rule table over the current GPA, the target GPA
//! and the completion rate. Rules are checked in order and the first match
//! wins:
//!
//! | Condition                               | Status         | Likelihood |
//! |-----------------------------------------|----------------|------------|
//! | no target                               | No Goal Set    | 0%         |
//! | current >= target                       | Achieved       | 100%       |
//! | completion >= 100                       | Not Achievable | 0%         |
//! | gap <= 0.5 and completion >= 75         | Very Likely    | 85%        |
//! | gap <= 1.0 and completion >= 50         | Likely         | 65%        |
//! | gap <= 2.0 and completion >= 25         | Possible       | 40%        |
//! | otherwise                               | Unlikely       | 20%        |
//!
//! On inverted scales both GPAs are mirrored first so that "higher is better"
//! holds for the comparison.

use crate::core::category::{assessment_percentage, MissingPolicy};
use crate::core::cgpa::compute_cgpa;
use crate::core::error::{CalcError, Result};
use crate::core::grade::compute_course_grade;
use crate::core::models::{
    Assessment, Category, Course, Goal, GoalType, GradesByCourse, GradingScale, RawTarget,
};
use crate::core::progress::compute_embedded_progress;
use crate::core::scale::{clamp_percentage, round_to_2_decimals, STANDARD_BUCKETS};
use std::fmt;

/// Outcome of the likelihood rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GoalStatus {
    /// No target was stored
    NoGoalSet,
    /// The target is already met
    Achieved,
    /// Everything is graded and the target is not met
    NotAchievable,
    /// Small gap with most work graded
    VeryLikely,
    /// Moderate gap with half the work graded
    Likely,
    /// Large gap with some work graded
    Possible,
    /// Anything else
    Unlikely,
}

impl GoalStatus {
    /// Display label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoGoalSet => "No Goal Set",
            Self::Achieved => "Achieved",
            Self::NotAchievable => "Not Achievable",
            Self::VeryLikely => "Very Likely",
            Self::Likely => "Likely",
            Self::Possible => "Possible",
            Self::Unlikely => "Unlikely",
        }
    }

    /// Likelihood in percent
    #[must_use]
    pub const fn likelihood(self) -> u8 {
        match self {
            Self::NoGoalSet | Self::NotAchievable => 0,
            Self::Achieved => 100,
            Self::VeryLikely => 85,
            Self::Likely => 65,
            Self::Possible => 40,
            Self::Unlikely => 20,
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}%)", self.label(), self.likelihood())
    }
}

/// Classify a GPA target
///
/// # Arguments
/// * `current_gpa` - GPA achieved so far
/// * `target_gpa` - Stored target, if any
/// * `completion_rate` - Completion percentage (0-100)
#[must_use]
pub fn classify(current_gpa: f64, target_gpa: Option<f64>, completion_rate: f64) -> GoalStatus {
    let Some(target) = target_gpa.filter(|t| t.is_finite()) else {
        return GoalStatus::NoGoalSet;
    };
    let gap = target - current_gpa;

    if current_gpa >= target {
        GoalStatus::Achieved
    } else if completion_rate >= 100.0 {
        GoalStatus::NotAchievable
    } else if gap <= 0.5 && completion_rate >= 75.0 {
        GoalStatus::VeryLikely
    } else if gap <= 1.0 && completion_rate >= 50.0 {
        GoalStatus::Likely
    } else if gap <= 2.0 && completion_rate >= 25.0 {
        GoalStatus::Possible
    } else {
        GoalStatus::Unlikely
    }
}

/// A target grade with its units resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetGrade {
    /// A percentage (from `"90%"`, a letter, or a number on a percentage course)
    Percentage(f64),
    /// A GPA value on the course's scale
    Gpa(f64),
}

impl TargetGrade {
    /// Interpret a raw target in the units of `course`.
    ///
    /// `"90%"` is always a percentage and a letter maps to the lower bound of
    /// its bucket. A bare number follows the course's grading scale.
    ///
    /// # Errors
    /// Returns [`CalcError::InvalidTarget`] when the text is neither a number,
    /// a percentage nor a known letter grade.
    pub fn parse(raw: &RawTarget, course: &Course) -> Result<Self> {
        match raw {
            RawTarget::Number(n) => Self::from_course_units(*n, course),
            RawTarget::Text(text) => {
                let trimmed = text.trim();
                if let Some(pct) = trimmed.strip_suffix('%') {
                    return pct
                        .trim()
                        .parse::<f64>()
                        .map(Self::Percentage)
                        .map_err(|_| CalcError::InvalidTarget(text.clone()));
                }
                if let Ok(n) = trimmed.parse::<f64>() {
                    return Self::from_course_units(n, course);
                }
                STANDARD_BUCKETS
                    .buckets()
                    .iter()
                    .find(|b| b.letter.eq_ignore_ascii_case(trimmed))
                    .map(|b| Self::Percentage(b.lower))
                    .ok_or_else(|| CalcError::InvalidTarget(text.clone()))
            }
        }
    }

    fn from_course_units(value: f64, course: &Course) -> Result<Self> {
        if !value.is_finite() {
            return Err(CalcError::InvalidTarget(value.to_string()));
        }
        Ok(match course.grading_scale {
            GradingScale::Percentage => Self::Percentage(value),
            GradingScale::Gpa => Self::Gpa(value),
            GradingScale::Points => Self::Percentage(value / course.max_points() * 100.0),
        })
    }

    /// The target as a GPA on the course's scale
    #[must_use]
    pub fn gpa(&self, course: &Course) -> f64 {
        match *self {
            Self::Percentage(p) => course.converter().percentage_to_gpa(clamp_percentage(p)),
            Self::Gpa(g) => g,
        }
    }

    /// The target as a percentage
    #[must_use]
    pub fn percentage(&self, course: &Course) -> f64 {
        match *self {
            Self::Percentage(p) => p,
            Self::Gpa(g) => course.converter().gpa_to_percentage(g),
        }
    }

    /// The target in the course's own units
    #[must_use]
    pub fn in_course_units(&self, course: &Course) -> f64 {
        match course.grading_scale {
            GradingScale::Gpa => self.gpa(course),
            GradingScale::Percentage => self.percentage(course),
            GradingScale::Points => self.percentage(course) * course.max_points() / 100.0,
        }
    }
}

/// Feasibility of one course target
#[derive(Debug, Clone, PartialEq)]
pub struct FeasibilityReport {
    /// Whether the analysis ran
    pub success: bool,
    /// Current grade in the course's units
    pub current_grade: f64,
    /// Target grade in the course's units
    pub target_grade: f64,
    /// `target_grade - current_grade`
    pub difference: f64,
    /// Rule-table classification
    pub feasibility: GoalStatus,
    /// Human-readable summary
    pub message: String,
    /// Completion percentage of the course
    pub completion: u32,
    /// Average percentage needed on the ungraded share to reach the target
    pub required_remaining_average: Option<f64>,
}

impl FeasibilityReport {
    /// A report for an analysis that could not run
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            current_grade: 0.0,
            target_grade: 0.0,
            difference: 0.0,
            feasibility: GoalStatus::NoGoalSet,
            message: message.into(),
            completion: 0,
            required_remaining_average: None,
        }
    }
}

/// Analyze how reachable `target` is for `course` given `grades`.
///
/// `grades` replaces the assessments embedded in the course; they are grouped
/// by `category_id`.
///
/// # Errors
/// Returns [`CalcError::InvalidTarget`] if the target cannot be interpreted.
pub fn analyze_goal_feasibility(
    course: &Course,
    target: Option<&RawTarget>,
    grades: &[Assessment],
    policy: MissingPolicy,
) -> Result<FeasibilityReport> {
    let categories = course.categories_with_grades(grades);
    let grade = compute_course_grade(&categories, policy);
    let completion = compute_embedded_progress(&categories);
    let current_grade = round_to_2_decimals(grade.present(course));

    let Some(raw) = target else {
        return Ok(FeasibilityReport {
            success: true,
            current_grade,
            target_grade: 0.0,
            difference: 0.0,
            feasibility: GoalStatus::NoGoalSet,
            message: format!("No target grade set for {}", course.name),
            completion,
            required_remaining_average: None,
        });
    };

    let target = TargetGrade::parse(raw, course)?;
    let converter = course.converter();
    let current_standing = converter.standing(grade.to_gpa(converter));
    let target_standing = converter.standing(target.gpa(course));
    let feasibility = classify(current_standing, Some(target_standing), f64::from(completion));

    let target_grade = round_to_2_decimals(target.in_course_units(course));
    let difference = round_to_2_decimals(target_grade - current_grade);
    let required = required_remaining_average(&categories, target.percentage(course), policy);

    let message = match feasibility {
        GoalStatus::Achieved => format!(
            "{}: current {current_grade} already meets the target {target_grade}",
            course.name
        ),
        GoalStatus::NotAchievable => format!(
            "{}: all work is graded and {current_grade} falls short of {target_grade}",
            course.name
        ),
        status => match required {
            Some(needed) => format!(
                "{}: {} to reach {target_grade}; needs an average of {needed:.1}% on remaining work",
                course.name,
                status.label()
            ),
            None => format!("{}: {} to reach {target_grade}", course.name, status.label()),
        },
    };

    Ok(FeasibilityReport {
        success: true,
        current_grade,
        target_grade,
        difference,
        feasibility,
        message,
        completion,
        required_remaining_average: required,
    })
}

/// Average percentage needed on every ungraded assessment for the final
/// course grade to reach `target_pct`.
///
/// Recorded scores keep their percentage and categories without assessments
/// stay at 0, as in [`compute_course_grade`]. `None` when nothing is left to
/// grade.
#[allow(clippy::cast_precision_loss)]
fn required_remaining_average(
    categories: &[Category],
    target_pct: f64,
    policy: MissingPolicy,
) -> Option<f64> {
    // final grade * total_weight = fixed + open * x
    let mut fixed = 0.0;
    let mut open = 0.0;
    let mut total_weight = 0.0;

    for category in categories.iter().filter(|c| c.weight > 0.0) {
        total_weight += category.weight;
        let counted: Vec<&Assessment> = category
            .grades
            .iter()
            .filter(|a| policy == MissingPolicy::Zero || a.max_score > 0.0)
            .collect();
        if counted.is_empty() {
            continue;
        }
        let count = counted.len() as f64;
        let recorded: f64 = counted
            .iter()
            .filter(|a| a.has_score())
            .map(|a| assessment_percentage(a))
            .sum();
        let pending = counted
            .iter()
            .filter(|a| !a.has_score() && a.max_score > 0.0)
            .count() as f64;
        fixed += category.weight * recorded / count;
        open += category.weight * pending / count;
    }

    if total_weight <= 0.0 || open <= 0.0 {
        return None;
    }
    let needed = (target_pct * total_weight - fixed) / open;
    Some(round_to_2_decimals(needed.max(0.0)))
}

/// Evaluation of one stored goal
#[derive(Debug, Clone, PartialEq)]
pub struct GoalEvaluation {
    /// Goal identifier
    pub goal_id: String,
    /// Goal kind
    pub goal_type: GoalType,
    /// Current value (course units or GPA)
    pub current_value: f64,
    /// Target value as stored
    pub target_value: f64,
    /// Completion percentage feeding the classification
    pub completion: f64,
    /// Rule-table classification
    pub status: GoalStatus,
    /// Whether the target is met
    pub is_achieved: bool,
}

/// Evaluate a stored goal against the student's courses
///
/// # Errors
/// - [`CalcError::UnknownCourse`] when a course goal names a missing course
/// - [`CalcError::MissingData`] when no course falls in a semester goal's scope
/// - [`CalcError::InvalidTarget`] when the target cannot be interpreted
pub fn evaluate_goal(
    goal: &Goal,
    courses: &[Course],
    grades_by_course: &GradesByCourse,
    policy: MissingPolicy,
) -> Result<GoalEvaluation> {
    let (current_value, completion, status) = match goal.goal_type {
        GoalType::CourseGrade => {
            let course_id = goal.course_id.as_deref().ok_or_else(|| {
                CalcError::MissingData(format!("goal '{}' has no course", goal.id))
            })?;
            let course = courses
                .iter()
                .find(|c| c.id == course_id)
                .ok_or_else(|| CalcError::UnknownCourse(course_id.to_string()))?;
            let grades = grades_by_course.get(course_id).map_or(&[][..], Vec::as_slice);
            let report = analyze_goal_feasibility(
                course,
                Some(&RawTarget::Number(goal.target_value)),
                grades,
                policy,
            )?;
            (report.current_grade, f64::from(report.completion), report.feasibility)
        }
        GoalType::SemesterGpa | GoalType::CumulativeGpa => {
            let scoped: Vec<&Course> = courses.iter().filter(|c| in_scope(goal, c)).collect();
            if scoped.is_empty() {
                return Err(CalcError::MissingData(format!(
                    "no courses in scope for goal '{}'",
                    goal.id
                )));
            }
            let summary = compute_cgpa(scoped.iter().copied(), grades_by_course, policy);
            let completion = credit_weighted_completion(&scoped, grades_by_course);
            let status = classify(summary.overall_gpa, Some(goal.target_value), completion);
            (summary.overall_gpa, completion, status)
        }
    };

    crate::verbose!("Goal '{}' ({}): {status}", goal.id, goal.goal_type);

    Ok(GoalEvaluation {
        goal_id: goal.id.clone(),
        goal_type: goal.goal_type,
        current_value,
        target_value: goal.target_value,
        completion,
        status,
        is_achieved: status == GoalStatus::Achieved,
    })
}

fn in_scope(goal: &Goal, course: &Course) -> bool {
    if goal.goal_type != GoalType::SemesterGpa {
        return true;
    }
    let semester_matches = goal
        .semester
        .as_deref()
        .is_none_or(|s| course.semester.as_deref() == Some(s));
    let year_matches = goal
        .academic_year
        .as_deref()
        .is_none_or(|y| course.academic_year.as_deref() == Some(y));
    semester_matches && year_matches
}

fn credit_weighted_completion(courses: &[&Course], grades_by_course: &GradesByCourse) -> f64 {
    let mut weighted = 0.0;
    let mut credits = 0.0;
    for course in courses {
        let grades = grades_by_course.get(&course.id).map_or(&[][..], Vec::as_slice);
        let progress = compute_embedded_progress(&course.categories_with_grades(grades));
        weighted += f64::from(progress) * course.credit_hours();
        credits += course.credit_hours();
    }
    if credits > 0.0 {
        round_to_2_decimals(weighted / credits)
    } else {
        0.0
    }
}
