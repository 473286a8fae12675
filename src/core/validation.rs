//! Data-entry validation
//!
//! These checks run where grades and courses are entered, not inside the
//! calculation engine. Each returns every problem found rather than stopping at
//! the first one.

use crate::core::error::{CalcError, Result};
use crate::core::models::{Assessment, Category, Course};

/// Tolerance for the category weight sum
pub const WEIGHT_TOLERANCE: f64 = 0.01;

/// Problems with one assessment as entered
#[must_use]
pub fn validate_grade(grade: &Assessment) -> Vec<String> {
    let mut problems = Vec::new();

    if grade.category_id.trim().is_empty() {
        problems.push("Category is required".to_string());
    }
    if grade.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
        problems.push("Assessment name is required".to_string());
    }
    if grade.max_score.is_nan() || grade.max_score <= 0.0 {
        problems.push("Max score must be greater than 0".to_string());
    }
    if let Some(score) = grade.score {
        if score < 0.0 {
            problems.push("Score cannot be negative".to_string());
        } else if score > grade.max_score {
            problems.push(format!(
                "Score {score} cannot exceed max score {}",
                grade.max_score
            ));
        }
    }

    problems
}

/// Check that a course's category weights add up to 100
///
/// # Errors
/// Returns [`CalcError::Validation`] naming the actual sum.
pub fn validate_category_weights(categories: &[Category]) -> Result<()> {
    let mut problems = Vec::new();
    for category in categories.iter().filter(|c| c.weight < 0.0) {
        problems.push(format!("Category '{}' has a negative weight", category.name));
    }

    let total: f64 = categories.iter().map(|c| c.weight).sum();
    if !categories.is_empty() && (total - 100.0).abs() > WEIGHT_TOLERANCE {
        problems.push(format!("Category weights sum to {total}, expected 100"));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(CalcError::Validation(problems))
    }
}

/// Validate a whole course: weights, then every embedded assessment.
///
/// Messages are prefixed with the course identifier and, for assessments,
/// the assessment identifier.
#[must_use]
pub fn validate_course(course: &Course) -> Vec<String> {
    let mut problems = Vec::new();

    if course.credit_hours.is_some_and(|c| c <= 0.0) {
        problems.push(format!("{}: credit hours must be greater than 0", course.id));
    }
    if let Err(CalcError::Validation(weights)) = validate_category_weights(&course.categories) {
        problems.extend(weights.into_iter().map(|p| format!("{}: {p}", course.id)));
    }
    for grade in course.all_grades() {
        problems.extend(
            validate_grade(&grade)
                .into_iter()
                .map(|p| format!("{}/{}: {p}", course.id, grade.id)),
        );
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(id: &str, category: &str, max: f64) -> Assessment {
        let mut a = Assessment::new(id.to_string(), category.to_string(), max);
        a.name = Some(format!("Assessment {id}"));
        a
    }

    #[test]
    fn valid_grade_has_no_problems() {
        assert!(validate_grade(&named("a", "hw", 10.0).with_score(10.0)).is_empty());
        assert!(validate_grade(&named("a", "hw", 10.0)).is_empty());
    }

    #[test]
    fn reports_every_problem() {
        let bad = Assessment::new("a".to_string(), String::new(), 0.0).with_score(5.0);
        let problems = validate_grade(&bad);
        assert_eq!(problems.len(), 4);
        assert_eq!(problems[0], "Category is required");
        assert_eq!(problems[1], "Assessment name is required");
        assert_eq!(problems[2], "Max score must be greater than 0");
        assert!(problems[3].contains("cannot exceed"));
    }

    #[test]
    fn extra_credit_does_not_excuse_overflow() {
        let over = named("a", "hw", 10.0).with_score(12.0).with_extra_credit(2.0);
        assert_eq!(validate_grade(&over).len(), 1);
    }

    #[test]
    fn weights_must_sum_to_100() {
        let ok = [
            Category::new("a".to_string(), "A".to_string(), 40.0),
            Category::new("b".to_string(), "B".to_string(), 60.0),
        ];
        assert!(validate_category_weights(&ok).is_ok());

        let short = [Category::new("a".to_string(), "A".to_string(), 90.0)];
        let err = validate_category_weights(&short).unwrap_err();
        assert!(err.to_string().contains("sum to 90"));

        assert!(validate_category_weights(&[]).is_ok());
    }

    #[test]
    fn course_messages_are_prefixed() {
        let mut course = Course::new("cs".to_string(), "CS".to_string());
        let mut cat = Category::new("hw".to_string(), "Homework".to_string(), 100.0);
        cat.add_grade(named("q1", "hw", 10.0).with_score(11.0));
        course.add_category(cat);

        let problems = validate_course(&course);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].starts_with("cs/q1: "));
    }
}
