//! Weighted course grades
//!
//! A course grade is the weight-normalized mean of its category averages.
//! Only categories with a positive weight take part, and the denominator is the
//! sum of those weights, so weights that do not add up to 100 are normalized
//! rather than rejected. A category without assessments still counts its full
//! weight with an average of 0.

use crate::core::category::{compute_category_average, present_in_scale, MissingPolicy};
use crate::core::models::{Category, Course, GradingScale, SemesterTerm};
use crate::core::scale::{clamp_percentage, ScaleConverter};

/// A computed course grade
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CourseGrade {
    /// Weighted percentage (may exceed 100 through extra credit)
    pub percent: f64,
    /// Sum of the positive category weights
    pub total_weight: f64,
    /// Whether any assessment in the course has a recorded score
    pub has_grades: bool,
}

impl CourseGrade {
    /// Convert to GPA on `scale`, clamping the percentage first
    #[must_use]
    pub fn to_gpa(&self, scale: &dyn ScaleConverter) -> f64 {
        scale.percentage_to_gpa(clamp_percentage(self.percent))
    }

    /// The grade in the course's own units (percentage, GPA or points)
    #[must_use]
    pub fn present(&self, course: &Course) -> f64 {
        match course.grading_scale {
            GradingScale::Gpa => self.to_gpa(course.converter()),
            scale => present_in_scale(self.percent, scale, course.max_points),
        }
    }

    /// Letter grade for the (clamped) percentage on `scale`
    #[must_use]
    pub fn letter(&self, scale: &dyn ScaleConverter) -> &'static str {
        scale.letter_for(self.percent)
    }
}

/// Compute the weighted course grade for `categories`
#[must_use]
pub fn compute_course_grade(categories: &[Category], policy: MissingPolicy) -> CourseGrade {
    weighted_grade(categories, policy, |_| true)
}

/// Course grade restricted to one semester term
#[must_use]
pub fn compute_term_grade(
    categories: &[Category],
    term: SemesterTerm,
    policy: MissingPolicy,
) -> CourseGrade {
    weighted_grade(categories, policy, |a| a.semester_term == Some(term))
}

/// Midterm and final-term grades of one course
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TermBreakdown {
    /// Grade over MIDTERM assessments
    pub midterm: CourseGrade,
    /// Grade over `FINAL_TERM` assessments
    pub final_term: CourseGrade,
}

/// Split a course grade by semester term
#[must_use]
pub fn compute_term_breakdown(categories: &[Category], policy: MissingPolicy) -> TermBreakdown {
    TermBreakdown {
        midterm: compute_term_grade(categories, SemesterTerm::Midterm, policy),
        final_term: compute_term_grade(categories, SemesterTerm::FinalTerm, policy),
    }
}

fn weighted_grade<F>(categories: &[Category], policy: MissingPolicy, include: F) -> CourseGrade
where
    F: Fn(&crate::core::models::Assessment) -> bool,
{
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    let mut has_grades = false;

    for category in categories {
        let selected: Vec<_> = category
            .grades
            .iter()
            .filter(|a| include(a))
            .cloned()
            .collect();
        has_grades |= selected.iter().any(|a| a.has_score());

        if category.weight <= 0.0 {
            continue;
        }
        let average = compute_category_average(&selected, policy);
        weighted_sum += average.percent * category.weight;
        total_weight += category.weight;
    }

    let percent = if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        crate::debug!("Course has no positively weighted category; grade is 0");
        0.0
    };

    CourseGrade {
        percent,
        total_weight,
        has_grades,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Assessment;
    use crate::core::scale::GpaScale;

    fn cat(id: &str, weight: f64, scores: &[(f64, f64)]) -> Category {
        let mut category = Category::new(id.to_string(), id.to_string(), weight);
        for (i, (score, max)) in scores.iter().enumerate() {
            category.add_grade(
                Assessment::new(format!("{id}{i}"), String::new(), *max).with_score(*score),
            );
        }
        category
    }

    #[test]
    fn weighted_mean_of_category_averages() {
        let categories = [
            cat("hw", 30.0, &[(9.0, 10.0), (7.0, 10.0)]),
            cat("exam", 70.0, &[(90.0, 100.0)]),
        ];
        let grade = compute_course_grade(&categories, MissingPolicy::Exclude);
        // 80 * 0.3 + 90 * 0.7
        assert!((grade.percent - 87.0).abs() < 1e-9);
        assert!((grade.total_weight - 100.0).abs() < 1e-9);
        assert!(grade.has_grades);
    }

    #[test]
    fn empty_category_drags_grade_down() {
        let categories = [cat("hw", 50.0, &[(10.0, 10.0)]), cat("exam", 50.0, &[])];
        let grade = compute_course_grade(&categories, MissingPolicy::Exclude);
        assert!((grade.percent - 50.0).abs() < 1e-9);
    }

    #[test]
    fn weights_are_normalized_by_actual_sum() {
        let categories = [cat("a", 20.0, &[(10.0, 10.0)]), cat("b", 20.0, &[(5.0, 10.0)])];
        let grade = compute_course_grade(&categories, MissingPolicy::Exclude);
        assert!((grade.percent - 75.0).abs() < 1e-9);
    }

    #[test]
    fn zero_weight_categories_are_ignored() {
        let categories = [cat("a", 0.0, &[(0.0, 10.0)]), cat("b", 100.0, &[(8.0, 10.0)])];
        let grade = compute_course_grade(&categories, MissingPolicy::Exclude);
        assert!((grade.percent - 80.0).abs() < 1e-9);

        let none = compute_course_grade(&[cat("a", 0.0, &[(5.0, 10.0)])], MissingPolicy::Exclude);
        assert!(none.percent.abs() < f64::EPSILON);
        assert!(none.has_grades);
    }

    #[test]
    fn no_grades_is_flagged() {
        let mut category = Category::new("q".to_string(), "Quizzes".to_string(), 100.0);
        category.add_grade(Assessment::new("q1".to_string(), String::new(), 10.0));
        let grade = compute_course_grade(&[category], MissingPolicy::Exclude);
        assert!(!grade.has_grades);
        assert!(grade.percent.abs() < f64::EPSILON);
    }

    #[test]
    fn gpa_conversion_clamps_extra_credit() {
        let grade = CourseGrade {
            percent: 104.0,
            total_weight: 100.0,
            has_grades: true,
        };
        assert!((grade.to_gpa(GpaScale::Standard4.converter()) - 4.0).abs() < 1e-9);
        assert!((grade.to_gpa(GpaScale::Bucket.converter()) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn present_follows_grading_scale() {
        let mut course = Course::new("c".to_string(), "C".to_string());
        let grade = CourseGrade {
            percent: 50.0,
            total_weight: 100.0,
            has_grades: true,
        };
        assert!((grade.present(&course) - 50.0).abs() < 1e-9);

        course.grading_scale = GradingScale::Gpa;
        assert!((grade.present(&course) - 2.5).abs() < 1e-9);

        course.grading_scale = GradingScale::Points;
        course.max_points = Some(500.0);
        assert!((grade.present(&course) - 250.0).abs() < 1e-9);
    }

    #[test]
    fn term_breakdown_filters_assessments() {
        let mut category = Category::new("exam".to_string(), "Exams".to_string(), 100.0);
        category.add_grade(
            Assessment::new("mid".to_string(), String::new(), 100.0)
                .with_score(60.0)
                .with_term(SemesterTerm::Midterm),
        );
        category.add_grade(
            Assessment::new("fin".to_string(), String::new(), 100.0)
                .with_score(90.0)
                .with_term(SemesterTerm::FinalTerm),
        );
        category.add_grade(
            Assessment::new("pop".to_string(), String::new(), 100.0).with_score(0.0),
        );

        let split = compute_term_breakdown(&[category], MissingPolicy::Exclude);
        assert!((split.midterm.percent - 60.0).abs() < 1e-9);
        assert!((split.final_term.percent - 90.0).abs() < 1e-9);
    }
}
