//! Cumulative GPA across courses
//!
//! Each course is graded from its own assessments, converted with its own GPA
//! scale and weighted by credit hours. A course without any recorded score is
//! left out entirely instead of counting as a 0 GPA.

use crate::core::category::MissingPolicy;
use crate::core::grade::compute_course_grade;
use crate::core::models::{Course, GradesByCourse};
use crate::core::scale::round_to_2_decimals;

/// One course's share of the cumulative GPA
#[derive(Debug, Clone, PartialEq)]
pub struct CourseContribution {
    /// Course identifier
    pub course_id: String,
    /// Weighted course percentage
    pub percent: f64,
    /// GPA on the course's scale
    pub gpa: f64,
    /// Credit hours used as weight
    pub credit_hours: f64,
}

/// Cumulative GPA together with how it was assembled
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CgpaSummary {
    /// Credit-weighted GPA rounded to 2 decimals; 0 when nothing contributed
    pub overall_gpa: f64,
    /// Courses that contributed
    pub contributions: Vec<CourseContribution>,
    /// Courses left out because they had no recorded score
    pub skipped: Vec<String>,
}

impl CgpaSummary {
    /// Total credit hours of the contributing courses
    #[must_use]
    pub fn total_credit_hours(&self) -> f64 {
        self.contributions.iter().map(|c| c.credit_hours).sum()
    }
}

/// Grade one course from `grades_by_course`, or `None` if none of its
/// categories holds a recorded score
#[must_use]
pub fn course_contribution(
    course: &Course,
    grades_by_course: &GradesByCourse,
    policy: MissingPolicy,
) -> Option<CourseContribution> {
    let grades = grades_by_course.get(&course.id)?;
    let categories = course.categories_with_grades(grades);
    let grade = compute_course_grade(&categories, policy);
    if !grade.has_grades {
        return None;
    }

    Some(CourseContribution {
        course_id: course.id.clone(),
        percent: grade.percent,
        gpa: grade.to_gpa(course.converter()),
        credit_hours: course.credit_hours(),
    })
}

/// Compute the credit-weighted GPA over `courses`
#[must_use]
pub fn compute_cgpa<'a, I>(
    courses: I,
    grades_by_course: &GradesByCourse,
    policy: MissingPolicy,
) -> CgpaSummary
where
    I: IntoIterator<Item = &'a Course>,
{
    let mut summary = CgpaSummary::default();
    let mut weighted = 0.0;
    let mut total_credits = 0.0;

    for course in courses {
        if let Some(contribution) = course_contribution(course, grades_by_course, policy) {
            crate::debug!(
                "Course '{}': {:.2}% -> GPA {:.2} x {} credit(s)",
                course.id,
                contribution.percent,
                contribution.gpa,
                contribution.credit_hours
            );
            weighted += contribution.gpa * contribution.credit_hours;
            total_credits += contribution.credit_hours;
            summary.contributions.push(contribution);
        } else {
            crate::debug!("Course '{}' has no recorded grades; skipped in CGPA", course.id);
            summary.skipped.push(course.id.clone());
        }
    }

    summary.overall_gpa = if total_credits > 0.0 {
        round_to_2_decimals(weighted / total_credits)
    } else {
        0.0
    };
    summary
}

/// Overall GPA across `courses` (the numeric part of [`compute_cgpa`])
#[must_use]
pub fn update_cgpa(
    courses: &[Course],
    grades_by_course: &GradesByCourse,
    policy: MissingPolicy,
) -> f64 {
    compute_cgpa(courses, grades_by_course, policy).overall_gpa
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Assessment, Category};
    use crate::core::scale::GpaScale;

    fn course(id: &str, credits: f64, scale: GpaScale) -> Course {
        let mut course = Course::new(id.to_string(), id.to_uppercase());
        course.credit_hours = Some(credits);
        course.gpa_scale = Some(scale);
        course.add_category(Category::new("all".to_string(), "All".to_string(), 100.0));
        course
    }

    fn scored(pct: f64) -> Vec<Assessment> {
        vec![Assessment::new("x".to_string(), "all".to_string(), 100.0).with_score(pct)]
    }

    #[test]
    fn credit_weighted_mean() {
        let courses = [
            course("a", 3.0, GpaScale::Bucket),
            course("b", 4.0, GpaScale::Bucket),
        ];
        let mut grades = GradesByCourse::new();
        grades.insert("a".to_string(), scored(83.5));
        grades.insert("b".to_string(), scored(100.0));

        let summary = compute_cgpa(&courses, &grades, MissingPolicy::Exclude);
        assert!((summary.overall_gpa - 3.57).abs() < 1e-9);
        assert_eq!(summary.contributions.len(), 2);
        assert!((summary.total_credit_hours() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn course_without_grades_is_skipped_not_zeroed() {
        let courses = [
            course("a", 3.0, GpaScale::Standard4),
            course("b", 3.0, GpaScale::Standard4),
        ];
        let mut grades = GradesByCourse::new();
        grades.insert("a".to_string(), scored(100.0));
        grades.insert(
            "b".to_string(),
            vec![Assessment::new("y".to_string(), "all".to_string(), 10.0)],
        );

        let summary = compute_cgpa(&courses, &grades, MissingPolicy::Exclude);
        assert!((summary.overall_gpa - 4.0).abs() < 1e-9);
        assert_eq!(summary.skipped, vec!["b".to_string()]);
    }

    #[test]
    fn nothing_contributed_is_zero() {
        let courses = [course("a", 3.0, GpaScale::Standard4)];
        assert!(update_cgpa(&courses, &GradesByCourse::new(), MissingPolicy::Exclude).abs() < 1e-9);
        assert!(update_cgpa(&[], &GradesByCourse::new(), MissingPolicy::Exclude).abs() < 1e-9);
    }

    #[test]
    fn scores_outside_known_categories_do_not_count() {
        let courses = [
            course("a", 3.0, GpaScale::Standard4),
            course("b", 3.0, GpaScale::Standard4),
        ];
        let mut grades = GradesByCourse::new();
        grades.insert("a".to_string(), scored(100.0));
        grades.insert(
            "b".to_string(),
            vec![Assessment::new("z".to_string(), "gone".to_string(), 10.0).with_score(9.0)],
        );

        let summary = compute_cgpa(&courses, &grades, MissingPolicy::Exclude);
        assert!((summary.overall_gpa - 4.0).abs() < 1e-9);
        assert_eq!(summary.contributions.len(), 1);
        assert_eq!(summary.skipped, vec!["b".to_string()]);
    }

    #[test]
    fn zero_credit_hours_give_zero() {
        let courses = [course("a", 0.0, GpaScale::Standard4)];
        let mut grades = GradesByCourse::new();
        grades.insert("a".to_string(), scored(90.0));

        let summary = compute_cgpa(&courses, &grades, MissingPolicy::Exclude);
        assert_eq!(summary.contributions.len(), 1);
        assert!(summary.overall_gpa.abs() < f64::EPSILON);
    }

    #[test]
    fn each_course_uses_its_own_scale() {
        let courses = [
            course("lin", 3.0, GpaScale::Standard5),
            course("inv", 3.0, GpaScale::Inverted5),
        ];
        let mut grades = GradesByCourse::new();
        grades.insert("lin".to_string(), scored(100.0));
        grades.insert("inv".to_string(), scored(100.0));

        let summary = compute_cgpa(&courses, &grades, MissingPolicy::Exclude);
        assert!((summary.contributions[0].gpa - 5.0).abs() < 1e-9);
        assert!((summary.contributions[1].gpa - 1.0).abs() < 1e-9);
        assert!((summary.overall_gpa - 3.0).abs() < 1e-9);
    }

    #[test]
    fn default_credit_hours_apply() {
        let mut a = course("a", 3.0, GpaScale::Standard4);
        a.credit_hours = None;
        let mut grades = GradesByCourse::new();
        grades.insert("a".to_string(), scored(50.0));
        let summary = compute_cgpa([&a], &grades, MissingPolicy::Exclude);
        assert!((summary.contributions[0].credit_hours - 3.0).abs() < 1e-9);
        assert!((summary.overall_gpa - 2.5).abs() < 1e-9);
    }
}
