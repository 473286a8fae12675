//! Completion progress
//!
//! Progress counts an assessment as done only when its score is present and
//! non-zero. This differs from category averaging, where a 0 is a real 0%.

use crate::core::models::{Assessment, Category, GradesByCategory};

/// Completion of one category as a fraction in `[0, 1]`
///
/// A category without assessments has completion 0.
#[must_use]
pub fn category_completion(assessments: &[Assessment]) -> f64 {
    let scored = assessments.iter().filter(|a| a.is_scored()).count();
    #[allow(clippy::cast_precision_loss)]
    let completion = scored as f64 / assessments.len().max(1) as f64;
    completion
}

/// Weighted completion in percent, before rounding
fn weighted_completion<'a, F>(categories: &'a [Category], grades_for: F) -> f64
where
    F: Fn(&'a Category) -> &'a [Assessment],
{
    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    for category in categories {
        weighted += category.weight * category_completion(grades_for(category));
        total_weight += category.weight;
    }
    if total_weight > 0.0 {
        weighted / total_weight * 100.0
    } else {
        0.0
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_percent(value: f64) -> u32 {
    value.round().clamp(0.0, 100.0) as u32
}

/// Weighted completion percentage of a course, rounded to an integer.
///
/// Assessments are looked up in `grades_by_category` by category identifier;
/// a category missing from the map has no assessments.
#[must_use]
pub fn compute_course_progress(
    categories: &[Category],
    grades_by_category: &GradesByCategory,
) -> u32 {
    let progress = weighted_completion(categories, |category| {
        grades_by_category
            .get(&category.id)
            .map_or(&[][..], Vec::as_slice)
    });
    to_percent(progress)
}

/// Like [`compute_course_progress`], using the grades embedded in each category
#[must_use]
pub fn compute_embedded_progress(categories: &[Category]) -> u32 {
    to_percent(weighted_completion(categories, |category| {
        category.grades.as_slice()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(scores: &[Option<f64>]) -> Vec<Assessment> {
        scores
            .iter()
            .enumerate()
            .map(|(i, score)| {
                let a = Assessment::new(format!("a{i}"), "c".to_string(), 10.0);
                match score {
                    Some(s) => a.with_score(*s),
                    None => a,
                }
            })
            .collect()
    }

    #[test]
    fn half_done_category_and_empty_category() {
        let categories = [
            Category::new("a".to_string(), "A".to_string(), 50.0),
            Category::new("b".to_string(), "B".to_string(), 50.0),
        ];
        let mut grades = GradesByCategory::new();
        grades.insert("a".to_string(), items(&[Some(8.0), Some(9.0), None, None]));
        grades.insert("b".to_string(), Vec::new());

        assert_eq!(compute_course_progress(&categories, &grades), 25);
    }

    #[test]
    fn zero_scores_count_as_ungraded() {
        let graded = items(&[Some(0.0), Some(5.0)]);
        assert!((category_completion(&graded) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn empty_category_is_zero_complete() {
        assert!(category_completion(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_total_weight_is_zero_progress() {
        let categories = [Category::new("a".to_string(), "A".to_string(), 0.0)];
        let mut grades = GradesByCategory::new();
        grades.insert("a".to_string(), items(&[Some(8.0)]));
        assert_eq!(compute_course_progress(&categories, &grades), 0);
    }

    #[test]
    fn rounds_to_nearest_integer() {
        let categories = [Category::new("a".to_string(), "A".to_string(), 100.0)];
        let mut grades = GradesByCategory::new();
        grades.insert("a".to_string(), items(&[Some(1.0), Some(1.0), None]));
        // 66.67 -> 67
        assert_eq!(compute_course_progress(&categories, &grades), 67);
    }

    #[test]
    fn embedded_progress_uses_category_grades() {
        let mut category = Category::new("a".to_string(), "A".to_string(), 100.0);
        for a in items(&[Some(3.0), None]) {
            category.add_grade(a);
        }
        assert_eq!(compute_embedded_progress(&[category]), 50);
    }
}
