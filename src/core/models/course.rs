//! Course model

use super::{Assessment, Category, GradesByCategory};
use crate::core::error::CalcError;
use crate::core::scale::{GpaScale, ScaleConverter};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Credit hours assumed when a course does not state any
pub const DEFAULT_CREDIT_HOURS: f64 = 3.0;

/// Units a course's grade is presented in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradingScale {
    /// 0-100 percentage
    #[default]
    Percentage,
    /// Grade points on the course's GPA scale
    Gpa,
    /// Points out of `max_points`
    Points,
}

impl fmt::Display for GradingScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percentage => write!(f, "percentage"),
            Self::Gpa => write!(f, "gpa"),
            Self::Points => write!(f, "points"),
        }
    }
}

impl FromStr for GradingScale {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percentage" | "percent" | "%" => Ok(Self::Percentage),
            "gpa" => Ok(Self::Gpa),
            "points" | "pts" => Ok(Self::Points),
            _ => Err(CalcError::UnknownGradingScale(s.to_string())),
        }
    }
}

/// A raw target grade as stored, before its units are resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTarget {
    /// A bare number, interpreted in the course's grading scale
    Number(f64),
    /// Text such as `"90%"`, `"3.5"` or `"B+"`
    Text(String),
}

impl fmt::Display for RawTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A course the student is taking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Course identifier
    pub id: String,

    /// Course name (e.g., "Data Structures")
    pub name: String,

    /// Units the course grade is presented in
    #[serde(default)]
    pub grading_scale: GradingScale,

    /// GPA scale used for conversion; defaults to the 4.0 linear scale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa_scale: Option<GpaScale>,

    /// Maximum points for the points grading scale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_points: Option<f64>,

    /// Credit hours (can be fractional); defaults to 3
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_hours: Option<f64>,

    /// Target grade as entered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_grade: Option<RawTarget>,

    /// Semester label (e.g., "Fall")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,

    /// Academic year label (e.g., "2025-2026")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic_year: Option<String>,

    /// Grading categories, in display order
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Course {
    /// Create a new percentage-graded course without categories
    ///
    /// # Arguments
    /// * `id` - Course identifier
    /// * `name` - Course name
    #[must_use]
    pub const fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            grading_scale: GradingScale::Percentage,
            gpa_scale: None,
            max_points: None,
            credit_hours: None,
            target_grade: None,
            semester: None,
            academic_year: None,
            categories: Vec::new(),
        }
    }

    /// Add a category
    pub fn add_category(&mut self, category: Category) {
        self.categories.push(category);
    }

    /// Effective GPA scale
    #[must_use]
    pub fn scale(&self) -> GpaScale {
        self.gpa_scale.unwrap_or_default()
    }

    /// Conversion strategy for this course
    #[must_use]
    pub fn converter(&self) -> &'static dyn ScaleConverter {
        self.scale().converter()
    }

    /// Effective credit hours (3 when unset)
    ///
    /// Zero or negative values pass through unchanged; they are flagged by
    /// `validation::validate_course`, not here.
    #[must_use]
    pub fn credit_hours(&self) -> f64 {
        self.credit_hours.unwrap_or(DEFAULT_CREDIT_HOURS)
    }

    /// Effective maximum points for the points scale (100 when unset)
    #[must_use]
    pub fn max_points(&self) -> f64 {
        self.max_points.filter(|p| *p > 0.0).unwrap_or(100.0)
    }

    /// All assessments across categories, each linked to its category
    #[must_use]
    pub fn all_grades(&self) -> Vec<Assessment> {
        self.categories
            .iter()
            .flat_map(|cat| {
                cat.grades.iter().map(|g| {
                    let mut g = g.clone();
                    g.category_id.clone_from(&cat.id);
                    g
                })
            })
            .collect()
    }

    /// Embedded assessments keyed by category identifier
    #[must_use]
    pub fn grades_by_category(&self) -> GradesByCategory {
        self.categories
            .iter()
            .map(|cat| (cat.id.clone(), cat.grades.clone()))
            .collect()
    }

    /// Copy of the categories with their grades replaced by `grades`,
    /// grouped on `category_id`. Assessments for unknown categories are dropped.
    #[must_use]
    pub fn categories_with_grades(&self, grades: &[Assessment]) -> Vec<Category> {
        let mut grouped: HashMap<&str, Vec<Assessment>> = HashMap::new();
        for grade in grades {
            grouped
                .entry(grade.category_id.as_str())
                .or_default()
                .push(grade.clone());
        }

        let categories: Vec<Category> = self
            .categories
            .iter()
            .map(|cat| Category {
                grades: grouped.remove(cat.id.as_str()).unwrap_or_default(),
                ..Category::new(cat.id.clone(), cat.name.clone(), cat.weight)
            })
            .collect();

        for (category_id, orphans) in grouped {
            crate::debug!(
                "Course '{}': ignoring {} assessment(s) for unknown category '{category_id}'",
                self.id,
                orphans.len()
            );
        }

        categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_course() -> Course {
        let mut course = Course::new("cs201".to_string(), "Data Structures".to_string());
        course.add_category(
            Category::new("hw".to_string(), "Homework".to_string(), 40.0).with_grade(
                Assessment::new("hw1".to_string(), String::new(), 10.0).with_score(8.0),
            ),
        );
        course.add_category(Category::new(
            "exam".to_string(),
            "Exams".to_string(),
            60.0,
        ));
        course
    }

    #[test]
    fn test_course_defaults() {
        let course = Course::new("x".to_string(), "X".to_string());
        assert_eq!(course.scale(), GpaScale::Standard4);
        assert!((course.credit_hours() - 3.0).abs() < f64::EPSILON);
        assert!((course.max_points() - 100.0).abs() < f64::EPSILON);
        assert_eq!(course.grading_scale, GradingScale::Percentage);
    }

    #[test]
    fn test_all_grades_links_categories() {
        let course = sample_course();
        let grades = course.all_grades();
        assert_eq!(grades.len(), 1);
        assert_eq!(grades[0].category_id, "hw");
    }

    #[test]
    fn test_grades_by_category_includes_empty_categories() {
        let course = sample_course();
        let map = course.grades_by_category();
        assert_eq!(map.get("hw").map(Vec::len), Some(1));
        assert_eq!(map.get("exam").map(Vec::len), Some(0));
    }

    #[test]
    fn test_categories_with_grades_regroups() {
        let course = sample_course();
        let grades = vec![
            Assessment::new("e1".to_string(), "exam".to_string(), 100.0).with_score(70.0),
            Assessment::new("zz".to_string(), "nope".to_string(), 100.0).with_score(70.0),
        ];
        let cats = course.categories_with_grades(&grades);
        assert_eq!(cats.len(), 2);
        assert!(cats[0].grades.is_empty());
        assert_eq!(cats[1].grades.len(), 1);
        assert!((cats[1].weight - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_grading_scale_parse() {
        assert_eq!("GPA".parse::<GradingScale>().unwrap(), GradingScale::Gpa);
        assert_eq!("points".parse::<GradingScale>().unwrap(), GradingScale::Points);
        assert!("letters".parse::<GradingScale>().is_err());
    }

    #[test]
    fn test_deserialize_course() {
        let course: Course = toml::from_str(
            r#"
id = "math1"
name = "Calculus I"
grading_scale = "gpa"
gpa_scale = "inverted-4.0"
credit_hours = 4
target_grade = "B+"

[[categories]]
id = "q"
name = "Quizzes"
weight = 100
"#,
        )
        .expect("parse course");

        assert_eq!(course.grading_scale, GradingScale::Gpa);
        assert_eq!(course.scale(), GpaScale::Inverted4);
        assert!((course.credit_hours() - 4.0).abs() < f64::EPSILON);
        assert_eq!(course.target_grade, Some(RawTarget::Text("B+".to_string())));
        assert_eq!(course.categories.len(), 1);
    }
}
