//! Category model

use super::Assessment;
use serde::{Deserialize, Serialize};

/// A weighted group of assessments within a course (e.g., "Homework 30%")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Category identifier
    pub id: String,

    /// Category name
    pub name: String,

    /// Weight in percentage points; meant to sum to 100 across a course
    #[serde(default)]
    pub weight: f64,

    /// Assessments in this category, in entry order
    #[serde(default)]
    pub grades: Vec<Assessment>,
}

impl Category {
    /// Create a category without assessments
    #[must_use]
    pub const fn new(id: String, name: String, weight: f64) -> Self {
        Self {
            id,
            name,
            weight,
            grades: Vec::new(),
        }
    }

    /// Add an assessment, taking ownership of its category link
    pub fn add_grade(&mut self, mut grade: Assessment) {
        grade.category_id.clone_from(&self.id);
        self.grades.push(grade);
    }

    /// Builder-style variant of [`add_grade`](Self::add_grade)
    #[must_use]
    pub fn with_grade(mut self, grade: Assessment) -> Self {
        self.add_grade(grade);
        self
    }
}
