//! Student record file loading
//!
//! A record is a TOML document holding the student's courses (with their
//! categories and embedded assessments) and stored goals. See
//! `tests/samples/student_record.toml` for the layout.

use crate::core::error::Result;
use crate::core::models::{Course, Goal, GradesByCourse};
use crate::core::scale::GpaScale;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Who the record belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentInfo {
    /// Display name
    #[serde(default)]
    pub name: String,
}

/// Everything the engine needs about one student
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Student details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student: Option<StudentInfo>,

    /// Active courses
    #[serde(default)]
    pub courses: Vec<Course>,

    /// Stored goals
    #[serde(default)]
    pub goals: Vec<Goal>,
}

impl StudentRecord {
    /// Parse a record from TOML text
    ///
    /// # Errors
    /// Returns [`CalcError::RecordParse`](crate::core::error::CalcError::RecordParse)
    /// when the text is not valid TOML or does not match the record schema.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let record: Self = toml::from_str(toml_str)?;
        crate::debug!(
            "Parsed student record: {} course(s), {} goal(s)",
            record.courses.len(),
            record.goals.len()
        );
        Ok(record)
    }

    /// Read and parse a record file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        crate::verbose!("Loading student record from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Fill unset per-course scale and credit hours from configured defaults
    pub fn apply_defaults(&mut self, gpa_scale: GpaScale, credit_hours: f64) {
        for course in &mut self.courses {
            if course.gpa_scale.is_none() {
                course.gpa_scale = Some(gpa_scale);
            }
            if course.credit_hours.is_none() && credit_hours > 0.0 {
                course.credit_hours = Some(credit_hours);
            }
        }
    }

    /// Look up a course by identifier
    #[must_use]
    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    /// Embedded assessments keyed by course identifier
    #[must_use]
    pub fn grades_by_course(&self) -> GradesByCourse {
        self.courses
            .iter()
            .map(|course| (course.id.clone(), course.all_grades()))
            .collect()
    }

    /// Student display name, or a placeholder
    #[must_use]
    pub fn student_name(&self) -> &str {
        self.student
            .as_ref()
            .map(|s| s.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("Student")
    }
}
