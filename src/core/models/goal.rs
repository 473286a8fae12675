//! Goal model

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a goal measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalType {
    /// A target grade in one course
    CourseGrade,
    /// A target GPA over one semester's courses
    SemesterGpa,
    /// A target GPA over all courses
    CumulativeGpa,
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CourseGrade => write!(f, "Course grade"),
            Self::SemesterGpa => write!(f, "Semester GPA"),
            Self::CumulativeGpa => write!(f, "Cumulative GPA"),
        }
    }
}

/// A stored academic goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Goal identifier
    pub id: String,

    /// Goal kind
    pub goal_type: GoalType,

    /// Target value (a GPA, or a percentage for percentage-graded courses)
    pub target_value: f64,

    /// Course the goal applies to (course-grade goals)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,

    /// Semester the goal applies to (semester goals)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,

    /// Academic year the goal applies to (semester goals)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic_year: Option<String>,

    /// Stored achievement flag
    #[serde(default)]
    pub is_achieved: bool,
}

impl Goal {
    /// Create a goal with no scope
    #[must_use]
    pub const fn new(id: String, goal_type: GoalType, target_value: f64) -> Self {
        Self {
            id,
            goal_type,
            target_value,
            course_id: None,
            semester: None,
            academic_year: None,
            is_achieved: false,
        }
    }

    /// Builder-style course scope
    #[must_use]
    pub fn for_course(mut self, course_id: &str) -> Self {
        self.course_id = Some(course_id.to_string());
        self
    }

    /// Builder-style semester scope
    #[must_use]
    pub fn for_semester(mut self, semester: &str, academic_year: Option<&str>) -> Self {
        self.semester = Some(semester.to_string());
        self.academic_year = academic_year.map(str::to_string);
        self
    }
}
