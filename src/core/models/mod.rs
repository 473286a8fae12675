//! Data models for `GradeAnalytics`

pub mod assessment;
pub mod category;
pub mod course;
pub mod goal;

pub use assessment::{Assessment, SemesterTerm};
pub use category::Category;
pub use course::{Course, GradingScale, RawTarget, DEFAULT_CREDIT_HOURS};
pub use goal::{Goal, GoalType};

use std::collections::HashMap;

/// Assessments keyed by category identifier
pub type GradesByCategory = HashMap<String, Vec<Assessment>>;

/// Assessments keyed by course identifier
pub type GradesByCourse = HashMap<String, Vec<Assessment>>;
