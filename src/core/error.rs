//! Error taxonomy for the calculation engine.
//!
//! The pure functions mostly resolve these to a numeric `0` at their weighted
//! sum sites; the variants exist so that the service layer can log what it
//! discarded and so that record loading can report something useful.

use thiserror::Error;

/// Errors raised while loading records or computing grades.
#[derive(Error, Debug)]
pub enum CalcError {
    /// A weighted sum had nothing to divide by, or produced a non-finite value.
    #[error("Computation failed: {0}")]
    Computation(String),

    /// No grades or categories were available for the requested calculation.
    #[error("No data: {0}")]
    MissingData(String),

    /// Data-entry validation failed; one message per problem.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// A GPA scale identifier that matches no known scale.
    #[error("Unknown GPA scale: '{0}'")]
    UnknownScale(String),

    /// A grading scale tag that matches no known scale.
    #[error("Unknown grading scale: '{0}'")]
    UnknownGradingScale(String),

    /// A goal or lookup referenced a course that is not in the record.
    #[error("Course '{0}' not found")]
    UnknownCourse(String),

    /// A target grade that cannot be interpreted in the course's units.
    #[error("Invalid target grade: {0}")]
    InvalidTarget(String),

    /// The record file could not be read.
    #[error("Failed to read student record: {0}")]
    RecordIo(#[from] std::io::Error),

    /// The record file is not valid TOML or does not match the schema.
    #[error("Failed to parse student record: {0}")]
    RecordParse(#[from] toml::de::Error),
}

/// Engine result alias.
pub type Result<T, E = CalcError> = std::result::Result<T, E>;
