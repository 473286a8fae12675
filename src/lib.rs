//! Shared library for `GradeAnalytics`
//! Contains the grade and progress calculation engine used by the CLI.

pub mod core;
pub mod logger;

pub use crate::core::*;
