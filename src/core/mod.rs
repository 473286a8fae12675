//! Core module: the calculation engine and the record, config and report
//! layers around it

pub mod category;
pub mod cgpa;
pub mod config;
pub mod error;
pub mod goals;
pub mod grade;
pub mod models;
pub mod progress;
pub mod record;
pub mod report;
pub mod scale;
pub mod service;
pub mod validation;

pub use error::{CalcError, Result};

/// Returns the current version of the `GradeAnalytics` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
