//! Category averages
//!
//! One category's average is the plain mean of its assessments' percentages.
//! Extra-credit points are added to the score before the percentage is taken
//! and the result is never capped, so a category can exceed 100%.

use crate::core::error::CalcError;
use crate::core::models::{Assessment, GradingScale};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How assessments without a recorded score are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Leave ungraded assessments out of the mean
    #[default]
    Exclude,
    /// Count ungraded assessments as 0
    Zero,
}

impl fmt::Display for MissingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exclude => write!(f, "exclude"),
            Self::Zero => write!(f, "zero"),
        }
    }
}

impl FromStr for MissingPolicy {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exclude" | "skip" => Ok(Self::Exclude),
            "zero" | "0" => Ok(Self::Zero),
            other => Err(CalcError::Validation(vec![format!(
                "Unknown missing-score policy '{other}' (expected 'exclude' or 'zero')"
            )])),
        }
    }
}

/// Result of averaging one category
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CategoryAverage {
    /// Mean percentage over the retained assessments; 0 when none were retained
    pub percent: f64,
    /// Assessments that entered the mean
    pub retained: usize,
    /// Assessments with a recorded score
    pub scored: usize,
    /// Assessments without a recorded score
    pub missing: usize,
}

impl CategoryAverage {
    /// The average, or `None` when no assessment was retained
    #[must_use]
    pub const fn observed(&self) -> Option<f64> {
        if self.retained == 0 {
            None
        } else {
            Some(self.percent)
        }
    }

    /// Whether any assessment in the category has a recorded score
    #[must_use]
    pub const fn has_scores(&self) -> bool {
        self.scored > 0
    }
}

/// Percentage of a single assessment, extra credit included.
///
/// A missing score counts as 0 and a non-positive maximum yields 0.
#[must_use]
pub fn assessment_percentage(assessment: &Assessment) -> f64 {
    if assessment.max_score <= 0.0 {
        return 0.0;
    }
    let adjusted = assessment.score.unwrap_or(0.0) + assessment.bonus_points();
    adjusted / assessment.max_score * 100.0
}

/// Average one category's assessments under `policy`
#[must_use]
pub fn compute_category_average(
    assessments: &[Assessment],
    policy: MissingPolicy,
) -> CategoryAverage {
    let mut sum = 0.0;
    let mut retained = 0_usize;
    let mut scored = 0_usize;
    let mut missing = 0_usize;

    for assessment in assessments {
        if assessment.has_score() {
            scored += 1;
        } else {
            missing += 1;
        }

        let keep = match policy {
            MissingPolicy::Exclude => assessment.has_score() && assessment.max_score > 0.0,
            MissingPolicy::Zero => true,
        };
        if keep {
            sum += assessment_percentage(assessment);
            retained += 1;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let percent = if retained > 0 {
        sum / retained as f64
    } else {
        0.0
    };

    CategoryAverage {
        percent,
        retained,
        scored,
        missing,
    }
}

/// Present a percentage in a course's native units.
///
/// Points courses scale by `max_points`; percentage and GPA courses keep the
/// percentage, since GPA conversion is a separate explicit step.
#[must_use]
pub fn present_in_scale(
    percentage: f64,
    grading_scale: GradingScale,
    max_points: Option<f64>,
) -> f64 {
    match grading_scale {
        GradingScale::Points => {
            let max = max_points.filter(|p| *p > 0.0).unwrap_or(100.0);
            percentage * max / 100.0
        }
        GradingScale::Percentage | GradingScale::Gpa => percentage,
    }
}
