//! GPA scale conversion
//!
//! Two conversion strategies coexist and are selected per course:
//! a continuous [`LinearScale`] parametrized by `{min, max, inverted}` and the
//! stepped [`BucketScale`] table. Both implement [`ScaleConverter`]. The two are
//! not numerically reconcilable, so a course must always be converted with its
//! own scale and never a mix of both.

use crate::core::error::CalcError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Lowest valid percentage.
pub const MIN_PERCENTAGE: f64 = 0.0;

/// Highest valid percentage.
pub const MAX_PERCENTAGE: f64 = 100.0;

/// Round to two decimals (half away from zero).
#[must_use]
pub fn round_to_2_decimals(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Clamp a percentage into `[0, 100]`; non-finite values become `0`.
#[must_use]
pub fn clamp_percentage(percentage: f64) -> f64 {
    if !percentage.is_finite() {
        crate::warn!("Non-finite percentage {percentage} treated as 0");
        return MIN_PERCENTAGE;
    }
    let clamped = percentage.clamp(MIN_PERCENTAGE, MAX_PERCENTAGE);
    if (clamped - percentage).abs() > f64::EPSILON {
        crate::debug!("Percentage {percentage} clamped to {clamped}");
    }
    clamped
}

/// Common contract of the GPA conversion strategies.
pub trait ScaleConverter: fmt::Debug + Send + Sync {
    /// Convert a percentage into a GPA value on this scale.
    fn percentage_to_gpa(&self, percentage: f64) -> f64;

    /// Convert a GPA value back into a percentage.
    ///
    /// Exact inverse for linear scales; the bucket midpoint for stepped scales.
    fn gpa_to_percentage(&self, gpa: f64) -> f64;

    /// Lowest GPA value this scale can produce.
    fn min_gpa(&self) -> f64;

    /// Highest GPA value this scale can produce.
    fn max_gpa(&self) -> f64;

    /// Whether a larger GPA value means a better result.
    fn higher_is_better(&self) -> bool {
        true
    }

    /// Map a GPA onto an axis where larger is always better.
    ///
    /// Inverted scales are mirrored around their midpoint so that gaps between
    /// two standings keep their magnitude.
    fn standing(&self, gpa: f64) -> f64 {
        if self.higher_is_better() {
            gpa
        } else {
            self.min_gpa() + self.max_gpa() - gpa
        }
    }

    /// Letter grade for a percentage, taken from the bucket table.
    fn letter_for(&self, percentage: f64) -> &'static str {
        STANDARD_BUCKETS.bucket_for(clamp_percentage(percentage)).letter
    }
}

/// Continuous linear mapping between `[0, 100]` and `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    /// GPA value at 0% (or at 100% when inverted)
    pub min: f64,
    /// GPA value at 100% (or at 0% when inverted)
    pub max: f64,
    /// When set, 100% maps to `min` and 0% maps to `max`
    pub inverted: bool,
}

impl LinearScale {
    /// Create a new linear scale.
    #[must_use]
    pub const fn new(min: f64, max: f64, inverted: bool) -> Self {
        Self { min, max, inverted }
    }

    fn span(&self) -> f64 {
        self.max - self.min
    }
}

impl ScaleConverter for LinearScale {
    fn percentage_to_gpa(&self, percentage: f64) -> f64 {
        let fraction = clamp_percentage(percentage) / MAX_PERCENTAGE;
        let gpa = if self.inverted {
            self.max - fraction * self.span()
        } else {
            self.min + fraction * self.span()
        };
        round_to_2_decimals(gpa)
    }

    fn gpa_to_percentage(&self, gpa: f64) -> f64 {
        if self.span() <= 0.0 || !gpa.is_finite() {
            return MIN_PERCENTAGE;
        }
        let gpa = gpa.clamp(self.min, self.max);
        let fraction = if self.inverted {
            (self.max - gpa) / self.span()
        } else {
            (gpa - self.min) / self.span()
        };
        round_to_2_decimals(fraction * MAX_PERCENTAGE)
    }

    fn min_gpa(&self) -> f64 {
        self.min
    }

    fn max_gpa(&self) -> f64 {
        self.max
    }

    fn higher_is_better(&self) -> bool {
        !self.inverted
    }
}

/// One row of a stepped scale: `[lower, upper)` maps to `gpa`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeBucket {
    /// Inclusive lower bound (percentage)
    pub lower: f64,
    /// Exclusive upper bound (percentage); inclusive for the top bucket
    pub upper: f64,
    /// GPA value of the bucket
    pub gpa: f64,
    /// Letter grade of the bucket
    pub letter: &'static str,
}

impl GradeBucket {
    fn contains(&self, percentage: f64) -> bool {
        percentage >= self.lower
            && (percentage < self.upper
                || (self.upper >= MAX_PERCENTAGE && percentage <= self.upper))
    }

    fn midpoint(&self) -> f64 {
        round_to_2_decimals((self.lower + self.upper) / 2.0)
    }
}

/// Stepped scale: an ordered table of non-overlapping percentage ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketScale {
    buckets: &'static [GradeBucket],
}

static STANDARD_BUCKET_TABLE: [GradeBucket; 8] = [
    GradeBucket { lower: 0.0, upper: 59.5, gpa: 0.0, letter: "F" },
    GradeBucket { lower: 59.5, upper: 65.5, gpa: 1.0, letter: "D" },
    GradeBucket { lower: 65.5, upper: 71.5, gpa: 1.5, letter: "D+" },
    GradeBucket { lower: 71.5, upper: 77.5, gpa: 2.0, letter: "C" },
    GradeBucket { lower: 77.5, upper: 83.5, gpa: 2.5, letter: "C+" },
    GradeBucket { lower: 83.5, upper: 89.5, gpa: 3.0, letter: "B" },
    GradeBucket { lower: 89.5, upper: 95.5, gpa: 3.5, letter: "B+" },
    GradeBucket { lower: 95.5, upper: 100.0, gpa: 4.0, letter: "A" },
];

/// The standard 8-bucket table (0.00 to 4.00).
pub static STANDARD_BUCKETS: BucketScale = BucketScale {
    buckets: &STANDARD_BUCKET_TABLE,
};

impl BucketScale {
    /// The buckets in ascending order.
    #[must_use]
    pub const fn buckets(&self) -> &'static [GradeBucket] {
        self.buckets
    }

    /// Find the bucket for a percentage by linear scan (first match wins).
    ///
    /// Out-of-range input falls back to the lowest bucket and logs a warning.
    #[must_use]
    pub fn bucket_for(&self, percentage: f64) -> &'static GradeBucket {
        if let Some(bucket) = self.buckets.iter().find(|b| b.contains(percentage)) {
            return bucket;
        }
        crate::warn!(
            "Percentage {percentage} is outside the bucket table; using the lowest bucket"
        );
        &self.buckets[0]
    }

    /// Find the bucket whose GPA value is nearest to `gpa` (lowest on ties).
    fn nearest_bucket(&self, gpa: f64) -> &'static GradeBucket {
        let mut best = &self.buckets[0];
        for bucket in self.buckets {
            if (bucket.gpa - gpa).abs() < (best.gpa - gpa).abs() {
                best = bucket;
            }
        }
        best
    }
}

impl ScaleConverter for BucketScale {
    fn percentage_to_gpa(&self, percentage: f64) -> f64 {
        self.bucket_for(percentage).gpa
    }

    fn gpa_to_percentage(&self, gpa: f64) -> f64 {
        if !gpa.is_finite() {
            crate::warn!("Non-finite GPA {gpa} converted as the lowest bucket");
            return self.buckets[0].midpoint();
        }
        self.nearest_bucket(gpa).midpoint()
    }

    fn min_gpa(&self) -> f64 {
        self.buckets[0].gpa
    }

    fn max_gpa(&self) -> f64 {
        self.buckets[self.buckets.len() - 1].gpa
    }

    fn letter_for(&self, percentage: f64) -> &'static str {
        self.bucket_for(clamp_percentage(percentage)).letter
    }
}

static LINEAR_4: LinearScale = LinearScale::new(1.0, 4.0, false);
static LINEAR_5: LinearScale = LinearScale::new(1.0, 5.0, false);
static INVERTED_4: LinearScale = LinearScale::new(1.0, 4.0, true);
static INVERTED_5: LinearScale = LinearScale::new(1.0, 5.0, true);

/// Identifier of the GPA scale a course is graded on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GpaScale {
    /// Linear 1.0–4.0
    #[default]
    Standard4,
    /// Linear 1.0–5.0
    Standard5,
    /// Linear 1.0–4.0 where 1.0 is best
    Inverted4,
    /// Linear 1.0–5.0 where 1.0 is best
    Inverted5,
    /// The 8-bucket table
    Bucket,
}

impl GpaScale {
    /// All known scales.
    pub const ALL: [Self; 5] = [
        Self::Standard4,
        Self::Standard5,
        Self::Inverted4,
        Self::Inverted5,
        Self::Bucket,
    ];

    /// The conversion strategy for this scale.
    #[must_use]
    pub fn converter(self) -> &'static dyn ScaleConverter {
        match self {
            Self::Standard4 => &LINEAR_4,
            Self::Standard5 => &LINEAR_5,
            Self::Inverted4 => &INVERTED_4,
            Self::Inverted5 => &INVERTED_5,
            Self::Bucket => &STANDARD_BUCKETS,
        }
    }

    /// Canonical identifier (e.g. `"inverted-4.0"`).
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Standard4 => "4.0",
            Self::Standard5 => "5.0",
            Self::Inverted4 => "inverted-4.0",
            Self::Inverted5 => "inverted-5.0",
            Self::Bucket => "bucket",
        }
    }
}

impl fmt::Display for GpaScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for GpaScale {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "4" | "4.0" | "standard-4.0" => Ok(Self::Standard4),
            "5" | "5.0" | "standard-5.0" => Ok(Self::Standard5),
            "inverted-4" | "inverted-4.0" => Ok(Self::Inverted4),
            "inverted-5" | "inverted-5.0" => Ok(Self::Inverted5),
            "bucket" | "discrete" | "letter" => Ok(Self::Bucket),
            _ => Err(CalcError::UnknownScale(s.to_string())),
        }
    }
}

impl Serialize for GpaScale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for GpaScale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawScale {
            Number(f64),
            Text(String),
        }

        let raw = match RawScale::deserialize(deserializer)? {
            RawScale::Number(n) => format!("{n:.1}"),
            RawScale::Text(s) => s,
        };
        raw.parse().map_err(serde::de::Error::custom)
    }
}
