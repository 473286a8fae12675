//! Assessment model

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Term tag used to split contribution within a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SemesterTerm {
    /// First half of the semester
    Midterm,
    /// Second half of the semester
    FinalTerm,
}

/// A single graded (or not yet graded) piece of work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Assessment identifier
    pub id: String,

    /// Display name (e.g., "Quiz 3")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Category this assessment belongs to
    #[serde(default)]
    pub category_id: String,

    /// Maximum attainable score (expected > 0)
    pub max_score: f64,

    /// Recorded score; `None` means not yet graded
    #[serde(
        default,
        deserialize_with = "deserialize_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub score: Option<f64>,

    /// Whether extra-credit points apply
    #[serde(default)]
    pub is_extra_credit: bool,

    /// Bonus points added to the score before computing a percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_credit_points: Option<f64>,

    /// Date the assessment was taken (free-form, e.g. "2025-10-02")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Midterm / final-term tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester_term: Option<SemesterTerm>,
}

impl Assessment {
    /// Create an ungraded assessment
    ///
    /// # Arguments
    /// * `id` - Assessment identifier
    /// * `category_id` - Owning category identifier
    /// * `max_score` - Maximum attainable score
    #[must_use]
    pub const fn new(id: String, category_id: String, max_score: f64) -> Self {
        Self {
            id,
            name: None,
            category_id,
            max_score,
            score: None,
            is_extra_credit: false,
            extra_credit_points: None,
            date: None,
            semester_term: None,
        }
    }

    /// Builder-style score setter
    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Builder-style extra-credit setter
    #[must_use]
    pub fn with_extra_credit(mut self, points: f64) -> Self {
        self.is_extra_credit = true;
        self.extra_credit_points = Some(points);
        self
    }

    /// Builder-style term setter
    #[must_use]
    pub fn with_term(mut self, term: SemesterTerm) -> Self {
        self.semester_term = Some(term);
        self
    }

    /// Whether a score has been recorded at all (a 0 counts)
    #[must_use]
    pub const fn has_score(&self) -> bool {
        self.score.is_some()
    }

    /// Whether the assessment counts as completed for progress tracking.
    ///
    /// A score of exactly 0 is treated as ungraded here, unlike in the
    /// category average where it is a real 0%.
    #[must_use]
    pub fn is_scored(&self) -> bool {
        self.score.is_some_and(|s| s != 0.0)
    }

    /// Extra-credit points that apply to this assessment
    #[must_use]
    pub fn bonus_points(&self) -> f64 {
        if self.is_extra_credit {
            self.extra_credit_points.unwrap_or(0.0)
        } else {
            0.0
        }
    }
}

/// Scores arrive either as numbers or as strings from form input.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawScore {
    Number(f64),
    Text(String),
}

fn deserialize_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawScore>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawScore::Number(n)) => Ok(Some(n)),
        Some(RawScore::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid score '{text}'")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assessment_creation() {
        let a = Assessment::new("q1".to_string(), "quizzes".to_string(), 20.0);
        assert_eq!(a.id, "q1");
        assert_eq!(a.category_id, "quizzes");
        assert!(!a.has_score());
        assert!(!a.is_scored());
        assert!(a.bonus_points().abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_score_is_not_scored() {
        let a = Assessment::new("q1".to_string(), "quizzes".to_string(), 20.0).with_score(0.0);
        assert!(a.has_score());
        assert!(!a.is_scored());
    }

    #[test]
    fn test_bonus_requires_flag() {
        let mut a = Assessment::new("hw".to_string(), "hw".to_string(), 100.0).with_score(90.0);
        a.extra_credit_points = Some(10.0);
        assert!(a.bonus_points().abs() < f64::EPSILON);

        let a = a.with_extra_credit(10.0);
        assert!((a.bonus_points() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_deserialize_string_and_empty_scores() {
        let parsed: Assessment = toml::from_str(
            r#"
id = "a"
max_score = 50
score = "42.5"
semester_term = "FINAL_TERM"
"#,
        )
        .expect("parse assessment");
        assert_eq!(parsed.score, Some(42.5));
        assert_eq!(parsed.semester_term, Some(SemesterTerm::FinalTerm));

        let empty: Assessment = toml::from_str(
            r#"
id = "b"
max_score = 50
score = ""
"#,
        )
        .expect("parse assessment");
        assert_eq!(empty.score, None);

        let missing: Assessment = toml::from_str("id = \"c\"\nmax_score = 10\n").expect("parse");
        assert_eq!(missing.score, None);
    }

    #[test]
    fn test_deserialize_rejects_garbage_score() {
        let result: Result<Assessment, _> =
            toml::from_str("id = \"a\"\nmax_score = 10\nscore = \"ten\"\n");
        assert!(result.is_err());
    }
}
