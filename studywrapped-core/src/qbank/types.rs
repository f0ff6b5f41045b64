//! Canonical (normalized) response types for the QBank reports API
//!
//! Raw wire shapes are handled in [`super::normalize`]; everything in
//! this module has fixed field names and accuracy expressed as a
//! 0-100 float.

use serde::{Deserialize, Serialize};

/// One day of answered-question activity.
///
/// `count` and `total` are kept separate because different API
/// deployments populate one or the other for the same figure. Use
/// [`DailyAnswered::answered`] everywhere a single number is needed;
/// the fallback chain (`count`, then `total`, then 0) is the agreed
/// pending-clarification behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyAnswered {
    /// Local calendar day, `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(default)]
    pub total: Option<i64>,
    #[serde(default)]
    pub correct: i64,
    #[serde(default)]
    pub wrong: i64,
}

impl DailyAnswered {
    /// Answered-question count with the `count ?? total ?? 0` fallback.
    pub fn answered(&self) -> i64 {
        self.count.or(self.total).unwrap_or(0)
    }
}

/// Per-tag answered-question totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagTotals {
    #[serde(default, alias = "tagId")]
    pub tag_id: i64,
    #[serde(default, alias = "tagName")]
    pub tag_name: String,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub correct: i64,
    #[serde(default)]
    pub wrong: i64,
}

/// Canonical aggregate answered-question summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnsweredSummary {
    pub total: i64,
    pub correct: i64,
    pub wrong: i64,
    /// Accuracy as a 0-100 float
    pub accuracy: f64,
    /// Per-tag breakdown when the deployment provides one
    pub by_tag: Vec<TagTotals>,
}

impl AnsweredSummary {
    /// Accuracy with a derivation fallback: when the API reported no
    /// usable accuracy figure, derive it from the counts.
    pub fn accuracy_rate(&self) -> f64 {
        if self.accuracy > 0.0 {
            self.accuracy
        } else if self.total > 0 {
            (self.correct as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// One point of the flat accuracy-evolution series.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvolutionPoint {
    pub date: String,
    #[serde(default, alias = "accuracyRate")]
    pub accuracy_rate: f64,
    #[serde(default, alias = "totalAnswered")]
    pub total_answered: i64,
    #[serde(default, alias = "totalCorrect")]
    pub total_correct: i64,
}

/// Monthly percentage-correct series for one category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategorySeries {
    pub name: String,
    /// One percentage (0-100) per month of the year; 0 means no
    /// activity in that month
    pub monthly_pct: Vec<f64>,
}

/// Canonical accuracy-evolution report.
///
/// `points` is the flat series; `categories` is populated only by
/// deployments that break the series down per category as parallel
/// percentage arrays.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccuracyEvolution {
    pub points: Vec<EvolutionPoint>,
    pub categories: Vec<CategorySeries>,
}
