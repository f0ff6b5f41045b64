//! QBank reports API access
//!
//! The remote reporting API is the primary source of truth for
//! question-answering activity. Four read endpoints are consumed, all
//! scoped to a fixed calendar-year date range:
//!
//! - `/reports/questions/answered/daily` - per-day answered counts
//! - `/reports/questions/answered` - aggregate totals (optionally by tag)
//! - `/reports/questions/ever-answered-wrong` - ever-wrong totals
//! - `/reports/graph/right-answers-evolution` - accuracy time series
//!   (optionally broken down by category as parallel percentage arrays)
//!
//! The API's JSON schema has been observed to change field names and
//! envelope shapes between deployments; [`normalize`] reconciles every
//! observed variant into one canonical shape before anything downstream
//! sees it.

pub mod client;
pub mod normalize;
pub mod types;

pub use client::QBankClient;
pub use normalize::{
    normalize_accuracy, normalize_answered, normalize_daily, normalize_evolution,
    normalize_ever_wrong,
};
pub use types::{
    AccuracyEvolution, AnsweredSummary, CategorySeries, DailyAnswered, EvolutionPoint, TagTotals,
};

use crate::error::Result;
use async_trait::async_trait;

/// Seam between the orchestrator and the reports API transport.
///
/// The production implementation is [`QBankClient`]; tests substitute
/// stubs to exercise failure and degradation paths without a network.
#[async_trait]
pub trait QuestionReports: Send + Sync {
    /// Per-day answered-question counts for the year.
    async fn daily_answered(&self) -> Result<Vec<DailyAnswered>>;

    /// Aggregate answered-question totals, optionally broken down by tag.
    async fn answered_summary(&self) -> Result<AnsweredSummary>;

    /// Count of questions the student has ever answered wrong.
    async fn ever_wrong_count(&self) -> Result<i64>;

    /// Accuracy-evolution time series, optionally per category.
    async fn accuracy_evolution(&self) -> Result<AccuracyEvolution>;
}
