//! Core domain types for studywrapped
//!
//! These types represent the canonical data model for one student's
//! year of study activity on the exam-prep platform.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **ActivityEvent** | One timestamped user action (question, flashcard, video session) |
//! | **Active day** | A calendar day with at least one recorded activity of any kind |
//! | **Streak** | Longest run of consecutive active days |
//! | **Specialty** | A subject-matter tag (e.g. a medical specialty) used for ranking |
//! | **Archetype** | One discrete study-personality label, assigned by rule cascade |
//!
//! Everything here is transient and request-scoped: a
//! [`ConsolidatedStatistics`] is a pure function of the year's input
//! events, built fresh per request and never mutated afterwards.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// Activity events
// ============================================

/// Kind of tracked study activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Question,
    Flashcard,
    Video,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Question => "question",
            ActivityKind::Flashcard => "flashcard",
            ActivityKind::Video => "video",
        }
    }
}

/// Flashcard self-assessment score (0-3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashcardScore {
    Forgot,
    Hard,
    Good,
    Easy,
}

impl FlashcardScore {
    /// Map the stored integer score to a bucket. Out-of-range values
    /// are treated as [`FlashcardScore::Forgot`].
    pub fn from_raw(score: i64) -> Self {
        match score {
            1 => FlashcardScore::Hard,
            2 => FlashcardScore::Good,
            3 => FlashcardScore::Easy,
            _ => FlashcardScore::Forgot,
        }
    }

    /// The integer form stored in the flashcard collection.
    pub fn as_raw(&self) -> i64 {
        match self {
            FlashcardScore::Forgot => 0,
            FlashcardScore::Hard => 1,
            FlashcardScore::Good => 2,
            FlashcardScore::Easy => 3,
        }
    }
}

/// Outcome payload of a single activity event, per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityOutcome {
    Question { was_right: bool },
    Flashcard { score: FlashcardScore },
    Video { seconds_watched: i64, finished: bool },
}

/// A single timestamped user action.
///
/// Owned by the upstream logging system; read-only to this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// Stable numeric user identifier
    pub user_id: i64,
    /// Instant the action was recorded; source of all temporal derivations
    pub timestamp: DateTime<Utc>,
    /// Outcome (also determines the activity kind)
    pub outcome: ActivityOutcome,
}

impl ActivityEvent {
    pub fn kind(&self) -> ActivityKind {
        match self.outcome {
            ActivityOutcome::Question { .. } => ActivityKind::Question,
            ActivityOutcome::Flashcard { .. } => ActivityKind::Flashcard,
            ActivityOutcome::Video { .. } => ActivityKind::Video,
        }
    }
}

// ============================================
// Per-day records
// ============================================

/// One row per (user, local calendar date), produced by grouping events
/// by date in the configured time zone.
///
/// Dates are unique per user within a query window. The set of dates
/// with any count > 0 or `seconds_active > 0` defines "active days" -
/// the canonical definition used everywhere streaks and day counts are
/// computed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyActivityRecord {
    /// Local calendar day
    pub date: String,
    pub questions_answered: i64,
    pub questions_correct: i64,
    pub flashcards_answered: i64,
    pub videos_watched: i64,
    pub videos_finished: i64,
    pub video_seconds_watched: i64,
    pub question_seconds: i64,
    pub flashcard_seconds: i64,
    /// Estimated total active seconds for the day
    pub seconds_active: i64,
}

impl DailyActivityRecord {
    pub fn new(date: String) -> Self {
        Self {
            date,
            ..Default::default()
        }
    }

    /// Whether this day counts as an active study day.
    pub fn is_active(&self) -> bool {
        self.seconds_active > 0
            || self.questions_answered > 0
            || self.flashcards_answered > 0
            || self.videos_watched > 0
    }
}

// ============================================
// Consolidated output
// ============================================

/// Question-answering totals for the year.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionStats {
    pub total: i64,
    pub correct: i64,
    pub wrong: i64,
    /// Accuracy as a 0-100 float
    pub accuracy_rate: f64,
    /// Questions the student has ever answered wrong
    pub ever_wrong: i64,
}

/// Flashcard score distribution across the four buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    pub forgot: i64,
    pub hard: i64,
    pub good: i64,
    pub easy: i64,
}

impl ScoreDistribution {
    pub fn add(&mut self, score: FlashcardScore) {
        match score {
            FlashcardScore::Forgot => self.forgot += 1,
            FlashcardScore::Hard => self.hard += 1,
            FlashcardScore::Good => self.good += 1,
            FlashcardScore::Easy => self.easy += 1,
        }
    }

    pub fn total(&self) -> i64 {
        self.forgot + self.hard + self.good + self.easy
    }
}

/// Flashcard review totals for the year.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlashcardStats {
    pub total: i64,
    pub score_distribution: ScoreDistribution,
}

/// Video-watching totals for the year.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoStats {
    pub watched: i64,
    pub finished: i64,
    pub total_seconds_watched: i64,
    pub total_hours_watched: f64,
    /// Day with the most watched seconds, if any
    pub peak_day: Option<VideoPeakDay>,
}

/// The single day with the most video-watching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoPeakDay {
    pub date: String,
    pub hours: f64,
}

/// Aggregate study-time estimate for the year.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudyTimeStats {
    pub total_seconds: i64,
    pub total_hours: f64,
    /// Averages are over active days, not calendar days
    pub average_seconds_per_day: i64,
    pub average_hours_per_day: f64,
}

impl StudyTimeStats {
    pub fn from_totals(total_seconds: i64, active_days: i64) -> Self {
        let total_hours = round2(total_seconds as f64 / 3600.0);
        let (avg_secs, avg_hours) = if active_days > 0 {
            let avg = total_seconds as f64 / active_days as f64;
            (avg.round() as i64, round2(avg / 3600.0))
        } else {
            (0, 0.0)
        };
        Self {
            total_seconds,
            total_hours,
            average_seconds_per_day: avg_secs,
            average_hours_per_day: avg_hours,
        }
    }
}

/// One ranked subject-matter category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRanking {
    /// 1-based rank
    pub rank: usize,
    pub title: String,
    pub total: i64,
    pub correct: i64,
    /// Display string embedding the count (e.g. "1532 questions")
    pub value: String,
    /// True when counts were proportionally estimated rather than measured
    pub estimated: bool,
}

/// The most active single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: String,
    pub count: i64,
}

/// The calendar month with the highest summed activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestMonth {
    /// English month name (e.g. "March")
    pub name: String,
    pub count: i64,
}

/// Assigned study-personality archetype, display-ready.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalityResult {
    pub archetype: String,
    pub description: String,
}

/// The single output artifact: one student's year in review.
///
/// Created fresh per request, never mutated after construction, never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidatedStatistics {
    pub user_id: i64,
    pub year: i32,
    pub questions: QuestionStats,
    pub flashcards: FlashcardStats,
    pub videos: VideoStats,
    pub study_time: StudyTimeStats,
    pub daily_breakdown: Vec<DailyActivityRecord>,
    pub top_specialties: Vec<CategoryRanking>,
    pub best_streak: i64,
    pub total_days_studied: i64,
    pub daily_record: Option<DailyRecord>,
    pub best_month: Option<BestMonth>,
    /// Hour of day (0-23) with the most activity, in the configured zone
    pub peak_study_hour: u8,
    pub personality: PersonalityResult,
    pub fun_fact: String,
    /// True when a secondary data source was unreachable and its
    /// contribution was substituted with zeros
    pub degraded: bool,
}

// ============================================
// Identity
// ============================================

/// Structured identity record decoded from a bearer credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "profileId")]
    pub profile_id: Option<i64>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default, alias = "anonName")]
    pub anon_name: Option<String>,
}

// ============================================
// Helpers
// ============================================

/// Round to two decimal places for display-facing hour values.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Format a local calendar date as the canonical `YYYY-MM-DD` string.
pub fn format_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
