//! Integration tests for the recap orchestrator
//!
//! These tests wire a stub reports API and an in-memory activity store
//! through the full `generate_recap` flow to verify source merging,
//! the failure policy, and the degraded path.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use studywrapped_core::config::StatsConfig;
use studywrapped_core::qbank::{
    AccuracyEvolution, AnsweredSummary, CategorySeries, DailyAnswered, QuestionReports, TagTotals,
};
use studywrapped_core::stats::{generate_recap, FirstSelector};
use studywrapped_core::{Error, Result, StudyStore};

const USER: i64 = 7;
const YEAR: i32 = 2025;

/// Stub reports API with canned responses per endpoint.
#[derive(Default)]
struct StubReports {
    daily: Vec<DailyAnswered>,
    summary: AnsweredSummary,
    ever_wrong: i64,
    evolution: AccuracyEvolution,
    fail_summary: bool,
}

#[async_trait]
impl QuestionReports for StubReports {
    async fn daily_answered(&self) -> Result<Vec<DailyAnswered>> {
        Ok(self.daily.clone())
    }

    async fn answered_summary(&self) -> Result<AnsweredSummary> {
        if self.fail_summary {
            return Err(Error::Auth("token rejected".to_string()));
        }
        Ok(self.summary.clone())
    }

    async fn ever_wrong_count(&self) -> Result<i64> {
        Ok(self.ever_wrong)
    }

    async fn accuracy_evolution(&self) -> Result<AccuracyEvolution> {
        Ok(self.evolution.clone())
    }
}

fn test_config() -> StatsConfig {
    StatsConfig {
        year: YEAR,
        utc_offset_hours: -3,
        flashcard_gap_cap_secs: 60,
        question_gap_cap_secs: 300,
        seconds_per_question: 60,
        top_categories: 5,
        default_peak_hour: 20,
    }
}

fn daily(date: &str, count: i64, correct: i64) -> DailyAnswered {
    DailyAnswered {
        date: date.to_string(),
        count: Some(count),
        total: None,
        correct,
        wrong: count - correct,
    }
}

fn seeded_store() -> StudyStore {
    let store = StudyStore::open_in_memory().unwrap();
    store.migrate().unwrap();

    // Three flashcard reviews a minute apart: two 60s gaps
    for (i, score) in [2i64, 3, 1].iter().enumerate() {
        let at = Utc
            .with_ymd_and_hms(2025, 3, 10, 14, i as u32, 0)
            .unwrap();
        store.insert_flashcard_review(USER, *score, at, false).unwrap();
    }
    store.upsert_video_day(USER, "2025-03-11", 4, 3, 7200).unwrap();
    store
        .insert_video_tag_watch(USER, "2025-03-11", "Cardiology", 7200)
        .unwrap();
    store
}

#[tokio::test]
async fn test_full_recap_happy_path() {
    let reports = StubReports {
        daily: vec![
            daily("2025-03-09", 30, 24),
            daily("2025-03-10", 50, 40),
            daily("2025-03-11", 20, 15),
        ],
        summary: AnsweredSummary {
            total: 100,
            correct: 79,
            wrong: 21,
            accuracy: 79.0,
            by_tag: vec![TagTotals {
                tag_id: 1,
                tag_name: "Cardiology".to_string(),
                total: 60,
                correct: 50,
                wrong: 10,
            }],
        },
        ever_wrong: 15,
        ..Default::default()
    };
    let store = seeded_store();

    let stats = generate_recap(
        &reports,
        Some(&store),
        &test_config(),
        USER,
        YEAR,
        &mut FirstSelector,
    )
    .await
    .unwrap();

    assert_eq!(stats.user_id, USER);
    assert_eq!(stats.year, YEAR);
    assert!(!stats.degraded);

    assert_eq!(stats.questions.total, 100);
    assert_eq!(stats.questions.accuracy_rate, 79.0);
    assert_eq!(stats.questions.ever_wrong, 15);

    assert_eq!(stats.flashcards.total, 3);
    assert_eq!(stats.flashcards.score_distribution.good, 1);
    assert_eq!(stats.flashcards.score_distribution.easy, 1);
    assert_eq!(stats.flashcards.score_distribution.hard, 1);

    assert_eq!(stats.videos.watched, 4);
    assert_eq!(stats.videos.total_seconds_watched, 7200);
    assert_eq!(stats.videos.peak_day.as_ref().unwrap().date, "2025-03-11");

    // Three consecutive question days, flashcards and videos overlap them
    assert_eq!(stats.best_streak, 3);
    assert_eq!(stats.total_days_studied, 3);
    assert_eq!(stats.daily_record.as_ref().unwrap().date, "2025-03-10");
    assert_eq!(stats.best_month.as_ref().unwrap().name, "March");

    // Categories come from the direct tag totals
    assert_eq!(stats.top_specialties[0].title, "Cardiology");
    assert!(!stats.top_specialties[0].estimated);

    // Study time: no question timestamps in the store, so the flat
    // per-question estimate applies: 100 * 60s, plus 2 * 60s of capped
    // flashcard gaps, plus 7200s of video
    assert_eq!(stats.study_time.total_seconds, 6000 + 120 + 7200);

    // 14:xx UTC is 11h local at UTC-3
    assert_eq!(stats.peak_study_hour, 11);
    assert!(!stats.fun_fact.is_empty());
}

#[tokio::test]
async fn test_primary_failure_propagates_as_auth() {
    let reports = StubReports {
        fail_summary: true,
        ..Default::default()
    };
    let store = seeded_store();

    let err = generate_recap(
        &reports,
        Some(&store),
        &test_config(),
        USER,
        YEAR,
        &mut FirstSelector,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Auth(_)));
    assert_eq!(err.status_code(), 401);
}

#[tokio::test]
async fn test_missing_store_degrades_with_zero_defaults() {
    let reports = StubReports {
        daily: vec![daily("2025-06-01", 40, 30)],
        summary: AnsweredSummary {
            total: 40,
            correct: 30,
            wrong: 10,
            accuracy: 75.0,
            by_tag: Vec::new(),
        },
        ..Default::default()
    };

    let stats = generate_recap(&reports, None, &test_config(), USER, YEAR, &mut FirstSelector)
        .await
        .unwrap();

    assert!(stats.degraded);
    assert_eq!(stats.questions.total, 40);
    assert_eq!(stats.flashcards.total, 0);
    assert_eq!(stats.videos.watched, 0);
    // Flat question estimate only
    assert_eq!(stats.study_time.total_seconds, 40 * 60);
    // No event timestamps at all, so the configured default applies
    assert_eq!(stats.peak_study_hour, 20);
    // No category source anywhere: placeholders, never an empty list
    assert!(!stats.top_specialties.is_empty());
    assert_eq!(stats.top_specialties[0].total, 0);
}

#[tokio::test]
async fn test_category_fallback_estimates_from_evolution() {
    let reports = StubReports {
        daily: vec![daily("2025-06-01", 1000, 700)],
        summary: AnsweredSummary {
            total: 1000,
            correct: 700,
            wrong: 300,
            accuracy: 70.0,
            by_tag: Vec::new(),
        },
        evolution: AccuracyEvolution {
            points: Vec::new(),
            categories: vec![
                CategorySeries {
                    name: "Surgery".to_string(),
                    monthly_pct: vec![30.0],
                },
                CategorySeries {
                    name: "Pediatrics".to_string(),
                    monthly_pct: vec![70.0],
                },
            ],
        },
        ..Default::default()
    };

    let stats = generate_recap(&reports, None, &test_config(), USER, YEAR, &mut FirstSelector)
        .await
        .unwrap();

    let totals: Vec<(String, i64)> = stats
        .top_specialties
        .iter()
        .map(|c| (c.title.clone(), c.total))
        .collect();
    assert!(totals.contains(&("Surgery".to_string(), 300)));
    assert!(totals.contains(&("Pediatrics".to_string(), 700)));
    assert!(stats.top_specialties.iter().all(|c| c.estimated));
}

#[tokio::test]
async fn test_seconds_only_day_counts_as_active() {
    // Question events exist in the store but the daily report endpoint
    // has no row for that day: the breakdown entry carries only
    // estimated seconds, and it must still count as a studied day.
    let reports = StubReports::default();
    let store = StudyStore::open_in_memory().unwrap();
    store.migrate().unwrap();
    for minute in [0u32, 2, 4] {
        let at = Utc.with_ymd_and_hms(2025, 7, 1, 12, minute, 0).unwrap();
        store.insert_question_event(USER, true, at).unwrap();
    }

    let stats = generate_recap(
        &reports,
        Some(&store),
        &test_config(),
        USER,
        YEAR,
        &mut FirstSelector,
    )
    .await
    .unwrap();

    assert_eq!(stats.daily_breakdown.len(), 1);
    assert_eq!(stats.daily_breakdown[0].questions_answered, 0);
    assert!(stats.daily_breakdown[0].seconds_active > 0);
    assert_eq!(stats.total_days_studied, 1);
    assert_eq!(stats.best_streak, 1);
    assert!(stats.daily_record.is_some());
}

#[tokio::test]
async fn test_summary_totals_derived_from_daily_when_empty() {
    let reports = StubReports {
        daily: vec![daily("2025-06-01", 10, 8), daily("2025-06-02", 10, 6)],
        ..Default::default()
    };

    let stats = generate_recap(&reports, None, &test_config(), USER, YEAR, &mut FirstSelector)
        .await
        .unwrap();

    assert_eq!(stats.questions.total, 20);
    assert_eq!(stats.questions.correct, 14);
    assert_eq!(stats.questions.accuracy_rate, 70.0);
    assert_eq!(stats.best_streak, 2);
}
