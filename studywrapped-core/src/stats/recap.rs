//! Year-in-review orchestration
//!
//! Composes the report API, the activity store, and the pure stat
//! calculators into one [`ConsolidatedStatistics`] per request.
//!
//! Failure policy: the report API is the primary source, and its
//! failures propagate. The store is secondary; when a store query fails
//! (or no store was opened at all) its contribution is substituted with
//! zeros, a warning is logged, and the result carries `degraded: true`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::config::StatsConfig;
use crate::error::Result;
use crate::qbank::types::DailyAnswered;
use crate::qbank::QuestionReports;
use crate::store::{StudyStore, VideoDailyRow, VideoTotals};
use crate::types::{
    round2, ConsolidatedStatistics, DailyActivityRecord, FlashcardStats, PersonalityResult,
    QuestionStats, ScoreDistribution, StudyTimeStats, VideoPeakDay, VideoStats,
};

use super::categories;
use super::estimate;
use super::funfact::{self, FactInputs, FactSelector};
use super::personality::StudyProfile;
use super::temporal::{self, DayActivity};
use super::zone;

/// Generate one student's year in review.
///
/// `store` is `None` when no activity store could be opened; that is
/// the degraded path, not a fatal condition.
pub async fn generate_recap(
    reports: &dyn QuestionReports,
    store: Option<&StudyStore>,
    cfg: &StatsConfig,
    user_id: i64,
    year: i32,
    selector: &mut dyn FactSelector,
) -> Result<ConsolidatedStatistics> {
    // Primary source. Any failure here fails the whole request.
    let (daily, summary, ever_wrong, evolution) = tokio::try_join!(
        reports.daily_answered(),
        reports.answered_summary(),
        reports.ever_wrong_count(),
        reports.accuracy_evolution(),
    )?;
    debug!(
        daily_rows = daily.len(),
        total = summary.total,
        "report API responses received"
    );

    // Secondary source. Failures degrade to zero defaults.
    let mut degraded = false;
    let (flashcards, flashcard_times, question_times, video_rows, video_totals, specialty_secs) =
        match store {
            Some(store) => (
                secondary(store.flashcard_totals(user_id, year), "flashcard totals", &mut degraded),
                secondary(
                    store.flashcard_review_times(user_id, year),
                    "flashcard times",
                    &mut degraded,
                ),
                secondary(
                    store.question_event_times(user_id, year),
                    "question times",
                    &mut degraded,
                ),
                secondary(store.video_daily_rows(user_id, year), "video rows", &mut degraded),
                secondary(store.video_totals(user_id, year), "video totals", &mut degraded),
                secondary(
                    store.specialty_watch_seconds(user_id, year),
                    "specialty watch",
                    &mut degraded,
                ),
            ),
            None => {
                warn!("no activity store available, flashcard and video stats will be zero");
                degraded = true;
                Default::default()
            }
        };

    // Question totals, with a derivation fallback from the daily rows
    // for deployments whose summary endpoint returns empty totals.
    let questions = question_stats(&summary_or_daily(&summary, &daily), ever_wrong);

    // Time estimation. Flashcards always use the gap-cap path; questions
    // fall back to the flat per-question estimate when no per-event
    // timestamps exist in the store.
    let offset = zone::fixed_offset(cfg.utc_offset_hours);
    let flashcard_daily = estimate::daily_estimates(&flashcard_times, cfg.flashcard_gap_cap_secs, offset);
    let question_daily = if question_times.is_empty() {
        Vec::new()
    } else {
        estimate::daily_estimates(&question_times, cfg.question_gap_cap_secs, offset)
    };
    let question_secs: i64 = if question_times.is_empty() {
        estimate::flat_estimate(questions.total, cfg.seconds_per_question)
    } else {
        question_daily.iter().map(|(_, s)| s).sum()
    };
    let flashcard_secs: i64 = flashcard_daily.iter().map(|(_, s)| s).sum();
    let total_secs = question_secs + flashcard_secs + video_totals.seconds_watched;

    // Per-day breakdown: union of the question, flashcard, and video
    // day series keyed by local date.
    let daily_breakdown = merge_daily(
        &daily,
        &flashcard_times,
        &flashcard_daily,
        &question_daily,
        &video_rows,
        offset,
    );

    // Temporal metrics over the merged breakdown. A day is active when
    // it carries any count or any estimated seconds; a seconds-only day
    // (store events with no daily report row) still counts.
    let day_activity: Vec<DayActivity> = daily_breakdown
        .iter()
        .filter_map(|day| {
            let date = day.date.parse().ok()?;
            let mut count = day.questions_answered + day.flashcards_answered + day.videos_watched;
            if count == 0 && day.is_active() {
                count = 1;
            }
            Some(DayActivity::new(date, count))
        })
        .collect();
    let best_streak = temporal::longest_streak(&day_activity);
    let total_days_studied = temporal::active_days(&day_activity);
    let daily_record = temporal::daily_record(&day_activity);
    let best_month = temporal::best_month(&day_activity);

    let hours: Vec<u8> = flashcard_times
        .iter()
        .chain(question_times.iter())
        .map(|&ts| zone::local_hour(ts, offset))
        .collect();
    let peak_study_hour = temporal::peak_hour(&hours, cfg.default_peak_hour);

    let top_specialties = rank_categories(cfg, &summary, &specialty_secs, &evolution.categories, questions.total);

    let profile = StudyProfile {
        questions_total: questions.total,
        flashcards_total: flashcards.total,
        videos_total: video_totals.watched,
        accuracy_rate: questions.accuracy_rate,
        streak: best_streak,
        peak_hour: peak_study_hour,
    };
    let personality = profile.classify().to_result();

    let video_hours = round2(video_totals.seconds_watched as f64 / 3600.0);
    let fun_fact = funfact::generate_fun_fact(
        &FactInputs {
            peak_hour: peak_study_hour,
            streak: best_streak,
            questions_total: questions.total,
            accuracy_rate: questions.accuracy_rate,
            active_days: total_days_studied,
            video_hours,
        },
        selector,
    );

    Ok(ConsolidatedStatistics {
        user_id,
        year,
        questions,
        flashcards: FlashcardStats {
            total: flashcards.total,
            score_distribution: flashcards.distribution,
        },
        videos: video_stats(&video_totals),
        study_time: StudyTimeStats::from_totals(total_secs, total_days_studied),
        daily_breakdown,
        top_specialties,
        best_streak,
        total_days_studied,
        daily_record,
        best_month,
        peak_study_hour,
        personality,
        fun_fact,
        degraded,
    })
}

/// Unwrap a secondary-source query, substituting the zero default and
/// flagging degradation on failure.
fn secondary<T: Default>(res: Result<T>, source: &str, degraded: &mut bool) -> T {
    match res {
        Ok(v) => v,
        Err(err) => {
            warn!(source, error = %err, "secondary source query failed, substituting zeros");
            *degraded = true;
            T::default()
        }
    }
}

/// Summary totals, re-derived from the daily rows when the summary
/// endpoint came back empty but the daily one did not.
fn summary_or_daily(
    summary: &crate::qbank::types::AnsweredSummary,
    daily: &[DailyAnswered],
) -> crate::qbank::types::AnsweredSummary {
    if summary.total > 0 || daily.is_empty() {
        return summary.clone();
    }
    let total: i64 = daily.iter().map(|d| d.answered()).sum();
    let correct: i64 = daily.iter().map(|d| d.correct).sum();
    crate::qbank::types::AnsweredSummary {
        total,
        correct,
        wrong: total - correct,
        accuracy: 0.0,
        by_tag: summary.by_tag.clone(),
    }
}

fn question_stats(summary: &crate::qbank::types::AnsweredSummary, ever_wrong: i64) -> QuestionStats {
    QuestionStats {
        total: summary.total,
        correct: summary.correct,
        wrong: summary.wrong,
        accuracy_rate: round2(summary.accuracy_rate()),
        ever_wrong,
    }
}

fn video_stats(totals: &VideoTotals) -> VideoStats {
    VideoStats {
        watched: totals.watched,
        finished: totals.finished,
        total_seconds_watched: totals.seconds_watched,
        total_hours_watched: round2(totals.seconds_watched as f64 / 3600.0),
        peak_day: totals.peak_day.as_ref().map(|(date, secs)| VideoPeakDay {
            date: date.clone(),
            hours: round2(*secs as f64 / 3600.0),
        }),
    }
}

/// Category ranking source preference: direct tag totals, then
/// specialty watch time, then the evolution estimate, then placeholders.
fn rank_categories(
    cfg: &StatsConfig,
    summary: &crate::qbank::types::AnsweredSummary,
    specialty_secs: &[(String, i64)],
    series: &[crate::qbank::types::CategorySeries],
    total_questions: i64,
) -> Vec<crate::types::CategoryRanking> {
    if !summary.by_tag.is_empty() {
        return categories::rank_tag_totals(&summary.by_tag, cfg.top_categories);
    }
    if !specialty_secs.is_empty() {
        return categories::rank_watch_seconds(specialty_secs, cfg.top_categories);
    }
    let estimated = categories::rank_from_evolution(series, total_questions, cfg.top_categories);
    if !estimated.is_empty() {
        return estimated;
    }
    categories::placeholder_rankings()
}

/// Union the per-day question, flashcard, and video series into one
/// sorted breakdown, with per-day usage seconds summed across types.
fn merge_daily(
    daily_answered: &[DailyAnswered],
    flashcard_times: &[DateTime<Utc>],
    flashcard_secs: &[(chrono::NaiveDate, i64)],
    question_secs: &[(chrono::NaiveDate, i64)],
    video_rows: &[VideoDailyRow],
    offset: chrono::FixedOffset,
) -> Vec<DailyActivityRecord> {
    let mut days: BTreeMap<String, DailyActivityRecord> = BTreeMap::new();

    fn day_entry<'a>(
        days: &'a mut BTreeMap<String, DailyActivityRecord>,
        date: &str,
    ) -> &'a mut DailyActivityRecord {
        days.entry(date.to_string())
            .or_insert_with(|| DailyActivityRecord::new(date.to_string()))
    }

    for row in daily_answered {
        let day = day_entry(&mut days, &row.date);
        day.questions_answered = row.answered();
        day.questions_correct = row.correct;
    }

    for (date, count) in flashcard_day_counts(flashcard_times, offset) {
        day_entry(&mut days, &crate::types::format_day(date)).flashcards_answered = count;
    }

    for row in video_rows {
        let day = day_entry(&mut days, &row.day);
        day.videos_watched = row.videos_watched;
        day.videos_finished = row.videos_finished;
        day.video_seconds_watched = row.seconds_watched;
    }

    for (date, secs) in question_secs {
        day_entry(&mut days, &crate::types::format_day(*date)).question_seconds = *secs;
    }

    for (date, secs) in flashcard_secs {
        day_entry(&mut days, &crate::types::format_day(*date)).flashcard_seconds = *secs;
    }

    days.into_values()
        .map(|mut day| {
            day.seconds_active =
                day.question_seconds + day.flashcard_seconds + day.video_seconds_watched;
            day
        })
        .collect()
}

/// Flashcard review counts per local calendar day.
fn flashcard_day_counts(
    times: &[DateTime<Utc>],
    offset: chrono::FixedOffset,
) -> Vec<(chrono::NaiveDate, i64)> {
    estimate::group_by_local_day(times, offset)
        .into_iter()
        .map(|(day, day_times)| (day, day_times.len() as i64))
        .collect()
}

/// Fixed demo payload for exercising the presentation layer without
/// real data.
pub fn demo_statistics(year: i32) -> ConsolidatedStatistics {
    ConsolidatedStatistics {
        user_id: 1,
        year,
        questions: QuestionStats {
            total: 12_847,
            correct: 10_021,
            wrong: 2_826,
            accuracy_rate: 78.0,
            ever_wrong: 2_826,
        },
        flashcards: FlashcardStats {
            total: 4_523,
            score_distribution: ScoreDistribution {
                forgot: 452,
                hard: 1_130,
                good: 1_808,
                easy: 1_133,
            },
        },
        videos: VideoStats {
            watched: 342,
            finished: 298,
            total_seconds_watched: 184_320,
            total_hours_watched: 51.2,
            peak_day: None,
        },
        study_time: StudyTimeStats {
            total_seconds: 665_520,
            total_hours: 184.87,
            average_seconds_per_day: 2_318,
            average_hours_per_day: 0.64,
        },
        daily_breakdown: Vec::new(),
        top_specialties: ["Cardiology", "Internal Medicine", "Surgery", "Pediatrics", "Gynecology"]
            .iter()
            .zip([234i64, 189, 156, 134, 98])
            .enumerate()
            .map(|(i, (title, hours))| crate::types::CategoryRanking {
                rank: i + 1,
                title: (*title).to_string(),
                total: hours,
                correct: 0,
                value: format!("{} hours", hours),
                estimated: false,
            })
            .collect(),
        best_streak: 45,
        total_days_studied: 287,
        daily_record: None,
        best_month: None,
        peak_study_hour: 23,
        personality: PersonalityResult {
            archetype: "The Strategist".to_string(),
            description: "You plan every step carefully and execute with precision. \
                          Your dedication and consistency are admirable!"
                .to_string(),
        },
        fun_fact: "You studied more at 23h than at any other hour. Night owl! 🦉".to_string(),
        degraded: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_merge_daily_unions_sources() {
        let offset = zone::fixed_offset(0);
        let daily = vec![DailyAnswered {
            date: "2025-03-01".to_string(),
            count: Some(40),
            total: None,
            correct: 30,
            wrong: 10,
        }];
        let flash_times = vec![ts("2025-03-02T10:00:00Z"), ts("2025-03-02T10:00:30Z")];
        let flash_secs = vec![(
            chrono::NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
            30i64,
        )];
        let videos = vec![VideoDailyRow {
            day: "2025-03-01".to_string(),
            videos_watched: 2,
            videos_finished: 1,
            seconds_watched: 600,
        }];

        let merged = merge_daily(&daily, &flash_times, &flash_secs, &[], &videos, offset);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].date, "2025-03-01");
        assert_eq!(merged[0].questions_answered, 40);
        assert_eq!(merged[0].videos_watched, 2);
        assert_eq!(merged[0].seconds_active, 600);
        assert_eq!(merged[1].date, "2025-03-02");
        assert_eq!(merged[1].flashcards_answered, 2);
        assert_eq!(merged[1].seconds_active, 30);
    }

    #[test]
    fn test_flashcard_day_counts_use_local_day() {
        // 01:00 UTC is still the previous local day at UTC-3
        let offset = zone::fixed_offset(-3);
        let times = vec![
            Utc.with_ymd_and_hms(2025, 6, 2, 1, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap(),
        ];
        let counts = flashcard_day_counts(&times, offset);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].1, 1);
        assert_eq!(counts[1].1, 1);
    }

    #[test]
    fn test_summary_fallback_derives_from_daily() {
        let summary = crate::qbank::types::AnsweredSummary::default();
        let daily = vec![
            DailyAnswered {
                date: "2025-01-01".to_string(),
                count: Some(10),
                correct: 7,
                ..Default::default()
            },
            DailyAnswered {
                date: "2025-01-02".to_string(),
                count: None,
                total: Some(20),
                correct: 15,
                ..Default::default()
            },
        ];
        let derived = summary_or_daily(&summary, &daily);
        assert_eq!(derived.total, 30);
        assert_eq!(derived.correct, 22);
        assert_eq!(derived.wrong, 8);
    }

    #[test]
    fn test_demo_statistics_shape() {
        let demo = demo_statistics(2025);
        assert_eq!(demo.year, 2025);
        assert_eq!(demo.questions.total, 12_847);
        assert_eq!(demo.top_specialties.len(), 5);
        assert_eq!(demo.top_specialties[0].title, "Cardiology");
        assert_eq!(demo.personality.archetype, "The Strategist");
        assert!(!demo.degraded);
    }
}
