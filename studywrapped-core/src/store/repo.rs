//! Store repository layer
//!
//! Read-only aggregation queries against the flashcard and video
//! collections, all scoped to one user and one calendar year.
//! Soft-deleted flashcard reviews are excluded from every query.

use chrono::{DateTime, FixedOffset, Utc};
use rusqlite::{params, Connection};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::Result;
use crate::types::{format_day, ActivityEvent, ActivityOutcome, FlashcardScore, ScoreDistribution};

/// Flashcard review totals with the 4-bucket score distribution.
#[derive(Debug, Clone, Default)]
pub struct FlashcardTotals {
    pub total: i64,
    pub distribution: ScoreDistribution,
}

/// One (user, local day) row of video activity.
#[derive(Debug, Clone)]
pub struct VideoDailyRow {
    /// Local calendar day, `YYYY-MM-DD`
    pub day: String,
    pub videos_watched: i64,
    pub videos_finished: i64,
    pub seconds_watched: i64,
}

/// Video totals for the year.
#[derive(Debug, Clone, Default)]
pub struct VideoTotals {
    pub watched: i64,
    pub finished: i64,
    pub seconds_watched: i64,
    /// Day with the most watched seconds, if any activity exists
    pub peak_day: Option<(String, i64)>,
}

/// SQLite-backed activity store.
///
/// Constructed once at process start and passed by reference into the
/// orchestrator; the connection is shared across requests.
pub struct StudyStore {
    conn: Mutex<Connection>,
}

impl StudyStore {
    /// Open (or create) a store at the given path.
    pub fn open(path: &PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this store
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    // Timestamps are stored as RFC3339 with a +00:00 offset; the bounds
    // use the same rendering so the range compare stays lexicographic.
    fn year_bounds(year: i32) -> (String, String) {
        (
            format!("{}-01-01T00:00:00+00:00", year),
            format!("{}-01-01T00:00:00+00:00", year + 1),
        )
    }

    fn day_bounds(year: i32) -> (String, String) {
        (format!("{}-01-01", year), format!("{}-12-31", year))
    }

    // ============================================
    // Flashcards
    // ============================================

    /// Flashcard totals + score distribution for the year.
    ///
    /// Bucketing goes through [`FlashcardScore::from_raw`] so an
    /// out-of-range stored score counts in the forgot bucket instead of
    /// disappearing from the distribution.
    pub fn flashcard_totals(&self, user_id: i64, year: i32) -> Result<FlashcardTotals> {
        let conn = self.conn.lock().unwrap();
        let (start, end) = Self::year_bounds(year);

        let mut stmt = conn.prepare(
            "SELECT score FROM flashcard_reviews
             WHERE user_id = ?1
               AND is_deleted = 0
               AND reviewed_at >= ?2 AND reviewed_at < ?3",
        )?;

        let mut totals = FlashcardTotals::default();
        let scores = stmt.query_map(params![user_id, start, end], |row| row.get::<_, i64>(0))?;
        for score in scores {
            totals.total += 1;
            totals.distribution.add(FlashcardScore::from_raw(score?));
        }
        Ok(totals)
    }

    /// Sorted flashcard review timestamps for the year (estimator input).
    pub fn flashcard_review_times(&self, user_id: i64, year: i32) -> Result<Vec<DateTime<Utc>>> {
        self.event_times(
            "SELECT reviewed_at FROM flashcard_reviews
             WHERE user_id = ?1 AND is_deleted = 0
               AND reviewed_at >= ?2 AND reviewed_at < ?3
             ORDER BY reviewed_at",
            user_id,
            year,
        )
    }

    // ============================================
    // Questions (optional event source)
    // ============================================

    /// Sorted question-answer timestamps for the year, when the
    /// collection is populated. An empty result switches the
    /// orchestrator to the flat per-question time estimate.
    pub fn question_event_times(&self, user_id: i64, year: i32) -> Result<Vec<DateTime<Utc>>> {
        self.event_times(
            "SELECT answered_at FROM question_events
             WHERE user_id = ?1
               AND answered_at >= ?2 AND answered_at < ?3
             ORDER BY answered_at",
            user_id,
            year,
        )
    }

    fn event_times(&self, sql: &str, user_id: i64, year: i32) -> Result<Vec<DateTime<Utc>>> {
        let conn = self.conn.lock().unwrap();
        let (start, end) = Self::year_bounds(year);

        let mut stmt = conn.prepare(sql)?;
        let times = stmt
            .query_map(params![user_id, start, end], |row| {
                row.get::<_, String>(0)
            })?
            .filter_map(|r| r.ok())
            .filter_map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .ok()
                    .map(|t| t.with_timezone(&Utc))
            })
            .collect();
        Ok(times)
    }

    // ============================================
    // Videos
    // ============================================

    /// Per-day video rows for the year, ordered by day.
    pub fn video_daily_rows(&self, user_id: i64, year: i32) -> Result<Vec<VideoDailyRow>> {
        let conn = self.conn.lock().unwrap();
        let (start, end) = Self::day_bounds(year);

        let mut stmt = conn.prepare(
            "SELECT day, videos_watched, videos_finished, seconds_watched
             FROM video_daily
             WHERE user_id = ?1 AND day >= ?2 AND day <= ?3
             ORDER BY day",
        )?;

        let rows = stmt
            .query_map(params![user_id, start, end], |row| {
                Ok(VideoDailyRow {
                    day: row.get(0)?,
                    videos_watched: row.get(1)?,
                    videos_finished: row.get(2)?,
                    seconds_watched: row.get(3)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rows)
    }

    /// Video totals + peak day for the year.
    pub fn video_totals(&self, user_id: i64, year: i32) -> Result<VideoTotals> {
        let conn = self.conn.lock().unwrap();
        let (start, end) = Self::day_bounds(year);

        let mut totals = conn.query_row(
            "SELECT
                COALESCE(SUM(videos_watched), 0),
                COALESCE(SUM(videos_finished), 0),
                COALESCE(SUM(seconds_watched), 0)
             FROM video_daily
             WHERE user_id = ?1 AND day >= ?2 AND day <= ?3",
            params![user_id, start, end],
            |row| {
                Ok(VideoTotals {
                    watched: row.get(0)?,
                    finished: row.get(1)?,
                    seconds_watched: row.get(2)?,
                    peak_day: None,
                })
            },
        )?;

        let peak = conn
            .query_row(
                "SELECT day, seconds_watched
                 FROM video_daily
                 WHERE user_id = ?1 AND day >= ?2 AND day <= ?3
                 ORDER BY seconds_watched DESC, day ASC
                 LIMIT 1",
                params![user_id, start, end],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
            )
            .ok();
        totals.peak_day = peak.filter(|(_, secs)| *secs > 0);

        Ok(totals)
    }

    /// Watched seconds per root specialty tag, descending.
    pub fn specialty_watch_seconds(&self, user_id: i64, year: i32) -> Result<Vec<(String, i64)>> {
        let conn = self.conn.lock().unwrap();
        let (start, end) = Self::day_bounds(year);

        let mut stmt = conn.prepare(
            "SELECT tag_name, SUM(seconds_watched) as total_seconds
             FROM video_tag_watch
             WHERE user_id = ?1 AND day >= ?2 AND day <= ?3
             GROUP BY tag_name
             ORDER BY total_seconds DESC",
        )?;

        let rows = stmt
            .query_map(params![user_id, start, end], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rows)
    }

    // ============================================
    // Writes (ingestion and test fixtures)
    // ============================================

    /// Record one activity event, dispatching on its outcome.
    ///
    /// Video events are folded into that local day's tracker row;
    /// `offset` fixes which calendar day the event lands on.
    pub fn record_event(&self, event: &ActivityEvent, offset: FixedOffset) -> Result<()> {
        tracing::debug!(kind = event.kind().as_str(), user_id = event.user_id, "recording event");
        match &event.outcome {
            ActivityOutcome::Question { was_right } => {
                self.insert_question_event(event.user_id, *was_right, event.timestamp)
            }
            ActivityOutcome::Flashcard { score } => {
                self.insert_flashcard_review(event.user_id, score.as_raw(), event.timestamp, false)
            }
            ActivityOutcome::Video {
                seconds_watched,
                finished,
            } => {
                let day = format_day(event.timestamp.with_timezone(&offset).date_naive());
                self.add_video_watch(event.user_id, &day, *seconds_watched, *finished)
            }
        }
    }

    /// Accumulate one watched video into a day's tracker row.
    pub fn add_video_watch(
        &self,
        user_id: i64,
        day: &str,
        seconds: i64,
        finished: bool,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO video_daily (user_id, day, videos_watched, videos_finished, seconds_watched)
             VALUES (?1, ?2, 1, ?3, ?4)
             ON CONFLICT(user_id, day) DO UPDATE SET
                videos_watched = videos_watched + 1,
                videos_finished = videos_finished + excluded.videos_finished,
                seconds_watched = seconds_watched + excluded.seconds_watched",
            params![user_id, day, finished as i64, seconds],
        )?;
        Ok(())
    }

    /// Record one flashcard review.
    pub fn insert_flashcard_review(
        &self,
        user_id: i64,
        score: i64,
        reviewed_at: DateTime<Utc>,
        is_deleted: bool,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO flashcard_reviews (user_id, score, is_deleted, reviewed_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![user_id, score, is_deleted as i64, reviewed_at.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Record one question-answer event.
    pub fn insert_question_event(
        &self,
        user_id: i64,
        was_right: bool,
        answered_at: DateTime<Utc>,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO question_events (user_id, was_right, answered_at)
             VALUES (?1, ?2, ?3)",
            params![user_id, was_right as i64, answered_at.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Upsert one day of video activity.
    pub fn upsert_video_day(
        &self,
        user_id: i64,
        day: &str,
        watched: i64,
        finished: i64,
        seconds: i64,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO video_daily (user_id, day, videos_watched, videos_finished, seconds_watched)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id, day) DO UPDATE SET
                videos_watched = excluded.videos_watched,
                videos_finished = excluded.videos_finished,
                seconds_watched = excluded.seconds_watched",
            params![user_id, day, watched, finished, seconds],
        )?;
        Ok(())
    }

    /// Record per-tag watched seconds for one day.
    pub fn insert_video_tag_watch(
        &self,
        user_id: i64,
        day: &str,
        tag_name: &str,
        seconds: i64,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO video_tag_watch (user_id, day, tag_name, seconds_watched)
             VALUES (?1, ?2, ?3, ?4)",
            params![user_id, day, tag_name, seconds],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn test_store() -> StudyStore {
        let store = StudyStore::open_in_memory().unwrap();
        store.migrate().unwrap();
        store
    }

    #[test]
    fn test_flashcard_totals_excludes_soft_deleted() {
        let store = test_store();
        store
            .insert_flashcard_review(7, 2, ts("2025-03-01T12:00:00Z"), false)
            .unwrap();
        store
            .insert_flashcard_review(7, 3, ts("2025-03-01T12:01:00Z"), false)
            .unwrap();
        store
            .insert_flashcard_review(7, 0, ts("2025-03-01T12:02:00Z"), true)
            .unwrap();

        let totals = store.flashcard_totals(7, 2025).unwrap();
        assert_eq!(totals.total, 2);
        assert_eq!(totals.distribution.good, 1);
        assert_eq!(totals.distribution.easy, 1);
        assert_eq!(totals.distribution.forgot, 0);
    }

    #[test]
    fn test_flashcard_totals_scoped_to_year_and_user() {
        let store = test_store();
        store
            .insert_flashcard_review(7, 1, ts("2024-12-31T23:59:59Z"), false)
            .unwrap();
        store
            .insert_flashcard_review(8, 1, ts("2025-06-01T10:00:00Z"), false)
            .unwrap();
        store
            .insert_flashcard_review(7, 1, ts("2025-06-01T10:00:00Z"), false)
            .unwrap();

        let totals = store.flashcard_totals(7, 2025).unwrap();
        assert_eq!(totals.total, 1);
    }

    #[test]
    fn test_review_times_sorted_and_filtered() {
        let store = test_store();
        store
            .insert_flashcard_review(7, 2, ts("2025-05-02T09:00:00Z"), false)
            .unwrap();
        store
            .insert_flashcard_review(7, 2, ts("2025-05-01T09:00:00Z"), false)
            .unwrap();
        store
            .insert_flashcard_review(7, 2, ts("2025-05-03T09:00:00Z"), true)
            .unwrap();

        let times = store.flashcard_review_times(7, 2025).unwrap();
        assert_eq!(times.len(), 2);
        assert!(times[0] < times[1]);
        assert_eq!(times[0], Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_video_totals_and_peak_day() {
        let store = test_store();
        store.upsert_video_day(7, "2025-02-01", 3, 2, 1800).unwrap();
        store.upsert_video_day(7, "2025-02-02", 5, 4, 7200).unwrap();
        store.upsert_video_day(7, "2025-02-03", 1, 0, 600).unwrap();

        let totals = store.video_totals(7, 2025).unwrap();
        assert_eq!(totals.watched, 9);
        assert_eq!(totals.finished, 6);
        assert_eq!(totals.seconds_watched, 9600);
        assert_eq!(totals.peak_day, Some(("2025-02-02".to_string(), 7200)));
    }

    #[test]
    fn test_video_totals_empty() {
        let store = test_store();
        let totals = store.video_totals(7, 2025).unwrap();
        assert_eq!(totals.watched, 0);
        assert_eq!(totals.peak_day, None);
    }

    #[test]
    fn test_specialty_watch_seconds_ordering() {
        let store = test_store();
        store
            .insert_video_tag_watch(7, "2025-01-10", "Cardiology", 3600)
            .unwrap();
        store
            .insert_video_tag_watch(7, "2025-01-11", "Pediatrics", 7200)
            .unwrap();
        store
            .insert_video_tag_watch(7, "2025-01-12", "Cardiology", 1800)
            .unwrap();

        let rows = store.specialty_watch_seconds(7, 2025).unwrap();
        assert_eq!(rows[0], ("Pediatrics".to_string(), 7200));
        assert_eq!(rows[1], ("Cardiology".to_string(), 5400));
    }

    #[test]
    fn test_question_event_times_empty_when_unpopulated() {
        let store = test_store();
        assert!(store.question_event_times(7, 2025).unwrap().is_empty());
    }

    #[test]
    fn test_out_of_range_score_buckets_as_forgot() {
        let store = test_store();
        store
            .insert_flashcard_review(7, 99, ts("2025-04-01T10:00:00Z"), false)
            .unwrap();
        store
            .insert_flashcard_review(7, 2, ts("2025-04-01T10:01:00Z"), false)
            .unwrap();

        let totals = store.flashcard_totals(7, 2025).unwrap();
        assert_eq!(totals.total, 2);
        assert_eq!(totals.distribution.forgot, 1);
        assert_eq!(totals.distribution.good, 1);
        assert_eq!(totals.distribution.total(), 2);
    }

    #[test]
    fn test_record_event_dispatches_by_kind() {
        let store = test_store();
        let offset = chrono::FixedOffset::east_opt(-3 * 3600).unwrap();

        let events = [
            ActivityEvent {
                user_id: 7,
                timestamp: ts("2025-05-01T12:00:00Z"),
                outcome: ActivityOutcome::Question { was_right: true },
            },
            ActivityEvent {
                user_id: 7,
                timestamp: ts("2025-05-01T12:05:00Z"),
                outcome: ActivityOutcome::Flashcard {
                    score: FlashcardScore::Easy,
                },
            },
            ActivityEvent {
                user_id: 7,
                timestamp: ts("2025-05-01T12:10:00Z"),
                outcome: ActivityOutcome::Video {
                    seconds_watched: 900,
                    finished: true,
                },
            },
            ActivityEvent {
                user_id: 7,
                timestamp: ts("2025-05-01T13:10:00Z"),
                outcome: ActivityOutcome::Video {
                    seconds_watched: 300,
                    finished: false,
                },
            },
        ];
        for event in &events {
            store.record_event(event, offset).unwrap();
        }

        assert_eq!(store.question_event_times(7, 2025).unwrap().len(), 1);

        let flashcards = store.flashcard_totals(7, 2025).unwrap();
        assert_eq!(flashcards.total, 1);
        assert_eq!(flashcards.distribution.easy, 1);

        // Both videos land on the same local day and accumulate
        let videos = store.video_totals(7, 2025).unwrap();
        assert_eq!(videos.watched, 2);
        assert_eq!(videos.finished, 1);
        assert_eq!(videos.seconds_watched, 1200);
        assert_eq!(videos.peak_day, Some(("2025-05-01".to_string(), 1200)));
    }

    #[test]
    fn test_video_event_lands_on_local_day() {
        let store = test_store();
        let offset = chrono::FixedOffset::east_opt(-3 * 3600).unwrap();

        // 01:00 UTC on June 2 is still June 1 at UTC-3
        store
            .record_event(
                &ActivityEvent {
                    user_id: 7,
                    timestamp: ts("2025-06-02T01:00:00Z"),
                    outcome: ActivityOutcome::Video {
                        seconds_watched: 600,
                        finished: true,
                    },
                },
                offset,
            )
            .unwrap();

        let rows = store.video_daily_rows(7, 2025).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].day, "2025-06-01");
    }
}
