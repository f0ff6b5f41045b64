//! Store schema and migrations
//!
//! Uses SQLite with embedded migrations managed via PRAGMA user_version.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// SQL migrations, indexed by version number
const MIGRATIONS: &[&str] = &[
    // Version 1: Initial schema
    r#"
    -- One row per flashcard review interaction
    CREATE TABLE IF NOT EXISTS flashcard_reviews (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id      INTEGER NOT NULL,
        score        INTEGER NOT NULL,          -- 0-3: forgot, hard, good, easy
        is_deleted   INTEGER NOT NULL DEFAULT 0,
        reviewed_at  DATETIME NOT NULL          -- RFC3339, UTC
    );

    CREATE INDEX IF NOT EXISTS idx_flashcard_reviews_user
        ON flashcard_reviews(user_id, reviewed_at);
    CREATE INDEX IF NOT EXISTS idx_flashcard_reviews_user_deleted
        ON flashcard_reviews(user_id, is_deleted, reviewed_at);

    -- One row per (user, local day) of video watching
    CREATE TABLE IF NOT EXISTS video_daily (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id          INTEGER NOT NULL,
        day              TEXT NOT NULL,         -- local calendar day, YYYY-MM-DD
        videos_watched   INTEGER NOT NULL DEFAULT 0,
        videos_finished  INTEGER NOT NULL DEFAULT 0,
        seconds_watched  INTEGER NOT NULL DEFAULT 0,
        UNIQUE(user_id, day)
    );

    CREATE INDEX IF NOT EXISTS idx_video_daily_user ON video_daily(user_id, day);

    -- Per-tag watched seconds, flattened from the daily tracker entries
    CREATE TABLE IF NOT EXISTS video_tag_watch (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id          INTEGER NOT NULL,
        day              TEXT NOT NULL,
        tag_name         TEXT NOT NULL,         -- root specialty tag
        seconds_watched  INTEGER NOT NULL DEFAULT 0
    );

    CREATE INDEX IF NOT EXISTS idx_video_tag_watch_user ON video_tag_watch(user_id, day);

    -- Optional per-event question timestamps, used only for study-time
    -- estimation when present
    CREATE TABLE IF NOT EXISTS question_events (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id      INTEGER NOT NULL,
        was_right    INTEGER NOT NULL DEFAULT 0,
        answered_at  DATETIME NOT NULL          -- RFC3339, UTC
    );

    CREATE INDEX IF NOT EXISTS idx_question_events_user
        ON question_events(user_id, answered_at);
    "#,
];

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> crate::error::Result<()> {
    let current_version: i32 = conn
        .query_row("PRAGMA user_version", [], |r| r.get(0))
        .unwrap_or(0);

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let version = (i + 1) as i32;
        if version > current_version {
            tracing::info!(version, "Running store migration");
            conn.execute_batch(migration)?;
            conn.execute(&format!("PRAGMA user_version = {}", version), [])?;
        }
    }

    if current_version < SCHEMA_VERSION {
        tracing::info!(
            from = current_version,
            to = SCHEMA_VERSION,
            "Store migrations complete"
        );
    }

    Ok(())
}
