//! Activity store layer for studywrapped
//!
//! SQLite-backed read store for the two document collections the recap
//! consumes (flashcard reviews and video daily trackers) plus an
//! optional question-event collection used only for study-time
//! estimation. The store is a long-lived, explicitly passed resource
//! handle - never ambient global state - and an unreachable store is a
//! degradation, not a failure (the orchestrator substitutes zeros).

pub mod repo;
pub mod schema;

pub use repo::{FlashcardTotals, StudyStore, VideoDailyRow, VideoTotals};
