//! # studywrapped-core
//!
//! Core library for studywrapped - a year-in-review statistics engine
//! for an exam-prep study platform.
//!
//! This library provides:
//! - Domain types for activity events and the consolidated yearly stats
//! - A QBank reports API client with response-shape normalization
//! - An SQLite activity store for flashcard and video history
//! - The statistics engine: temporal metrics, study-time estimation,
//!   specialty ranking, personality classification, fun facts
//! - Configuration management and logging infrastructure
//!
//! ## Data flow
//!
//! The [`stats::recap`] orchestrator joins the remote reports API
//! (primary source; failures propagate) with the local activity store
//! (secondary source; failures degrade to zeros) and runs the pure
//! calculators over the merged data to produce one
//! [`ConsolidatedStatistics`] per request. Nothing is persisted and no
//! state crosses requests.
//!
//! ## Example
//!
//! ```rust,no_run
//! use studywrapped_core::{Config, StudyStore};
//!
//! // Load configuration
//! let config = Config::load().expect("failed to load config");
//!
//! // Open the activity store
//! let store = StudyStore::open(&Config::store_path()).expect("failed to open store");
//! store.migrate().expect("failed to run migrations");
//! ```

// Re-export commonly used items at the crate root
pub use auth::decode_token;
pub use config::Config;
pub use error::{Error, Result};
pub use store::StudyStore;
pub use types::*;

// Public modules
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod qbank;
pub mod stats;
pub mod store;
pub mod types;
