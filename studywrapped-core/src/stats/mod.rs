//! Statistics engine
//!
//! Derived-metric calculators over one student's year of activity:
//! - Temporal metrics (streaks, active days, daily record, best month,
//!   peak hour)
//! - Gap-capped study-time estimation from raw event timestamps
//! - Specialty ranking with a proportional-estimation fallback
//! - Personality classification and fun-fact generation
//! - The [`recap`] orchestrator, which composes everything into one
//!   [`crate::types::ConsolidatedStatistics`] per request
//!
//! Everything except [`recap`] is a pure function layer with no I/O;
//! date grouping consistently uses the configured fixed-offset zone
//! from [`zone`].

pub mod categories;
pub mod estimate;
pub mod funfact;
pub mod personality;
pub mod recap;
pub mod temporal;
pub mod zone;

pub use funfact::{FactInputs, FactSelector, FirstSelector, RandomSelector};
pub use personality::{StudyPersonality, StudyProfile};
pub use recap::{demo_statistics, generate_recap};
pub use temporal::DayActivity;
