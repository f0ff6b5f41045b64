//! Fun-fact generation
//!
//! Candidate facts are derived deterministically from threshold checks
//! so they can be tested; only the pick among candidates is randomized,
//! behind the [`FactSelector`] seam.

use rand::Rng;

/// Inputs for fun-fact candidate generation.
#[derive(Debug, Clone, Default)]
pub struct FactInputs {
    /// Most active local hour of day, 0-23
    pub peak_hour: u8,
    /// Longest consecutive-day streak
    pub streak: i64,
    /// Questions answered across the year
    pub questions_total: i64,
    /// Overall answer accuracy, 0-100
    pub accuracy_rate: f64,
    /// Days with any activity
    pub active_days: i64,
    /// Hours of video watched
    pub video_hours: f64,
}

/// Build the ordered candidate list. Deterministic for given inputs.
pub fn fact_candidates(inputs: &FactInputs) -> Vec<String> {
    let mut facts = Vec::new();

    if inputs.peak_hour >= 22 || inputs.peak_hour <= 5 {
        facts.push(format!(
            "You studied more at {}h than at any other hour. Night owl! 🦉",
            inputs.peak_hour
        ));
    } else if inputs.peak_hour <= 8 {
        facts.push(format!(
            "You are most productive at {}h in the morning. The early bird passes the exam! ☀️",
            inputs.peak_hour
        ));
    }

    if inputs.streak >= 30 {
        facts.push(format!(
            "Your longest streak was {} days in a row. Hard-mode consistency! 🔥",
            inputs.streak
        ));
    }

    if inputs.questions_total >= 10_000 {
        facts.push(format!(
            "You solved {} questions. That would fill a {}-page book! 📚",
            inputs.questions_total,
            inputs.questions_total / 10
        ));
    }

    if inputs.accuracy_rate >= 85.0 {
        facts.push(format!(
            "You kept a {:.0}% accuracy rate across the whole year. Sharp! 🎯",
            inputs.accuracy_rate
        ));
    }

    if inputs.active_days >= 300 {
        facts.push(format!(
            "You studied on {} different days this year. Almost every single one! 📅",
            inputs.active_days
        ));
    }

    if inputs.video_hours >= 100.0 {
        facts.push(format!(
            "You watched {} hours of lessons. That's more than a whole season of a series! 🎬",
            inputs.video_hours.round() as i64
        ));
    }

    facts
}

/// Shown when no threshold produced a candidate.
pub const ENCOURAGEMENT: &str = "You're on the right track. Keep it up! 💪";

/// Policy for picking one fact out of the candidates.
pub trait FactSelector {
    /// Pick an index into a non-empty candidate list.
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform random pick, the production default.
#[derive(Debug, Default)]
pub struct RandomSelector;

impl FactSelector for RandomSelector {
    fn pick(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Always picks the first candidate. For tests and reproducible output.
#[derive(Debug, Default)]
pub struct FirstSelector;

impl FactSelector for FirstSelector {
    fn pick(&mut self, _len: usize) -> usize {
        0
    }
}

/// Generate the final fun fact for the year.
pub fn generate_fun_fact(inputs: &FactInputs, selector: &mut dyn FactSelector) -> String {
    let mut candidates = fact_candidates(inputs);
    if candidates.is_empty() {
        return ENCOURAGEMENT.to_string();
    }
    let idx = selector.pick(candidates.len());
    candidates.swap_remove(idx)
}
