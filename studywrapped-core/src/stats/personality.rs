//! Study personality classification
//!
//! Assigns a study archetype from the year's aggregate figures. The
//! rules form an ordered cascade: the first matching rule wins, and the
//! final catch-all means every profile classifies to something.

use crate::types::PersonalityResult;

/// Study personality archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyPersonality {
    /// Long streak with high accuracy - plans and executes
    Strategist,
    /// High question volume with solid accuracy
    Marathoner,
    /// Peak activity late at night (10pm-5am)
    NightOwl,
    /// Peak activity early morning (5am-8am)
    EarlyBird,
    /// Flashcards dominate the other activity volumes
    Memorizer,
    /// Videos dominate the other activity volumes
    Visualist,
    /// Balanced across every tool - the catch-all
    AllRounder,
}

impl StudyPersonality {
    /// Get the display name for this personality.
    pub fn name(&self) -> &'static str {
        match self {
            StudyPersonality::Strategist => "The Strategist",
            StudyPersonality::Marathoner => "The Marathoner",
            StudyPersonality::NightOwl => "The Night Owl",
            StudyPersonality::EarlyBird => "The Early Bird",
            StudyPersonality::Memorizer => "The Memorizer",
            StudyPersonality::Visualist => "The Visualist",
            StudyPersonality::AllRounder => "The All-Rounder",
        }
    }

    /// Get the description shown alongside the archetype.
    pub fn description(&self) -> &'static str {
        match self {
            StudyPersonality::Strategist => {
                "You plan every step carefully and execute with precision. \
                 Your dedication and consistency are admirable!"
            }
            StudyPersonality::Marathoner => {
                "You don't stop until you've mastered the subject. \
                 Your endurance and focus are enviable!"
            }
            StudyPersonality::NightOwl => {
                "While the world sleeps, you keep improving. \
                 Night time is when your concentration peaks!"
            }
            StudyPersonality::EarlyBird => {
                "You make the most of the first hours of the day. \
                 Morning discipline sets you apart!"
            }
            StudyPersonality::Memorizer => {
                "Flashcards are your secret weapon. \
                 You've mastered the art of spaced repetition!"
            }
            StudyPersonality::Visualist => {
                "You learn best by watching. \
                 Video lessons are your preferred path to knowledge!"
            }
            StudyPersonality::AllRounder => {
                "You use every tool available in a balanced way. \
                 Versatility is your trademark!"
            }
        }
    }

    /// Get an emoji for this personality.
    pub fn emoji(&self) -> &'static str {
        match self {
            StudyPersonality::Strategist => "🎯",
            StudyPersonality::Marathoner => "🏃",
            StudyPersonality::NightOwl => "🦉",
            StudyPersonality::EarlyBird => "🌅",
            StudyPersonality::Memorizer => "🧠",
            StudyPersonality::Visualist => "👁️",
            StudyPersonality::AllRounder => "⚖️",
        }
    }

    /// Render as the result payload carried in the consolidated stats.
    pub fn to_result(self) -> PersonalityResult {
        PersonalityResult {
            archetype: self.name().to_string(),
            description: self.description().to_string(),
        }
    }
}

/// Aggregate yearly figures used for classification.
#[derive(Debug, Clone, Default)]
pub struct StudyProfile {
    /// Questions answered across the year
    pub questions_total: i64,
    /// Flashcard reviews across the year
    pub flashcards_total: i64,
    /// Videos watched across the year
    pub videos_total: i64,
    /// Overall answer accuracy, 0-100
    pub accuracy_rate: f64,
    /// Longest consecutive-day streak
    pub streak: i64,
    /// Most active local hour of day, 0-23
    pub peak_hour: u8,
}

impl StudyProfile {
    /// Classify the profile. First matching rule wins; the cascade
    /// order is a public contract, so reordering changes results.
    pub fn classify(&self) -> StudyPersonality {
        if self.streak >= 30 && self.accuracy_rate >= 80.0 {
            return StudyPersonality::Strategist;
        }
        if self.questions_total > 5000 && self.accuracy_rate >= 75.0 {
            return StudyPersonality::Marathoner;
        }
        if self.peak_hour >= 22 || self.peak_hour <= 5 {
            return StudyPersonality::NightOwl;
        }
        if (5..=8).contains(&self.peak_hour) {
            return StudyPersonality::EarlyBird;
        }
        if self.flashcards_total > self.videos_total
            && self.flashcards_total > self.questions_total
        {
            return StudyPersonality::Memorizer;
        }
        if self.videos_total > self.questions_total
            && self.videos_total > self.flashcards_total
        {
            return StudyPersonality::Visualist;
        }
        StudyPersonality::AllRounder
    }
}
