use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::journey::catalog::JOURNEY_DAYS;

/// Experience needed per level unless overridden via `JOURNEY_LEVEL_XP`.
pub const DEFAULT_LEVEL_XP_THRESHOLD: u32 = 500;

/// Milestone days and the badge each one awards.
/// Identifiers are stored verbatim in user profiles; never rename them.
const BADGE_MILESTONES: &[(u32, &str)] = &[
    (1, "Iniciado"),
    (7, "Semana 1"),
    (JOURNEY_DAYS, "Mestre Soft Skills"),
];

/// Tunable engine constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JourneyRules {
    pub level_xp_threshold: u32,
}

impl Default for JourneyRules {
    fn default() -> Self {
        Self {
            level_xp_threshold: DEFAULT_LEVEL_XP_THRESHOLD,
        }
    }
}

impl JourneyRules {
    /// `floor(experience / threshold) + 1`. Level is always derived, never stored independently.
    pub fn level_for(&self, experience: u32) -> u32 {
        experience / self.level_xp_threshold + 1
    }
}

/// Per-user journey state. Mutated only by [`crate::journey::transition::complete`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressRecord {
    pub level: u32,
    /// Next day the user may attempt; `JOURNEY_DAYS + 1` once the journey is finished.
    pub current_day: u32,
    pub completed_days: BTreeSet<u32>,
    pub badges: BTreeSet<String>,
    pub last_completed_date: Option<DateTime<Utc>>,
    pub experience: u32,
    /// Consecutive completions, each within the streak window of the previous one.
    pub streak: u32,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        init_progress()
    }
}

impl ProgressRecord {
    pub fn is_finished(&self) -> bool {
        self.current_day > JOURNEY_DAYS
    }

    pub fn level_progress(&self, rules: &JourneyRules) -> LevelProgress {
        LevelProgress::new(self.experience, rules)
    }
}

/// Default record for a first-time user.
pub fn init_progress() -> ProgressRecord {
    ProgressRecord {
        level: 1,
        current_day: 1,
        completed_days: BTreeSet::new(),
        badges: BTreeSet::new(),
        last_completed_date: None,
        experience: 0,
        streak: 0,
    }
}

/// Badges earned by completing `day`. Additive only.
pub fn awarded_badges(day: u32) -> impl Iterator<Item = &'static str> {
    BADGE_MILESTONES
        .iter()
        .filter(move |(milestone, _)| *milestone == day)
        .map(|(_, badge)| *badge)
}

/// Position inside the current level, for the XP progress bar.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LevelProgress {
    pub level: u32,
    pub experience: u32,
    pub xp_into_level: u32,
    pub xp_to_next_level: u32,
    pub percent: u32,
}

impl LevelProgress {
    pub fn new(experience: u32, rules: &JourneyRules) -> Self {
        let threshold = rules.level_xp_threshold;
        let xp_into_level = experience % threshold;
        Self {
            level: rules.level_for(experience),
            experience,
            xp_into_level,
            xp_to_next_level: threshold - xp_into_level,
            percent: xp_into_level * 100 / threshold,
        }
    }
}
