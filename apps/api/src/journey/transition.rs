//! Completion Transition: the only way a [`ProgressRecord`] changes.
//!
//! `complete` is a pure function. It never mutates its input, so a rejected or
//! retried call leaves the caller's record exactly as it was.

use chrono::{DateTime, Duration, Utc};

use crate::journey::catalog::TaskDefinition;
use crate::journey::error::JourneyError;
use crate::journey::gate::{cooldown, evaluate, DayStatus};
use crate::journey::progress::{awarded_badges, JourneyRules, ProgressRecord};

/// A completion within this window of the previous one extends the streak.
pub fn streak_window() -> Duration {
    cooldown() + Duration::hours(24)
}

pub fn complete(
    record: &ProgressRecord,
    task: &TaskDefinition,
    rules: &JourneyRules,
    now: DateTime<Utc>,
) -> Result<ProgressRecord, JourneyError> {
    let status = evaluate(record, task.day, now);
    if task.day != record.current_day || status != DayStatus::Available {
        return Err(JourneyError::Precondition {
            day: task.day,
            status,
        });
    }

    let experience = record
        .experience
        .checked_add(task.xp_reward)
        .ok_or_else(|| {
            JourneyError::InvalidRecord(format!(
                "experience {} cannot absorb {} more XP",
                record.experience, task.xp_reward
            ))
        })?;

    let mut next = record.clone();
    next.completed_days.insert(task.day);
    next.experience = experience;
    next.level = rules.level_for(next.experience);
    next.badges
        .extend(awarded_badges(task.day).map(str::to_string));
    next.current_day = record.current_day + 1;
    next.streak = match record.last_completed_date {
        Some(last) if now - last < streak_window() => record.streak.saturating_add(1),
        _ => 1,
    };
    next.last_completed_date = Some(now);

    Ok(next)
}
