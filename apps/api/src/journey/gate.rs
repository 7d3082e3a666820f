//! Gate Evaluator: derives each day's unlock status from a progress record and `now`.
//!
//! Precedence:
//! 1. day outside the curriculum → `Locked` (non-existent days are never reachable)
//! 2. day already completed → `Completed`
//! 3. day == `current_day` → `Available`, or `Cooldown` while less than 24h have
//!    elapsed since the last completion
//! 4. day > `current_day` → `Locked`
//! 5. day < `current_day` but not completed → `Completed` (inconsistent data, not repaired)
//!
//! The gate is "24h since the last completion", not "once per calendar day".

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::journey::catalog::JOURNEY_DAYS;
use crate::journey::progress::ProgressRecord;

pub const COOLDOWN_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Completed,
    Available,
    Cooldown,
    Locked,
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DayStatus::Completed => "completed",
            DayStatus::Available => "available",
            DayStatus::Cooldown => "cooldown",
            DayStatus::Locked => "locked",
        };
        f.write_str(s)
    }
}

pub fn cooldown() -> Duration {
    Duration::hours(COOLDOWN_HOURS)
}

pub fn evaluate(record: &ProgressRecord, day: u32, now: DateTime<Utc>) -> DayStatus {
    if day == 0 || day > JOURNEY_DAYS {
        return DayStatus::Locked;
    }
    if record.completed_days.contains(&day) {
        return DayStatus::Completed;
    }
    if day == record.current_day {
        return if cooldown_remaining(record, now).is_zero() {
            DayStatus::Available
        } else {
            DayStatus::Cooldown
        };
    }
    if day > record.current_day {
        return DayStatus::Locked;
    }
    DayStatus::Completed
}

/// Time left until the next day unlocks; zero when nothing has been completed yet
/// or the cooldown has elapsed. A clock running behind the last completion counts as
/// zero elapsed time.
pub fn cooldown_remaining(record: &ProgressRecord, now: DateTime<Utc>) -> Duration {
    let Some(last) = record.last_completed_date else {
        return Duration::zero();
    };
    let elapsed = (now - last).max(Duration::zero());
    (cooldown() - elapsed).max(Duration::zero())
}

/// Renders a remaining duration as `"{h}h {m}m"`, truncating (never rounding) both parts.
pub fn format_remaining(remaining: Duration) -> String {
    let hours = remaining.num_hours();
    let minutes = remaining.num_minutes() % 60;
    format!("{hours}h {minutes}m")
}
