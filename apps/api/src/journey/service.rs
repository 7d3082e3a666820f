//! Journey orchestration: load → evaluate → complete → save.
//!
//! The record is always loaded fresh right before a completion attempt. A stale,
//! cached record would let one session credit the same day twice.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::journey::catalog::{Catalog, Category};
use crate::journey::gate::{cooldown_remaining, evaluate, format_remaining, DayStatus};
use crate::journey::progress::{init_progress, JourneyRules, LevelProgress, ProgressRecord};
use crate::journey::store::{ProgressStore, StoreError};
use crate::journey::transition::complete;

const MAX_SAVE_ATTEMPTS: u32 = 3;
const SAVE_BACKOFF_BASE_MS: u64 = 100;

/// One row of the journey map.
#[derive(Debug, Clone, Serialize)]
pub struct DayView {
    pub day: u32,
    pub title: String,
    pub category: Category,
    pub category_label: &'static str,
    pub xp_reward: u32,
    pub status: DayStatus,
    /// `"{h}h {m}m"`, present only while the day is in cooldown.
    pub cooldown_remaining: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JourneyOverview {
    pub progress: ProgressRecord,
    pub level: LevelProgress,
    pub completed_count: usize,
    pub total_days: u32,
    pub finished: bool,
    pub days: Vec<DayView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionOutcome {
    pub progress: ProgressRecord,
    pub xp_gained: u32,
    pub leveled_up: bool,
    pub badges_awarded: Vec<String>,
}

/// Returns the stored record, or a fresh one for first-time users.
/// A fresh record is not persisted until its first completion.
pub async fn load_or_init(
    store: &dyn ProgressStore,
    user_id: Uuid,
) -> Result<ProgressRecord, StoreError> {
    match store.load(user_id).await? {
        Some(record) => Ok(record),
        None => {
            debug!("No stored journey progress for user {user_id}, using a fresh record");
            Ok(init_progress())
        }
    }
}

pub fn journey_overview(
    record: ProgressRecord,
    catalog: &Catalog,
    rules: &JourneyRules,
    now: DateTime<Utc>,
) -> JourneyOverview {
    let days = catalog
        .all_tasks()
        .iter()
        .map(|task| {
            let status = evaluate(&record, task.day, now);
            let cooldown_remaining = (status == DayStatus::Cooldown)
                .then(|| format_remaining(cooldown_remaining(&record, now)));
            DayView {
                day: task.day,
                title: task.title.clone(),
                category: task.category,
                category_label: task.category.label(),
                xp_reward: task.xp_reward,
                status,
                cooldown_remaining,
            }
        })
        .collect();

    JourneyOverview {
        level: record.level_progress(rules),
        completed_count: record.completed_days.len(),
        total_days: catalog.len(),
        finished: record.is_finished(),
        progress: record,
        days,
    }
}

pub async fn complete_day(
    store: &dyn ProgressStore,
    catalog: &Catalog,
    rules: &JourneyRules,
    user_id: Uuid,
    day: u32,
    now: DateTime<Utc>,
) -> Result<CompletionOutcome, AppError> {
    let task = catalog.get_task(day)?;
    let record = load_or_init(store, user_id).await?;

    let next = complete(&record, task, rules, now).map_err(|e| {
        warn!("Rejected completion of day {day} for user {user_id}: {e}");
        e
    })?;

    save_with_retry(store, user_id, &next).await?;

    let leveled_up = next.level > record.level;
    let badges_awarded: Vec<String> = next.badges.difference(&record.badges).cloned().collect();

    info!(
        "User {user_id} completed day {day} (+{} XP, total {}, level {})",
        task.xp_reward, next.experience, next.level
    );
    if leveled_up {
        info!("User {user_id} reached level {}", next.level);
    }
    if !badges_awarded.is_empty() {
        info!("User {user_id} earned badges {:?}", badges_awarded);
    }

    Ok(CompletionOutcome {
        progress: next,
        xp_gained: task.xp_reward,
        leveled_up,
        badges_awarded,
    })
}

/// Saves the already-computed record, retrying with exponential backoff (100ms, 200ms).
/// The transition is never recomputed between attempts.
pub async fn save_with_retry(
    store: &dyn ProgressStore,
    user_id: Uuid,
    record: &ProgressRecord,
) -> Result<(), StoreError> {
    let mut attempt = 1;
    loop {
        match store.save(user_id, record).await {
            Ok(()) => return Ok(()),
            Err(e) if attempt < MAX_SAVE_ATTEMPTS => {
                let delay = StdDuration::from_millis(SAVE_BACKOFF_BASE_MS << (attempt - 1));
                warn!(
                    "Saving progress for user {user_id} failed (attempt {attempt}): {e}; retrying after {}ms",
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
