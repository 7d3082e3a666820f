//! Persistence adapter for journey progress and the premium entitlement flag.
//!
//! Progress is stored as a JSONB document in `user_profiles.soft_skills_progress`,
//! using the same camelCase layout the web client has always written, so existing
//! rows load unchanged:
//!
//! ```sql
//! CREATE TABLE user_profiles (
//!     user_id              UUID PRIMARY KEY,
//!     soft_skills_progress JSONB,
//!     updated_at           TIMESTAMPTZ NOT NULL DEFAULT now()
//! );
//! -- maintained by the payments webhook
//! CREATE TABLE users (id UUID PRIMARY KEY, is_premium BOOLEAN NOT NULL DEFAULT false);
//! ```
//!
//! Writes are last-write-wins. Two devices that load the same record and both
//! complete a day before either saves will lose one completion's gains; guarding
//! against that needs a version check in `save`, which this adapter does not do.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::journey::progress::ProgressRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// `None` for users who have never entered the journey.
    async fn load(&self, user_id: Uuid) -> Result<Option<ProgressRecord>, StoreError>;

    /// Upserts the record. The completion it carries is durable only once this returns `Ok`.
    async fn save(&self, user_id: Uuid, record: &ProgressRecord) -> Result<(), StoreError>;
}

#[async_trait]
pub trait Entitlements: Send + Sync {
    async fn is_premium(&self, user_id: Uuid) -> Result<bool, StoreError>;
}

/// Stored document layout. Kept apart from [`ProgressRecord`] so the API shape and
/// the profile-store shape can evolve independently.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredProgress {
    pub level: u32,
    pub current_day: u32,
    pub completed_days: Vec<u32>,
    pub badges: Vec<String>,
    pub last_completed_date: Option<DateTime<Utc>>,
    pub experience: u32,
    // absent in documents written before streaks existed
    #[serde(default)]
    pub streak: u32,
}

impl From<&ProgressRecord> for StoredProgress {
    fn from(record: &ProgressRecord) -> Self {
        Self {
            level: record.level,
            current_day: record.current_day,
            completed_days: record.completed_days.iter().copied().collect(),
            badges: record.badges.iter().cloned().collect(),
            last_completed_date: record.last_completed_date,
            experience: record.experience,
            streak: record.streak,
        }
    }
}

impl From<StoredProgress> for ProgressRecord {
    fn from(stored: StoredProgress) -> Self {
        Self {
            level: stored.level,
            current_day: stored.current_day,
            completed_days: stored.completed_days.into_iter().collect::<BTreeSet<_>>(),
            badges: stored.badges.into_iter().collect::<BTreeSet<_>>(),
            last_completed_date: stored.last_completed_date,
            experience: stored.experience,
            streak: stored.streak,
        }
    }
}

/// PostgreSQL-backed profile store.
#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgressStore for PgProfileStore {
    async fn load(&self, user_id: Uuid) -> Result<Option<ProgressRecord>, StoreError> {
        let row: Option<Option<Json<StoredProgress>>> = sqlx::query_scalar(
            "SELECT soft_skills_progress FROM user_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.flatten().map(|Json(stored)| stored.into()))
    }

    async fn save(&self, user_id: Uuid, record: &ProgressRecord) -> Result<(), StoreError> {
        let document = serde_json::to_value(StoredProgress::from(record))?;
        sqlx::query(
            r#"
            INSERT INTO user_profiles (user_id, soft_skills_progress, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (user_id) DO UPDATE
            SET soft_skills_progress = EXCLUDED.soft_skills_progress,
                updated_at = now()
            "#,
        )
        .bind(user_id)
        .bind(document)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl Entitlements for PgProfileStore {
    async fn is_premium(&self, user_id: Uuid) -> Result<bool, StoreError> {
        let flag: Option<bool> = sqlx::query_scalar("SELECT is_premium FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(flag.unwrap_or(false))
    }
}
