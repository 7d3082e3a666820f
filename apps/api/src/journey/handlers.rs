use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::journey::catalog::TaskDefinition;
use crate::journey::service::{complete_day, journey_overview, load_or_init};
use crate::journey::service::{CompletionOutcome, JourneyOverview};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CompleteDayRequest {
    pub user_id: Uuid,
    pub day: u32,
}

async fn require_premium(state: &AppState, user_id: Uuid) -> Result<(), AppError> {
    if user_id.is_nil() {
        return Err(AppError::Validation("user_id must not be nil".to_string()));
    }
    if !state.entitlements.is_premium(user_id).await? {
        return Err(AppError::PremiumRequired);
    }
    Ok(())
}

/// GET /api/v1/journey/tasks
pub async fn handle_list_tasks(State(state): State<AppState>) -> Json<Vec<TaskDefinition>> {
    Json(state.catalog.all_tasks().to_vec())
}

/// GET /api/v1/journey/tasks/:day
pub async fn handle_get_task(
    State(state): State<AppState>,
    AppPath(day): AppPath<u32>,
) -> Result<Json<TaskDefinition>, AppError> {
    Ok(Json(state.catalog.get_task(day)?.clone()))
}

/// GET /api/v1/journey
pub async fn handle_get_journey(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<UserIdQuery>,
) -> Result<Json<JourneyOverview>, AppError> {
    require_premium(&state, params.user_id).await?;
    let record = load_or_init(state.progress.as_ref(), params.user_id).await?;
    let now = state.clock.now();
    Ok(Json(journey_overview(
        record,
        &state.catalog,
        &state.rules,
        now,
    )))
}

/// POST /api/v1/journey/complete
pub async fn handle_complete_day(
    State(state): State<AppState>,
    AppJson(req): AppJson<CompleteDayRequest>,
) -> Result<Json<CompletionOutcome>, AppError> {
    require_premium(&state, req.user_id).await?;
    let now = state.clock.now();
    let outcome = complete_day(
        state.progress.as_ref(),
        &state.catalog,
        &state.rules,
        req.user_id,
        req.day,
        now,
    )
    .await?;
    Ok(Json(outcome))
}
