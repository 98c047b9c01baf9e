use axum::{
    extract::{Path, State},
    middleware::from_fn_with_state,
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tripmate_core::models::{TravelPlan, TravelerSummary};
use tripmate_shared::models::{UserRole, UserStatus};

use crate::error::AppError;
use crate::middleware::auth::admin_auth_middleware;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AdminPlanDetail {
    #[serde(flatten)]
    pub plan: TravelPlan,
    pub traveler: TravelerSummary,
    /// How many plans the owner has created in total, deleted ones included.
    pub traveler_plan_count: i64,
}

/// GET /v1/admin/plans/:id
///
/// Unlike the public endpoint this also returns soft-deleted plans.
pub async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AdminPlanDetail>, AppError> {
    let plan = state
        .plan_repo
        .find_any(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Plan not found".to_string()))?;

    let owner = state
        .traveler_repo
        .find_by_id(plan.traveler_id)
        .await?
        .ok_or_else(|| AppError::InternalServerError("Plan owner missing".to_string()))?;

    let traveler_plan_count = state.plan_repo.count_for_owner(plan.traveler_id).await?;

    Ok(Json(AdminPlanDetail {
        plan,
        traveler: owner.into(),
        traveler_plan_count,
    }))
}

/// DELETE /v1/admin/plans/:id
///
/// Permanent removal; requests and reviews go with the plan via FK cascade.
pub async fn delete_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    state
        .plan_repo
        .find_any(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Plan not found".to_string()))?;

    state.plan_repo.hard_delete(id).await?;

    tracing::warn!("Plan {} permanently deleted by admin", id);

    Ok(Json(serde_json::json!({ "deleted": id })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserStatusRequest {
    pub status: UserStatus,
}

#[derive(Debug, Serialize)]
pub struct UserStatusResponse {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
}

/// PATCH /v1/admin/users/:id/status
///
/// Blocks or unblocks an account. A BLOCKED user keeps their data but can no
/// longer log in.
pub async fn set_user_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserStatusRequest>,
) -> Result<Json<UserStatusResponse>, AppError> {
    let user = state.traveler_repo.set_user_status(id, req.status).await?;

    tracing::warn!("User {} status set to {} by admin", user.email, user.status);

    Ok(Json(UserStatusResponse {
        id: user.id,
        email: user.email,
        role: user.role,
        status: user.status,
    }))
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/plans/{id}", get(get_plan).delete(delete_plan))
        .route("/users/{id}/status", patch(set_user_status))
        .route_layer(from_fn_with_state(state, admin_auth_middleware))
}
