use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use tripmate_core::models::{RequestWithRequester, SentRequest, TravelBuddyRequest};
use tripmate_shared::models::RequestStatus;
use tripmate_shared::pagination::{Page, SortOrder};
use tripmate_trip::request as request_rules;

use crate::error::AppError;
use crate::middleware::auth::{current_traveler, Claims};
use crate::plans::page_options;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendRequestBody {
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListRequestsQuery {
    pub status: Option<RequestStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequestBody {
    pub status: RequestStatus,
}

/// POST /v1/plans/:id/request
pub async fn send_request(
    State(state): State<AppState>,
    claims: Claims,
    Path(plan_id): Path<Uuid>,
    Json(body): Json<SendRequestBody>,
) -> Result<Json<TravelBuddyRequest>, AppError> {
    let traveler = current_traveler(&state, &claims).await?;

    let plan = state
        .plan_repo
        .find_active(plan_id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Plan not found".to_string()))?;

    let already_requested = state.request_repo.exists_for(plan_id, traveler.id).await?;
    request_rules::guard_send(&plan, traveler.id, already_requested)?;

    let request = state
        .request_repo
        .create(plan_id, traveler.id, body.message)
        .await?;

    tracing::info!(
        "Buddy request {} sent by {} for plan {}",
        request.id,
        traveler.email,
        plan_id
    );

    Ok(Json(request))
}

/// GET /v1/plans/:id/requests (plan owner only)
pub async fn list_plan_requests(
    State(state): State<AppState>,
    claims: Claims,
    Path(plan_id): Path<Uuid>,
    Query(query): Query<ListRequestsQuery>,
) -> Result<Json<Page<RequestWithRequester>>, AppError> {
    let traveler = current_traveler(&state, &claims).await?;

    let plan = state
        .plan_repo
        .find_active(plan_id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Plan not found".to_string()))?;

    request_rules::ensure_plan_owner(&plan, traveler.id)?;

    let options = page_options(query.page, query.limit, query.sort_order);
    let (requests, total) = state
        .request_repo
        .list_for_plan(plan_id, query.status, &options)
        .await?;

    Ok(Json(Page::new(&options, total, requests)))
}

/// GET /v1/plans/my-requests
pub async fn my_sent_requests(
    State(state): State<AppState>,
    claims: Claims,
    Query(query): Query<ListRequestsQuery>,
) -> Result<Json<Page<SentRequest>>, AppError> {
    let traveler = current_traveler(&state, &claims).await?;

    let options = page_options(query.page, query.limit, query.sort_order);
    let (requests, total) = state
        .request_repo
        .list_sent(traveler.id, query.status, &options)
        .await?;

    Ok(Json(Page::new(&options, total, requests)))
}

/// PATCH /v1/requests/:id (accept or reject; plan owner only)
pub async fn update_request(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateRequestBody>,
) -> Result<Json<TravelBuddyRequest>, AppError> {
    let traveler = current_traveler(&state, &claims).await?;

    request_rules::validate_target_status(body.status)?;

    let request = state
        .request_repo
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Request not found".to_string()))?;

    // find_any: the owner may still settle requests on a soft-deleted plan.
    let plan = state
        .plan_repo
        .find_any(request.travel_plan_id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Plan not found".to_string()))?;

    request_rules::ensure_plan_owner(&plan, traveler.id)?;

    let updated = state
        .request_repo
        .transition_if_pending(id, body.status)
        .await?
        .ok_or_else(|| {
            AppError::ValidationError("Only pending requests can be updated".to_string())
        })?;

    tracing::info!("Buddy request {} marked {}", id, body.status);

    Ok(Json(updated))
}
