use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tripmate_core::models::{
    HostRating, NewTravelPlan, PlanChanges, PlanSortField, PlanWithOwner, PlanWithRequestCount,
    Review, TravelPlan, TravelerSummary,
};
use tripmate_core::repository::PlanListFilter;
use tripmate_match::{match_score, MatchCriteria};
use tripmate_shared::models::{PlanStatus, TravelType};
use tripmate_shared::pagination::{Page, PageOptions, SortOrder};
use tripmate_trip::plan as plan_rules;

use crate::error::AppError;
use crate::middleware::auth::{current_traveler, Claims};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListPlansQuery {
    pub search_term: Option<String>,
    pub travel_type: Option<TravelType>,
    pub status: Option<PlanStatus>,
    pub sort_by: Option<PlanSortField>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Deserialize)]
pub struct MatchPlansQuery {
    pub destination: Option<String>,
    pub travel_type: Option<TravelType>,
    pub min_budget: Option<i32>,
    pub max_budget: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Comma-separated, e.g. `interests=diving,hiking`.
    pub interests: Option<String>,
    pub sort_by: Option<PlanSortField>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: i32,
    pub travel_type: TravelType,
    pub itinerary: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlanRequest {
    pub destination: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<i32>,
    pub travel_type: Option<TravelType>,
    pub itinerary: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListedPlan {
    #[serde(flatten)]
    pub plan: PlanWithOwner,
    pub host_rating: HostRating,
}

#[derive(Debug, Serialize)]
pub struct MatchedPlan {
    #[serde(flatten)]
    pub plan: PlanWithOwner,
    pub host_rating: HostRating,
    /// Additive 0-100 display score; never affects which rows are returned.
    pub match_score: u8,
}

#[derive(Debug, Serialize)]
pub struct MyPlan {
    #[serde(flatten)]
    pub plan: PlanWithRequestCount,
    pub host_rating: HostRating,
}

#[derive(Debug, Serialize)]
pub struct PlanDetail {
    #[serde(flatten)]
    pub plan: TravelPlan,
    pub traveler: TravelerSummary,
    pub host_rating: HostRating,
    pub reviews: Vec<Review>,
}

pub(crate) fn page_options(
    page: Option<u32>,
    limit: Option<u32>,
    sort_order: Option<SortOrder>,
) -> PageOptions {
    let defaults = PageOptions::default();
    PageOptions {
        page: page.unwrap_or(defaults.page),
        limit: limit.unwrap_or(defaults.limit),
        sort_order: sort_order.unwrap_or(defaults.sort_order),
    }
}

fn split_interests(raw: Option<String>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|i| !i.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/plans
pub async fn list_plans(
    State(state): State<AppState>,
    Query(query): Query<ListPlansQuery>,
) -> Result<Json<Page<ListedPlan>>, AppError> {
    let filter = PlanListFilter {
        search_term: query.search_term,
        travel_type: query.travel_type,
        status: query.status,
    };
    let options = page_options(query.page, query.limit, query.sort_order);
    let sort_by = query.sort_by.unwrap_or_default();

    let (plans, total) = state.plan_repo.list(&filter, sort_by, &options).await?;

    let owner_ids: Vec<Uuid> = plans.iter().map(|p| p.plan.traveler_id).collect();
    let ratings = state.review_repo.summaries_for(&owner_ids).await?;

    let data = plans
        .into_iter()
        .map(|plan| {
            let host_rating = ratings
                .get(&plan.plan.traveler_id)
                .copied()
                .unwrap_or_default();
            ListedPlan { plan, host_rating }
        })
        .collect();

    Ok(Json(Page::new(&options, total, data)))
}

/// GET /v1/plans/match
///
/// Filters plans against the supplied criteria, then annotates each result
/// with a match score and the owner's review standing.
pub async fn match_plans(
    State(state): State<AppState>,
    Query(query): Query<MatchPlansQuery>,
) -> Result<Json<Page<MatchedPlan>>, AppError> {
    let criteria = MatchCriteria {
        destination: query.destination,
        travel_type: query.travel_type,
        min_budget: query.min_budget,
        max_budget: query.max_budget,
        start_date: query.start_date,
        end_date: query.end_date,
        interests: split_interests(query.interests),
    };
    let options = page_options(query.page, query.limit, query.sort_order);
    let sort_by = query.sort_by.unwrap_or_default();

    let (plans, total) = state
        .match_repo
        .list_matched(&criteria, sort_by, &options)
        .await?;

    let owner_ids: Vec<Uuid> = plans.iter().map(|p| p.plan.traveler_id).collect();
    let ratings = state.review_repo.summaries_for(&owner_ids).await?;

    let data = plans
        .into_iter()
        .map(|plan| {
            let score = match_score(&criteria, &plan.plan, &plan.traveler.interests);
            let host_rating = ratings
                .get(&plan.plan.traveler_id)
                .copied()
                .unwrap_or_default();
            MatchedPlan {
                plan,
                host_rating,
                match_score: score,
            }
        })
        .collect();

    Ok(Json(Page::new(&options, total, data)))
}

/// GET /v1/plans/my-plans
pub async fn my_plans(
    State(state): State<AppState>,
    claims: Claims,
    Query(query): Query<ListPlansQuery>,
) -> Result<Json<Page<MyPlan>>, AppError> {
    let traveler = current_traveler(&state, &claims).await?;

    let filter = PlanListFilter {
        search_term: query.search_term,
        travel_type: query.travel_type,
        status: query.status,
    };
    let options = page_options(query.page, query.limit, query.sort_order);
    let sort_by = query.sort_by.unwrap_or_default();

    let (plans, total) = state
        .plan_repo
        .list_for_owner(traveler.id, &filter, sort_by, &options)
        .await?;

    // All plans share one owner, so one summary covers the page.
    let host_rating = state.review_repo.summary_for(traveler.id).await?;

    let data = plans
        .into_iter()
        .map(|plan| MyPlan { plan, host_rating })
        .collect();

    Ok(Json(Page::new(&options, total, data)))
}

/// GET /v1/plans/:id
pub async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlanDetail>, AppError> {
    let plan = state
        .plan_repo
        .find_active(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Plan not found".to_string()))?;

    let owner = state
        .traveler_repo
        .find_by_id(plan.traveler_id)
        .await?
        .ok_or_else(|| AppError::InternalServerError("Plan owner missing".to_string()))?;

    let host_rating = state.review_repo.summary_for(plan.traveler_id).await?;
    let reviews = state.review_repo.list_for_plan(id).await?;

    Ok(Json(PlanDetail {
        plan,
        traveler: owner.into(),
        host_rating,
        reviews,
    }))
}

/// POST /v1/plans
pub async fn create_plan(
    State(state): State<AppState>,
    claims: Claims,
    Json(req): Json<CreatePlanRequest>,
) -> Result<Json<TravelPlan>, AppError> {
    let traveler = current_traveler(&state, &claims).await?;

    plan_rules::validate_dates(req.start_date, req.end_date)?;

    let plan = state
        .plan_repo
        .create(
            traveler.id,
            NewTravelPlan {
                destination: req.destination,
                start_date: req.start_date,
                end_date: req.end_date,
                budget: req.budget,
                travel_type: req.travel_type,
                itinerary: req.itinerary,
                description: req.description,
            },
        )
        .await?;

    Ok(Json(plan))
}

/// PATCH /v1/plans/:id
pub async fn update_plan(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePlanRequest>,
) -> Result<Json<TravelPlan>, AppError> {
    let traveler = current_traveler(&state, &claims).await?;

    let plan = state
        .plan_repo
        .find_active(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Plan not found".to_string()))?;

    plan_rules::ensure_owner(&plan, traveler.id, "update")?;

    // Validate the dates the plan would end up with, not just the new ones.
    let start_date = req.start_date.unwrap_or(plan.start_date);
    let end_date = req.end_date.unwrap_or(plan.end_date);
    plan_rules::validate_dates(start_date, end_date)?;

    let changes = PlanChanges {
        destination: req.destination,
        start_date: req.start_date,
        end_date: req.end_date,
        budget: req.budget,
        travel_type: req.travel_type,
        itinerary: req.itinerary,
        description: req.description,
    };

    if changes.is_empty() {
        return Ok(Json(plan));
    }

    let updated = state.plan_repo.update(id, changes).await?;
    Ok(Json(updated))
}

/// DELETE /v1/plans/:id (soft delete)
pub async fn delete_plan(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
) -> Result<Json<TravelPlan>, AppError> {
    let traveler = current_traveler(&state, &claims).await?;

    let plan = state
        .plan_repo
        .find_active(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Plan not found".to_string()))?;

    plan_rules::ensure_owner(&plan, traveler.id, "delete")?;

    let deleted = state.plan_repo.set_deleted(id).await?;
    Ok(Json(deleted))
}

/// PATCH /v1/plans/:id/start
pub async fn start_plan(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
) -> Result<Json<TravelPlan>, AppError> {
    let traveler = current_traveler(&state, &claims).await?;

    let plan = state
        .plan_repo
        .find_active(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Plan not found".to_string()))?;

    plan_rules::guard_start(&plan, traveler.id, Utc::now().date_naive())?;

    let updated = state.plan_repo.set_status(id, PlanStatus::Ongoing).await?;
    tracing::info!("Plan {} started by {}", id, traveler.email);
    Ok(Json(updated))
}

/// PATCH /v1/plans/:id/complete
pub async fn complete_plan(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
) -> Result<Json<TravelPlan>, AppError> {
    let traveler = current_traveler(&state, &claims).await?;

    let plan = state
        .plan_repo
        .find_active(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Plan not found".to_string()))?;

    plan_rules::guard_complete(&plan, traveler.id, Utc::now().date_naive())?;

    let updated = state
        .plan_repo
        .set_status(id, PlanStatus::Completed)
        .await?;
    tracing::info!("Plan {} completed by {}", id, traveler.email);
    Ok(Json(updated))
}
