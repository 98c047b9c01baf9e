use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tripmate_core::models::{HostRating, NewReview, Review};
use tripmate_trip::review as review_rules;

use crate::error::AppError;
use crate::middleware::auth::{current_traveler, Claims};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub travel_plan_id: Uuid,
    pub reviewee_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReceivedReviews {
    pub host_rating: HostRating,
    pub reviews: Vec<Review>,
}

/// POST /v1/reviews
pub async fn create_review(
    State(state): State<AppState>,
    claims: Claims,
    Json(req): Json<CreateReviewRequest>,
) -> Result<Json<Review>, AppError> {
    let traveler = current_traveler(&state, &claims).await?;

    review_rules::validate_rating(req.rating)?;

    let plan = state
        .plan_repo
        .find_any(req.travel_plan_id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Plan not found".to_string()))?;

    let accepted = state
        .request_repo
        .accepted_requester_ids(req.travel_plan_id)
        .await?;

    let already_reviewed = state
        .review_repo
        .exists(traveler.id, req.reviewee_id, req.travel_plan_id)
        .await?;

    review_rules::guard_review(
        &plan,
        &accepted,
        traveler.id,
        req.reviewee_id,
        already_reviewed,
    )?;

    let review = state
        .review_repo
        .create(NewReview {
            reviewer_id: traveler.id,
            reviewee_id: req.reviewee_id,
            travel_plan_id: req.travel_plan_id,
            rating: req.rating,
            comment: req.comment,
        })
        .await?;

    tracing::info!(
        "Review {} submitted by {} for plan {}",
        review.id,
        traveler.email,
        req.travel_plan_id
    );

    Ok(Json(review))
}

/// GET /v1/reviews/my-received
pub async fn my_received_reviews(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<ReceivedReviews>, AppError> {
    let traveler = current_traveler(&state, &claims).await?;

    let host_rating = state.review_repo.summary_for(traveler.id).await?;
    let reviews = state.review_repo.list_for_reviewee(traveler.id).await?;

    Ok(Json(ReceivedReviews {
        host_rating,
        reviews,
    }))
}
