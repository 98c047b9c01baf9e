use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tripmate_core::models::{HostRating, ProfileChanges, Traveler};
use tripmate_shared::models::Gender;

use crate::error::AppError;
use crate::middleware::auth::{current_traveler, Claims};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub traveler: Traveler,
    pub host_rating: HostRating,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub gender: Option<Gender>,
    pub interests: Option<Vec<String>>,
    pub address: Option<String>,
    pub visited_countries: Option<Vec<String>>,
    pub profile_photo: Option<String>,
}

pub async fn my_profile(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<ProfileResponse>, AppError> {
    let traveler = current_traveler(&state, &claims).await?;
    let host_rating = state.review_repo.summary_for(traveler.id).await?;

    Ok(Json(ProfileResponse {
        traveler,
        host_rating,
    }))
}

pub async fn update_profile(
    State(state): State<AppState>,
    claims: Claims,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<Traveler>, AppError> {
    let traveler = current_traveler(&state, &claims).await?;

    let updated = state
        .traveler_repo
        .update_profile(
            traveler.id,
            ProfileChanges {
                name: req.name,
                bio: req.bio,
                gender: req.gender,
                interests: req.interests,
                address: req.address,
                visited_countries: req.visited_countries,
                profile_photo: req.profile_photo,
            },
        )
        .await?;

    Ok(Json(updated))
}
