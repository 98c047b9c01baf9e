use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tripmate_core::models::{NewTraveler, Traveler};
use tripmate_shared::models::{Gender, UserStatus};

use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub password: String,
    pub name: String,
    pub email: String,
    pub bio: Option<String>,
    pub gender: Option<Gender>,
    #[serde(default)]
    pub interests: Vec<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub visited_countries: Vec<String>,
    pub profile_photo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<Traveler>, AppError> {
    if state
        .traveler_repo
        .find_user_by_email(&req.email)
        .await?
        .is_some()
    {
        return Err(AppError::ValidationError(
            "Email already registered".to_string(),
        ));
    }

    let password_hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalServerError(format!("Password hashing failed: {}", e)))?;

    let traveler = state
        .traveler_repo
        .create_with_user(
            &password_hash,
            NewTraveler {
                name: req.name,
                email: req.email,
                bio: req.bio,
                gender: req.gender,
                interests: req.interests,
                address: req.address,
                visited_countries: req.visited_countries,
                profile_photo: req.profile_photo,
            },
        )
        .await?;

    tracing::info!("Registered traveler {}", traveler.email);

    Ok(Json(traveler))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = state
        .traveler_repo
        .find_user_by_email(&req.email)
        .await?
        .ok_or_else(|| AppError::AuthenticationError("Invalid email or password".to_string()))?;

    if user.status != UserStatus::Active {
        return Err(AppError::AuthorizationError("Account is blocked".to_string()));
    }

    let valid = bcrypt::verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::InternalServerError(format!("Password check failed: {}", e)))?;
    if !valid {
        return Err(AppError::AuthenticationError(
            "Invalid email or password".to_string(),
        ));
    }

    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email,
        role: user.role.as_str().to_string(),
        exp: (Utc::now() + Duration::seconds(state.auth.expiration as i64)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))?;

    Ok(Json(AuthResponse { token }))
}
