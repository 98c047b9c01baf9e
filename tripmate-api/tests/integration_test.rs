use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use tripmate_api::error::AppError;
use tripmate_api::middleware::auth::{Claims, ROLE_TRAVELER};

const SECRET: &str = "integration-test-secret";

fn make_token(claims: &Claims) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

#[test]
fn test_jwt_round_trip() {
    let claims = Claims {
        sub: "5f0d7e0a-1f37-4bb1-9f53-6e8dfc6a1b0e".to_string(),
        email: "nadia@example.com".to_string(),
        role: ROLE_TRAVELER.to_string(),
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
    };

    let token = make_token(&claims);
    let decoded = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(SECRET.as_bytes()),
        &Validation::default(),
    )
    .unwrap()
    .claims;

    assert_eq!(decoded.sub, claims.sub);
    assert_eq!(decoded.email, claims.email);
    assert_eq!(decoded.role, ROLE_TRAVELER);
}

#[test]
fn test_expired_token_rejected() {
    let claims = Claims {
        sub: "5f0d7e0a-1f37-4bb1-9f53-6e8dfc6a1b0e".to_string(),
        email: "nadia@example.com".to_string(),
        role: ROLE_TRAVELER.to_string(),
        exp: (Utc::now() - Duration::hours(1)).timestamp() as usize,
    };

    let token = make_token(&claims);
    let result = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(SECRET.as_bytes()),
        &Validation::default(),
    );

    assert!(result.is_err());
}

#[test]
fn test_token_with_wrong_secret_rejected() {
    let claims = Claims {
        sub: "5f0d7e0a-1f37-4bb1-9f53-6e8dfc6a1b0e".to_string(),
        email: "nadia@example.com".to_string(),
        role: ROLE_TRAVELER.to_string(),
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
    };

    let token = make_token(&claims);
    let result = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(b"another-secret"),
        &Validation::default(),
    );

    assert!(result.is_err());
}

#[test]
fn test_error_status_codes() {
    let cases = [
        (
            AppError::AuthenticationError("no token".into()),
            StatusCode::UNAUTHORIZED,
        ),
        (
            AppError::AuthorizationError("not yours".into()),
            StatusCode::FORBIDDEN,
        ),
        (
            AppError::ValidationError("bad dates".into()),
            StatusCode::BAD_REQUEST,
        ),
        (
            AppError::NotFoundError("no such plan".into()),
            StatusCode::NOT_FOUND,
        ),
        (
            AppError::InternalServerError("db down".into()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (err, expected) in cases {
        assert_eq!(err.into_response().status(), expected);
    }
}

#[test]
fn test_domain_errors_map_to_http_statuses() {
    use tripmate_core::Error;

    let mapped: AppError = Error::not_found("Plan not found").into();
    assert_eq!(mapped.into_response().status(), StatusCode::NOT_FOUND);

    let mapped: AppError = Error::forbidden("You can only update your own plans").into();
    assert_eq!(mapped.into_response().status(), StatusCode::FORBIDDEN);

    let mapped: AppError = Error::bad_request("End date must be after start date").into();
    assert_eq!(mapped.into_response().status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_internal_error_body_is_redacted() {
    let response = AppError::InternalServerError("connection refused at 10.0.0.3".into());
    let body = response.into_response();
    assert_eq!(body.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
