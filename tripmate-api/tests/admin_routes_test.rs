//! The admin surface end to end: only an ADMIN token passes the admin
//! router's middleware, and the moderation endpoint flips a user's status.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, NaiveDate, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use tower::ServiceExt;
use uuid::Uuid;

use tripmate_api::app;
use tripmate_api::middleware::auth::{Claims, ROLE_ADMIN, ROLE_TRAVELER};
use tripmate_api::state::{AppState, AuthConfig};
use tripmate_core::error::{Error, Result};
use tripmate_core::models::{
    HostRating, NewReview, NewTravelPlan, NewTraveler, PlanChanges, PlanSortField, PlanWithOwner,
    PlanWithRequestCount, ProfileChanges, RequestWithRequester, Review, SentRequest,
    TravelBuddyRequest, TravelPlan, Traveler, User,
};
use tripmate_core::repository::{
    PlanListFilter, PlanRepository, RequestRepository, ReviewRepository, TravelerRepository,
};
use tripmate_match::{MatchCriteria, MatchRepository};
use tripmate_shared::models::{PlanStatus, RequestStatus, TravelType, UserRole, UserStatus};
use tripmate_shared::pagination::PageOptions;

const SECRET: &str = "admin-routes-test-secret";

fn not_wired<T>() -> Result<T> {
    Err(Error::store("not wired in this test"))
}

fn owner_id() -> Uuid {
    Uuid::from_u128(0x11)
}

fn plan_id() -> Uuid {
    Uuid::from_u128(0x22)
}

fn fixture_plan() -> TravelPlan {
    TravelPlan {
        id: plan_id(),
        traveler_id: owner_id(),
        destination: "Lisbon".to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
        budget: 900,
        travel_type: TravelType::Leisure,
        itinerary: None,
        description: None,
        status: PlanStatus::Pending,
        is_deleted: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn fixture_traveler() -> Traveler {
    Traveler {
        id: owner_id(),
        name: "Dana".to_string(),
        email: "dana@example.com".to_string(),
        bio: None,
        gender: None,
        interests: vec![],
        address: None,
        visited_countries: vec![],
        profile_photo: None,
        is_verified: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

struct StubPlanRepo;

#[async_trait]
impl PlanRepository for StubPlanRepo {
    async fn create(&self, _: Uuid, _: NewTravelPlan) -> Result<TravelPlan> {
        not_wired()
    }
    async fn find_active(&self, _: Uuid) -> Result<Option<TravelPlan>> {
        not_wired()
    }
    async fn find_any(&self, id: Uuid) -> Result<Option<TravelPlan>> {
        Ok((id == plan_id()).then(fixture_plan))
    }
    async fn list(
        &self,
        _: &PlanListFilter,
        _: PlanSortField,
        _: &PageOptions,
    ) -> Result<(Vec<PlanWithOwner>, i64)> {
        not_wired()
    }
    async fn list_for_owner(
        &self,
        _: Uuid,
        _: &PlanListFilter,
        _: PlanSortField,
        _: &PageOptions,
    ) -> Result<(Vec<PlanWithRequestCount>, i64)> {
        not_wired()
    }
    async fn update(&self, _: Uuid, _: PlanChanges) -> Result<TravelPlan> {
        not_wired()
    }
    async fn set_status(&self, _: Uuid, _: PlanStatus) -> Result<TravelPlan> {
        not_wired()
    }
    async fn set_deleted(&self, _: Uuid) -> Result<TravelPlan> {
        not_wired()
    }
    async fn hard_delete(&self, _: Uuid) -> Result<()> {
        not_wired()
    }
    async fn count_for_owner(&self, _: Uuid) -> Result<i64> {
        Ok(3)
    }
    async fn start_due(&self, _: NaiveDate) -> Result<u64> {
        not_wired()
    }
    async fn complete_due(&self, _: NaiveDate) -> Result<u64> {
        not_wired()
    }
}

#[async_trait]
impl MatchRepository for StubPlanRepo {
    async fn list_matched(
        &self,
        _: &MatchCriteria,
        _: PlanSortField,
        _: &PageOptions,
    ) -> Result<(Vec<PlanWithOwner>, i64)> {
        not_wired()
    }
}

struct StubRequestRepo;

#[async_trait]
impl RequestRepository for StubRequestRepo {
    async fn create(&self, _: Uuid, _: Uuid, _: Option<String>) -> Result<TravelBuddyRequest> {
        not_wired()
    }
    async fn find(&self, _: Uuid) -> Result<Option<TravelBuddyRequest>> {
        not_wired()
    }
    async fn exists_for(&self, _: Uuid, _: Uuid) -> Result<bool> {
        not_wired()
    }
    async fn list_for_plan(
        &self,
        _: Uuid,
        _: Option<RequestStatus>,
        _: &PageOptions,
    ) -> Result<(Vec<RequestWithRequester>, i64)> {
        not_wired()
    }
    async fn list_sent(
        &self,
        _: Uuid,
        _: Option<RequestStatus>,
        _: &PageOptions,
    ) -> Result<(Vec<SentRequest>, i64)> {
        not_wired()
    }
    async fn transition_if_pending(
        &self,
        _: Uuid,
        _: RequestStatus,
    ) -> Result<Option<TravelBuddyRequest>> {
        not_wired()
    }
    async fn accepted_requester_ids(&self, _: Uuid) -> Result<Vec<Uuid>> {
        not_wired()
    }
}

struct StubReviewRepo;

#[async_trait]
impl ReviewRepository for StubReviewRepo {
    async fn create(&self, _: NewReview) -> Result<Review> {
        not_wired()
    }
    async fn exists(&self, _: Uuid, _: Uuid, _: Uuid) -> Result<bool> {
        not_wired()
    }
    async fn list_for_reviewee(&self, _: Uuid) -> Result<Vec<Review>> {
        not_wired()
    }
    async fn list_for_plan(&self, _: Uuid) -> Result<Vec<Review>> {
        not_wired()
    }
    async fn summary_for(&self, _: Uuid) -> Result<HostRating> {
        not_wired()
    }
    async fn summaries_for(&self, _: &[Uuid]) -> Result<HashMap<Uuid, HostRating>> {
        not_wired()
    }
}

struct StubTravelerRepo;

#[async_trait]
impl TravelerRepository for StubTravelerRepo {
    async fn find_by_email(&self, _: &str) -> Result<Option<Traveler>> {
        not_wired()
    }
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Traveler>> {
        Ok((id == owner_id()).then(fixture_traveler))
    }
    async fn find_user_by_email(&self, _: &str) -> Result<Option<User>> {
        not_wired()
    }
    async fn create_with_user(&self, _: &str, _: NewTraveler) -> Result<Traveler> {
        not_wired()
    }
    async fn update_profile(&self, _: Uuid, _: ProfileChanges) -> Result<Traveler> {
        not_wired()
    }
    async fn create_admin_if_absent(&self, _: &str, _: &str) -> Result<bool> {
        not_wired()
    }
    async fn set_user_status(&self, id: Uuid, status: UserStatus) -> Result<User> {
        Ok(User {
            id,
            email: "dana@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::Traveler,
            status,
            created_at: Utc::now(),
        })
    }
}

fn test_state() -> AppState {
    let plan_repo = Arc::new(StubPlanRepo);
    AppState {
        plan_repo: plan_repo.clone(),
        match_repo: plan_repo,
        request_repo: Arc::new(StubRequestRepo),
        review_repo: Arc::new(StubReviewRepo),
        traveler_repo: Arc::new(StubTravelerRepo),
        auth: AuthConfig {
            secret: SECRET.to_string(),
            expiration: 3600,
        },
    }
}

fn token(role: &str) -> String {
    let claims = Claims {
        sub: Uuid::from_u128(0x33).to_string(),
        email: "admin@tripmate.local".to_string(),
        role: role.to_string(),
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn block_request(auth_header: Option<String>) -> Request<Body> {
    let uri = format!("/v1/admin/users/{}/status", owner_id());
    let mut builder = Request::builder()
        .method("PATCH")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(value) = auth_header {
        builder = builder.header("Authorization", value);
    }
    builder
        .body(Body::from(r#"{"status":"BLOCKED"}"#))
        .unwrap()
}

#[tokio::test]
async fn test_admin_routes_reject_missing_token() {
    let response = app(test_state()).oneshot(block_request(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_reject_traveler_token() {
    let header = format!("Bearer {}", token(ROLE_TRAVELER));
    let response = app(test_state())
        .oneshot(block_request(Some(header)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_can_block_user() {
    let header = format!("Bearer {}", token(ROLE_ADMIN));
    let response = app(test_state())
        .oneshot(block_request(Some(header)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "BLOCKED");
    assert_eq!(json["email"], "dana@example.com");
}

#[tokio::test]
async fn test_admin_plan_detail_includes_soft_deleted() {
    let header = format!("Bearer {}", token(ROLE_ADMIN));
    let request = Request::builder()
        .method("GET")
        .uri(format!("/v1/admin/plans/{}", plan_id()))
        .header("Authorization", header)
        .body(Body::empty())
        .unwrap();

    let response = app(test_state()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["is_deleted"], true);
    assert_eq!(json["traveler_plan_count"], 3);
    assert_eq!(json["traveler"]["name"], "Dana");
}
