use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use tripmate_shared::models::{PlanStatus, RequestStatus, TravelType, UserStatus};
use tripmate_shared::pagination::PageOptions;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    HostRating, NewReview, NewTravelPlan, NewTraveler, PlanChanges, PlanSortField, PlanWithOwner,
    PlanWithRequestCount, ProfileChanges, Review, TravelBuddyRequest, TravelPlan, Traveler,
    RequestWithRequester, SentRequest, User,
};

/// Simple conjunctive filter for public/owner plan listings.
#[derive(Debug, Clone, Default)]
pub struct PlanListFilter {
    /// Case-insensitive substring over destination, itinerary and description.
    pub search_term: Option<String>,
    pub travel_type: Option<TravelType>,
    pub status: Option<PlanStatus>,
}

/// Repository trait for travel plan persistence
#[async_trait]
pub trait PlanRepository: Send + Sync {
    async fn create(&self, traveler_id: Uuid, plan: NewTravelPlan) -> Result<TravelPlan>;

    /// Find a plan that has not been soft-deleted.
    async fn find_active(&self, id: Uuid) -> Result<Option<TravelPlan>>;

    /// Find a plan regardless of its soft-delete flag (admin paths).
    async fn find_any(&self, id: Uuid) -> Result<Option<TravelPlan>>;

    async fn list(
        &self,
        filter: &PlanListFilter,
        sort_by: PlanSortField,
        options: &PageOptions,
    ) -> Result<(Vec<PlanWithOwner>, i64)>;

    async fn list_for_owner(
        &self,
        traveler_id: Uuid,
        filter: &PlanListFilter,
        sort_by: PlanSortField,
        options: &PageOptions,
    ) -> Result<(Vec<PlanWithRequestCount>, i64)>;

    async fn update(&self, id: Uuid, changes: PlanChanges) -> Result<TravelPlan>;

    async fn set_status(&self, id: Uuid, status: PlanStatus) -> Result<TravelPlan>;

    async fn set_deleted(&self, id: Uuid) -> Result<TravelPlan>;

    async fn hard_delete(&self, id: Uuid) -> Result<()>;

    async fn count_for_owner(&self, traveler_id: Uuid) -> Result<i64>;

    /// Bulk-start every non-deleted PENDING plan whose start date has passed.
    /// Returns the number of rows transitioned.
    async fn start_due(&self, today: NaiveDate) -> Result<u64>;

    /// Bulk-complete every non-deleted ONGOING plan whose end date has passed.
    async fn complete_due(&self, today: NaiveDate) -> Result<u64>;
}

/// Repository trait for buddy request persistence
#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn create(
        &self,
        travel_plan_id: Uuid,
        requester_id: Uuid,
        message: Option<String>,
    ) -> Result<TravelBuddyRequest>;

    async fn find(&self, id: Uuid) -> Result<Option<TravelBuddyRequest>>;

    async fn exists_for(&self, travel_plan_id: Uuid, requester_id: Uuid) -> Result<bool>;

    async fn list_for_plan(
        &self,
        travel_plan_id: Uuid,
        status: Option<RequestStatus>,
        options: &PageOptions,
    ) -> Result<(Vec<RequestWithRequester>, i64)>;

    async fn list_sent(
        &self,
        requester_id: Uuid,
        status: Option<RequestStatus>,
        options: &PageOptions,
    ) -> Result<(Vec<SentRequest>, i64)>;

    /// Single conditional update: the row is only touched while still PENDING,
    /// closing the race between two concurrent accept/reject calls.
    async fn transition_if_pending(
        &self,
        id: Uuid,
        status: RequestStatus,
    ) -> Result<Option<TravelBuddyRequest>>;

    async fn accepted_requester_ids(&self, travel_plan_id: Uuid) -> Result<Vec<Uuid>>;
}

/// Repository trait for reviews
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create(&self, review: NewReview) -> Result<Review>;

    async fn exists(
        &self,
        reviewer_id: Uuid,
        reviewee_id: Uuid,
        travel_plan_id: Uuid,
    ) -> Result<bool>;

    async fn list_for_reviewee(&self, reviewee_id: Uuid) -> Result<Vec<Review>>;

    async fn list_for_plan(&self, travel_plan_id: Uuid) -> Result<Vec<Review>>;

    async fn summary_for(&self, traveler_id: Uuid) -> Result<HostRating>;

    async fn summaries_for(&self, traveler_ids: &[Uuid]) -> Result<HashMap<Uuid, HostRating>>;
}

/// Repository trait for identity and profiles
#[async_trait]
pub trait TravelerRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Traveler>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Traveler>>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Insert the credential row and the profile row in one transaction.
    async fn create_with_user(&self, password_hash: &str, profile: NewTraveler)
        -> Result<Traveler>;

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<Traveler>;

    /// Startup seed: insert an ADMIN credential row unless the email is
    /// already taken. Returns true when a row was inserted.
    async fn create_admin_if_absent(&self, email: &str, password_hash: &str) -> Result<bool>;

    /// Admin moderation: block or unblock a user account.
    async fn set_user_status(&self, id: Uuid, status: UserStatus) -> Result<User>;
}
