use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tripmate_shared::models::{Gender, PlanStatus, RequestStatus, TravelType, UserRole, UserStatus};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct TravelPlan {
    pub id: Uuid,
    pub traveler_id: Uuid,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: i32,
    pub travel_type: TravelType,
    pub itinerary: Option<String>,
    pub description: Option<String>,
    pub status: PlanStatus,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTravelPlan {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: i32,
    pub travel_type: TravelType,
    pub itinerary: Option<String>,
    pub description: Option<String>,
}

/// Partial update for a plan; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct PlanChanges {
    pub destination: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<i32>,
    pub travel_type: Option<TravelType>,
    pub itinerary: Option<String>,
    pub description: Option<String>,
}

impl PlanChanges {
    pub fn is_empty(&self) -> bool {
        self.destination.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.budget.is_none()
            && self.travel_type.is_none()
            && self.itinerary.is_none()
            && self.description.is_none()
    }
}

/// Sortable plan columns. Unknown sort keys are rejected at deserialization
/// instead of being spliced into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanSortField {
    CreatedAt,
    StartDate,
    EndDate,
    Budget,
    Destination,
}

impl PlanSortField {
    pub fn as_sql(&self) -> &'static str {
        match self {
            PlanSortField::CreatedAt => "created_at",
            PlanSortField::StartDate => "start_date",
            PlanSortField::EndDate => "end_date",
            PlanSortField::Budget => "budget",
            PlanSortField::Destination => "destination",
        }
    }
}

impl Default for PlanSortField {
    fn default() -> Self {
        PlanSortField::CreatedAt
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Traveler {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub bio: Option<String>,
    pub gender: Option<Gender>,
    pub interests: Vec<String>,
    pub address: Option<String>,
    pub visited_countries: Vec<String>,
    pub profile_photo: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The public slice of a traveler profile embedded in listings.
#[derive(Debug, Clone, Serialize)]
pub struct TravelerSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub bio: Option<String>,
    pub gender: Option<Gender>,
    pub interests: Vec<String>,
    pub visited_countries: Vec<String>,
    pub profile_photo: Option<String>,
    pub is_verified: bool,
}

impl From<Traveler> for TravelerSummary {
    fn from(t: Traveler) -> Self {
        Self {
            id: t.id,
            name: t.name,
            email: t.email,
            bio: t.bio,
            gender: t.gender,
            interests: t.interests,
            visited_countries: t.visited_countries,
            profile_photo: t.profile_photo,
            is_verified: t.is_verified,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewTraveler {
    pub name: String,
    pub email: String,
    pub bio: Option<String>,
    pub gender: Option<Gender>,
    pub interests: Vec<String>,
    pub address: Option<String>,
    pub visited_countries: Vec<String>,
    pub profile_photo: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub gender: Option<Gender>,
    pub interests: Option<Vec<String>>,
    pub address: Option<String>,
    pub visited_countries: Option<Vec<String>>,
    pub profile_photo: Option<String>,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TravelBuddyRequest {
    pub id: Uuid,
    pub travel_plan_id: Uuid,
    pub requester_id: Uuid,
    pub message: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestWithRequester {
    #[serde(flatten)]
    pub request: TravelBuddyRequest,
    pub requester: TravelerSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentRequest {
    #[serde(flatten)]
    pub request: TravelBuddyRequest,
    pub travel_plan: TravelPlan,
}

#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewee_id: Uuid,
    pub travel_plan_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub reviewer_id: Uuid,
    pub reviewee_id: Uuid,
    pub travel_plan_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
}

/// Aggregate review standing of a plan owner, shown alongside every match.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HostRating {
    pub avg_rating: f64,
    pub total_reviews: i64,
}

impl Default for HostRating {
    fn default() -> Self {
        Self {
            avg_rating: 0.0,
            total_reviews: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanWithOwner {
    #[serde(flatten)]
    pub plan: TravelPlan,
    pub traveler: TravelerSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanWithRequestCount {
    #[serde(flatten)]
    pub plan: TravelPlan,
    pub buddy_requests_count: i64,
}
