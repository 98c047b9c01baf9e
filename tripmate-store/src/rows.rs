//! Row structs for type-safe querying, plus conversions into domain models.
//! Enum columns are stored as TEXT; a value that fails to parse is surfaced as
//! a store error rather than silently defaulted.

use chrono::{DateTime, NaiveDate, Utc};
use tripmate_core::error::Error;
use tripmate_core::models::{
    Review, TravelBuddyRequest, TravelPlan, Traveler, TravelerSummary, User,
};
use uuid::Uuid;

fn parse_enum<T: std::str::FromStr<Err = String>>(value: &str) -> Result<T, Error> {
    value.parse::<T>().map_err(Error::store)
}

#[derive(sqlx::FromRow)]
pub struct PlanRow {
    pub id: Uuid,
    pub traveler_id: Uuid,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: i32,
    pub travel_type: String,
    pub itinerary: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PlanRow> for TravelPlan {
    type Error = Error;

    fn try_from(row: PlanRow) -> Result<Self, Error> {
        Ok(TravelPlan {
            id: row.id,
            traveler_id: row.traveler_id,
            destination: row.destination,
            start_date: row.start_date,
            end_date: row.end_date,
            budget: row.budget,
            travel_type: parse_enum(&row.travel_type)?,
            itinerary: row.itinerary,
            description: row.description,
            status: parse_enum(&row.status)?,
            is_deleted: row.is_deleted,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Traveler profile columns joined onto another row, aliased `owner_*`.
#[derive(sqlx::FromRow)]
pub struct TravelerSummaryRow {
    pub owner_id: Uuid,
    pub owner_name: String,
    pub owner_email: String,
    pub owner_bio: Option<String>,
    pub owner_gender: Option<String>,
    pub owner_interests: Vec<String>,
    pub owner_visited_countries: Vec<String>,
    pub owner_profile_photo: Option<String>,
    pub owner_is_verified: bool,
}

impl TravelerSummaryRow {
    pub fn summary(&self) -> Result<TravelerSummary, Error> {
        Ok(TravelerSummary {
            id: self.owner_id,
            name: self.owner_name.clone(),
            email: self.owner_email.clone(),
            bio: self.owner_bio.clone(),
            gender: self
                .owner_gender
                .as_deref()
                .map(parse_enum)
                .transpose()?,
            interests: self.owner_interests.clone(),
            visited_countries: self.owner_visited_countries.clone(),
            profile_photo: self.owner_profile_photo.clone(),
            is_verified: self.owner_is_verified,
        })
    }
}

#[derive(sqlx::FromRow)]
pub struct PlanOwnerRow {
    #[sqlx(flatten)]
    pub plan: PlanRow,
    #[sqlx(flatten)]
    pub owner: TravelerSummaryRow,
}

#[derive(sqlx::FromRow)]
pub struct PlanRequestCountRow {
    #[sqlx(flatten)]
    pub plan: PlanRow,
    pub buddy_requests_count: i64,
}

#[derive(sqlx::FromRow)]
pub struct TravelerRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub bio: Option<String>,
    pub gender: Option<String>,
    pub interests: Vec<String>,
    pub address: Option<String>,
    pub visited_countries: Vec<String>,
    pub profile_photo: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TravelerRow> for Traveler {
    type Error = Error;

    fn try_from(row: TravelerRow) -> Result<Self, Error> {
        Ok(Traveler {
            id: row.id,
            name: row.name,
            email: row.email,
            bio: row.bio,
            gender: row.gender.as_deref().map(parse_enum).transpose()?,
            interests: row.interests,
            address: row.address,
            visited_countries: row.visited_countries,
            profile_photo: row.profile_photo,
            is_verified: row.is_verified,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = Error;

    fn try_from(row: UserRow) -> Result<Self, Error> {
        Ok(User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            role: parse_enum(&row.role)?,
            status: parse_enum(&row.status)?,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub struct RequestRow {
    pub id: Uuid,
    pub travel_plan_id: Uuid,
    pub requester_id: Uuid,
    pub message: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<RequestRow> for TravelBuddyRequest {
    type Error = Error;

    fn try_from(row: RequestRow) -> Result<Self, Error> {
        Ok(TravelBuddyRequest {
            id: row.id,
            travel_plan_id: row.travel_plan_id,
            requester_id: row.requester_id,
            message: row.message,
            status: parse_enum(&row.status)?,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub struct ReviewRow {
    pub id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewee_id: Uuid,
    pub travel_plan_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: row.id,
            reviewer_id: row.reviewer_id,
            reviewee_id: row.reviewee_id,
            travel_plan_id: row.travel_plan_id,
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}
