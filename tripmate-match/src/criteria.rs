use chrono::NaiveDate;
use tripmate_shared::models::TravelType;

/// Filter criteria for the plan matcher. All supplied criteria are applied
/// conjunctively; an absent criterion is unconstrained. Soft-deleted plans are
/// excluded unconditionally.
#[derive(Debug, Clone, Default)]
pub struct MatchCriteria {
    /// Case-insensitive substring of the plan destination.
    pub destination: Option<String>,
    pub travel_type: Option<TravelType>,
    pub min_budget: Option<i32>,
    pub max_budget: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Kept when the plan owner's interest list intersects this one.
    pub interests: Vec<String>,
}
