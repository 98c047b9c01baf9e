use chrono::NaiveDate;
use tripmate_core::models::TravelPlan;

use crate::criteria::MatchCriteria;

const POINTS_PER_CRITERION: u32 = 20;
const MAX_SCORE: u32 = 100;

/// Inclusive interval intersection.
pub fn dates_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && a_end >= b_start
}

/// Additive 0-100 display score: five binary criteria worth 20 points each.
/// The score is re-derived per result and never decides which rows come back,
/// so a plan that slipped past the SQL filter on one axis still scores honestly.
pub fn match_score(criteria: &MatchCriteria, plan: &TravelPlan, owner_interests: &[String]) -> u8 {
    let mut score = 0u32;

    if let Some(destination) = &criteria.destination {
        if plan
            .destination
            .to_lowercase()
            .contains(&destination.to_lowercase())
        {
            score += POINTS_PER_CRITERION;
        }
    }

    if let Some(travel_type) = criteria.travel_type {
        if plan.travel_type == travel_type {
            score += POINTS_PER_CRITERION;
        }
    }

    // Both bounds must be present for the budget criterion to count.
    if let (Some(min), Some(max)) = (criteria.min_budget, criteria.max_budget) {
        if plan.budget >= min && plan.budget <= max {
            score += POINTS_PER_CRITERION;
        }
    }

    if let (Some(start), Some(end)) = (criteria.start_date, criteria.end_date) {
        if dates_overlap(plan.start_date, plan.end_date, start, end) {
            score += POINTS_PER_CRITERION;
        }
    }

    if !criteria.interests.is_empty()
        && owner_interests
            .iter()
            .any(|interest| criteria.interests.contains(interest))
    {
        score += POINTS_PER_CRITERION;
    }

    score.min(MAX_SCORE) as u8
}
