use chrono::NaiveDate;
use tripmate_core::error::{Error, Result};
use tripmate_core::models::TravelPlan;
use tripmate_shared::models::PlanStatus;
use uuid::Uuid;

/// PENDING -> ONGOING -> COMPLETED, no other transitions. Soft-delete is an
/// orthogonal flag, not a state.

pub fn validate_dates(start_date: NaiveDate, end_date: NaiveDate) -> Result<()> {
    if start_date > end_date {
        return Err(Error::bad_request(
            "Start date must be on or before end date",
        ));
    }
    Ok(())
}

pub fn ensure_owner(plan: &TravelPlan, traveler_id: Uuid, action: &str) -> Result<()> {
    if plan.traveler_id != traveler_id {
        return Err(Error::forbidden(format!(
            "You can only {} your own plans",
            action
        )));
    }
    Ok(())
}

/// Owner-only, PENDING-only, and never before the plan's start date.
pub fn guard_start(plan: &TravelPlan, traveler_id: Uuid, today: NaiveDate) -> Result<()> {
    ensure_owner(plan, traveler_id, "start")?;
    if plan.status != PlanStatus::Pending {
        return Err(Error::bad_request("Plan is not pending"));
    }
    if today < plan.start_date {
        return Err(Error::bad_request("Cannot start plan before start date"));
    }
    Ok(())
}

/// Owner-only, ONGOING-only, and never before the plan's end date.
pub fn guard_complete(plan: &TravelPlan, traveler_id: Uuid, today: NaiveDate) -> Result<()> {
    ensure_owner(plan, traveler_id, "complete")?;
    if plan.status != PlanStatus::Ongoing {
        return Err(Error::bad_request("Plan is not ongoing"));
    }
    if today < plan.end_date {
        return Err(Error::bad_request("Cannot complete plan before end date"));
    }
    Ok(())
}
