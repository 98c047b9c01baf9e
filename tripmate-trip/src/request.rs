use tripmate_core::error::{Error, Result};
use tripmate_core::models::TravelPlan;
use tripmate_shared::models::RequestStatus;
use uuid::Uuid;

/// PENDING -> ACCEPTED | REJECTED, both terminal.

/// A traveler may request to join a plan they do not own, once.
pub fn guard_send(plan: &TravelPlan, requester_id: Uuid, already_requested: bool) -> Result<()> {
    if plan.traveler_id == requester_id {
        return Err(Error::bad_request("Cannot request your own plan"));
    }
    if already_requested {
        return Err(Error::bad_request("Request already sent"));
    }
    Ok(())
}

pub fn ensure_plan_owner(plan: &TravelPlan, traveler_id: Uuid) -> Result<()> {
    if plan.traveler_id != traveler_id {
        return Err(Error::forbidden(
            "You can only update requests for your own plans",
        ));
    }
    Ok(())
}

/// Only the two terminal states are valid targets; re-marking a request as
/// PENDING is never allowed.
pub fn validate_target_status(status: RequestStatus) -> Result<()> {
    match status {
        RequestStatus::Accepted | RequestStatus::Rejected => Ok(()),
        RequestStatus::Pending => Err(Error::bad_request(
            "Request status must be ACCEPTED or REJECTED",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use tripmate_shared::models::{PlanStatus, TravelType};

    fn plan(owner: Uuid) -> TravelPlan {
        TravelPlan {
            id: Uuid::new_v4(),
            traveler_id: owner,
            destination: "Hanoi".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
            budget: 800,
            travel_type: TravelType::Adventure,
            itinerary: None,
            description: None,
            status: PlanStatus::Pending,
            is_deleted: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_cannot_request_own_plan() {
        let owner = Uuid::new_v4();
        let err = guard_send(&plan(owner), owner, false).unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[test]
    fn test_duplicate_request_rejected() {
        let p = plan(Uuid::new_v4());
        let requester = Uuid::new_v4();
        guard_send(&p, requester, false).unwrap();
        let err = guard_send(&p, requester, true).unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[test]
    fn test_only_owner_may_transition() {
        let p = plan(Uuid::new_v4());
        let err = ensure_plan_owner(&p, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
        ensure_plan_owner(&p, p.traveler_id).unwrap();
    }

    #[test]
    fn test_pending_is_not_a_valid_target() {
        assert!(validate_target_status(RequestStatus::Pending).is_err());
        assert!(validate_target_status(RequestStatus::Accepted).is_ok());
        assert!(validate_target_status(RequestStatus::Rejected).is_ok());
    }
}
