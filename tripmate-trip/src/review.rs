use tripmate_core::error::{Error, Result};
use tripmate_core::models::TravelPlan;
use tripmate_shared::models::PlanStatus;
use uuid::Uuid;

pub fn validate_rating(rating: i32) -> Result<()> {
    if !(1..=5).contains(&rating) {
        return Err(Error::bad_request("Rating must be between 1 and 5"));
    }
    Ok(())
}

/// A review is allowed once per (reviewer, reviewee, plan) after the trip
/// completed, between two distinct participants of that trip. Participants are
/// the plan owner and every ACCEPTED requester.
pub fn guard_review(
    plan: &TravelPlan,
    accepted_requesters: &[Uuid],
    reviewer_id: Uuid,
    reviewee_id: Uuid,
    already_reviewed: bool,
) -> Result<()> {
    if plan.status != PlanStatus::Completed {
        return Err(Error::bad_request(
            "Trip is not completed. Review cannot be submitted.",
        ));
    }

    let is_participant =
        |id: Uuid| plan.traveler_id == id || accepted_requesters.contains(&id);

    if !is_participant(reviewer_id) {
        return Err(Error::forbidden("You were not part of this trip"));
    }
    if !is_participant(reviewee_id) {
        return Err(Error::bad_request("This person was not on this trip"));
    }
    if reviewer_id == reviewee_id {
        return Err(Error::bad_request("You cannot review yourself"));
    }
    if already_reviewed {
        return Err(Error::bad_request("You have already reviewed this person"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use tripmate_shared::models::TravelType;

    fn plan(owner: Uuid, status: PlanStatus) -> TravelPlan {
        TravelPlan {
            id: Uuid::new_v4(),
            traveler_id: owner,
            destination: "Patagonia".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(),
            budget: 2500,
            travel_type: TravelType::Adventure,
            itinerary: None,
            description: None,
            status,
            is_deleted: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_review_requires_completed_plan() {
        let owner = Uuid::new_v4();
        let buddy = Uuid::new_v4();
        let p = plan(owner, PlanStatus::Ongoing);
        let err = guard_review(&p, &[buddy], buddy, owner, false).unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));

        // Same review goes through once the trip completes.
        let p = plan(owner, PlanStatus::Completed);
        guard_review(&p, &[buddy], buddy, owner, false).unwrap();
    }

    #[test]
    fn test_duplicate_review_rejected() {
        let owner = Uuid::new_v4();
        let buddy = Uuid::new_v4();
        let p = plan(owner, PlanStatus::Completed);
        let err = guard_review(&p, &[buddy], buddy, owner, true).unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[test]
    fn test_outsider_cannot_review() {
        let owner = Uuid::new_v4();
        let p = plan(owner, PlanStatus::Completed);
        let err = guard_review(&p, &[], Uuid::new_v4(), owner, false).unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[test]
    fn test_reviewee_must_be_participant() {
        let owner = Uuid::new_v4();
        let p = plan(owner, PlanStatus::Completed);
        let err = guard_review(&p, &[], owner, Uuid::new_v4(), false).unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[test]
    fn test_self_review_rejected() {
        let owner = Uuid::new_v4();
        let p = plan(owner, PlanStatus::Completed);
        let err = guard_review(&p, &[], owner, owner, false).unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[test]
    fn test_rating_bounds() {
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
    }
}
