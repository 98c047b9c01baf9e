//! Lifecycle rules for travel plans, buddy requests and reviews.
//!
//! Every guard is a pure function over the entity and the acting traveler
//! (plus `today` where a temporal rule applies), so the state machines are
//! unit-testable without a store. Handlers run a guard, then perform a single
//! write; the PENDING-only request transition is additionally enforced in the
//! store's conditional update.

pub mod plan;
pub mod request;
pub mod review;
