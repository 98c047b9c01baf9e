use std::sync::Arc;
use tripmate_core::repository::{
    PlanRepository, RequestRepository, ReviewRepository, TravelerRepository,
};
use tripmate_match::MatchRepository;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub plan_repo: Arc<dyn PlanRepository>,
    pub match_repo: Arc<dyn MatchRepository>,
    pub request_repo: Arc<dyn RequestRepository>,
    pub review_repo: Arc<dyn ReviewRepository>,
    pub traveler_repo: Arc<dyn TravelerRepository>,
    pub auth: AuthConfig,
}
