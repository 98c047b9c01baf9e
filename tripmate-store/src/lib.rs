pub mod app_config;
pub mod database;
pub mod plan_repo;
pub mod request_repo;
pub mod review_repo;
pub mod traveler_repo;

mod rows;

pub use database::DbClient;
pub use plan_repo::PgPlanRepository;
pub use request_repo::PgRequestRepository;
pub use review_repo::PgReviewRepository;
pub use traveler_repo::PgTravelerRepository;
