pub mod criteria;
pub mod repository;
pub mod score;

pub use criteria::MatchCriteria;
pub use repository::MatchRepository;
pub use score::{dates_overlap, match_score};
