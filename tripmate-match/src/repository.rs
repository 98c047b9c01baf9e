use async_trait::async_trait;
use tripmate_core::error::Result;
use tripmate_core::models::{PlanSortField, PlanWithOwner};
use tripmate_shared::pagination::PageOptions;

use crate::criteria::MatchCriteria;

/// Store-side half of the matching engine: translates the criteria into a
/// filtered, paginated plan query. Scoring happens in memory afterwards and
/// never changes which rows are returned.
#[async_trait]
pub trait MatchRepository: Send + Sync {
    async fn list_matched(
        &self,
        criteria: &MatchCriteria,
        sort_by: PlanSortField,
        options: &PageOptions,
    ) -> Result<(Vec<PlanWithOwner>, i64)>;
}
