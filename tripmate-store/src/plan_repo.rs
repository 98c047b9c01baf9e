use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use tripmate_core::error::{Error, Result};
use tripmate_core::models::{
    NewTravelPlan, PlanChanges, PlanSortField, PlanWithOwner, PlanWithRequestCount, TravelPlan,
};
use tripmate_core::repository::{PlanListFilter, PlanRepository};
use tripmate_match::{MatchCriteria, MatchRepository};
use tripmate_shared::models::PlanStatus;
use tripmate_shared::pagination::PageOptions;

use crate::rows::{PlanOwnerRow, PlanRequestCountRow, PlanRow};

const SELECT_PLAN_WITH_OWNER: &str = "SELECT p.id, p.traveler_id, p.destination, p.start_date, \
     p.end_date, p.budget, p.travel_type, p.itinerary, p.description, p.status, p.is_deleted, \
     p.created_at, p.updated_at, \
     t.id AS owner_id, t.name AS owner_name, t.email AS owner_email, t.bio AS owner_bio, \
     t.gender AS owner_gender, t.interests AS owner_interests, \
     t.visited_countries AS owner_visited_countries, t.profile_photo AS owner_profile_photo, \
     t.is_verified AS owner_is_verified \
     FROM travel_plans p JOIN travelers t ON t.id = p.traveler_id \
     WHERE p.is_deleted = FALSE";

const COUNT_PLAN_WITH_OWNER: &str = "SELECT COUNT(*) \
     FROM travel_plans p JOIN travelers t ON t.id = p.traveler_id \
     WHERE p.is_deleted = FALSE";

pub struct PgPlanRepository {
    pool: PgPool,
}

impl PgPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Appends the conjunctive matcher predicates. Every predicate is bound, never
/// spliced; the only raw fragments are fixed column names.
fn push_match_filters(qb: &mut QueryBuilder<'_, Postgres>, criteria: &MatchCriteria) {
    if let Some(destination) = &criteria.destination {
        qb.push(" AND p.destination ILIKE ");
        qb.push_bind(format!("%{}%", destination));
    }
    if let Some(travel_type) = criteria.travel_type {
        qb.push(" AND p.travel_type = ");
        qb.push_bind(travel_type.as_str());
    }
    if let Some(min) = criteria.min_budget {
        qb.push(" AND p.budget >= ");
        qb.push_bind(min);
    }
    if let Some(max) = criteria.max_budget {
        qb.push(" AND p.budget <= ");
        qb.push_bind(max);
    }
    // Both bounds: interval intersection. One bound: open-ended on that side.
    match (criteria.start_date, criteria.end_date) {
        (Some(start), Some(end)) => {
            qb.push(" AND p.start_date <= ");
            qb.push_bind(end);
            qb.push(" AND p.end_date >= ");
            qb.push_bind(start);
        }
        (Some(start), None) => {
            qb.push(" AND p.end_date >= ");
            qb.push_bind(start);
        }
        (None, Some(end)) => {
            qb.push(" AND p.start_date <= ");
            qb.push_bind(end);
        }
        (None, None) => {}
    }
    if !criteria.interests.is_empty() {
        qb.push(" AND t.interests && ");
        qb.push_bind(criteria.interests.clone());
    }
}

fn push_list_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &PlanListFilter) {
    if let Some(term) = &filter.search_term {
        let pattern = format!("%{}%", term);
        qb.push(" AND (p.destination ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR p.itinerary ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR p.description ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
    if let Some(travel_type) = filter.travel_type {
        qb.push(" AND p.travel_type = ");
        qb.push_bind(travel_type.as_str());
    }
    if let Some(status) = filter.status {
        qb.push(" AND p.status = ");
        qb.push_bind(status.as_str());
    }
}

fn push_page(qb: &mut QueryBuilder<'_, Postgres>, sort_by: PlanSortField, options: &PageOptions) {
    qb.push(" ORDER BY p.");
    qb.push(sort_by.as_sql());
    qb.push(" ");
    qb.push(options.sort_order.as_sql());
    qb.push(" LIMIT ");
    qb.push_bind(options.limit());
    qb.push(" OFFSET ");
    qb.push_bind(options.offset());
}

fn plans_with_owner(rows: Vec<PlanOwnerRow>) -> Result<Vec<PlanWithOwner>> {
    rows.into_iter()
        .map(|row| {
            let traveler = row.owner.summary()?;
            Ok(PlanWithOwner {
                plan: row.plan.try_into()?,
                traveler,
            })
        })
        .collect()
}

#[async_trait]
impl PlanRepository for PgPlanRepository {
    async fn create(&self, traveler_id: Uuid, plan: NewTravelPlan) -> Result<TravelPlan> {
        let row = sqlx::query_as::<_, PlanRow>(
            "INSERT INTO travel_plans \
             (id, traveler_id, destination, start_date, end_date, budget, travel_type, itinerary, description) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(traveler_id)
        .bind(&plan.destination)
        .bind(plan.start_date)
        .bind(plan.end_date)
        .bind(plan.budget)
        .bind(plan.travel_type.as_str())
        .bind(&plan.itinerary)
        .bind(&plan.description)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::store)?;

        row.try_into()
    }

    async fn find_active(&self, id: Uuid) -> Result<Option<TravelPlan>> {
        let row = sqlx::query_as::<_, PlanRow>(
            "SELECT * FROM travel_plans WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::store)?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_any(&self, id: Uuid) -> Result<Option<TravelPlan>> {
        let row = sqlx::query_as::<_, PlanRow>("SELECT * FROM travel_plans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::store)?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(
        &self,
        filter: &PlanListFilter,
        sort_by: PlanSortField,
        options: &PageOptions,
    ) -> Result<(Vec<PlanWithOwner>, i64)> {
        let mut qb = QueryBuilder::new(SELECT_PLAN_WITH_OWNER);
        push_list_filters(&mut qb, filter);
        push_page(&mut qb, sort_by, options);
        let rows = qb
            .build_query_as::<PlanOwnerRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(Error::store)?;

        let mut count_qb = QueryBuilder::new(COUNT_PLAN_WITH_OWNER);
        push_list_filters(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(Error::store)?;

        Ok((plans_with_owner(rows)?, total))
    }

    async fn list_for_owner(
        &self,
        traveler_id: Uuid,
        filter: &PlanListFilter,
        sort_by: PlanSortField,
        options: &PageOptions,
    ) -> Result<(Vec<PlanWithRequestCount>, i64)> {
        let mut qb = QueryBuilder::new(
            "SELECT p.*, \
             (SELECT COUNT(*) FROM travel_buddy_requests r WHERE r.travel_plan_id = p.id) \
             AS buddy_requests_count \
             FROM travel_plans p \
             WHERE p.is_deleted = FALSE AND p.traveler_id = ",
        );
        qb.push_bind(traveler_id);
        push_list_filters(&mut qb, filter);
        push_page(&mut qb, sort_by, options);
        let rows = qb
            .build_query_as::<PlanRequestCountRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(Error::store)?;

        let mut count_qb = QueryBuilder::new(
            "SELECT COUNT(*) FROM travel_plans p \
             WHERE p.is_deleted = FALSE AND p.traveler_id = ",
        );
        count_qb.push_bind(traveler_id);
        push_list_filters(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(Error::store)?;

        let plans = rows
            .into_iter()
            .map(|row| {
                Ok(PlanWithRequestCount {
                    plan: row.plan.try_into()?,
                    buddy_requests_count: row.buddy_requests_count,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((plans, total))
    }

    async fn update(&self, id: Uuid, changes: PlanChanges) -> Result<TravelPlan> {
        let mut qb = QueryBuilder::new("UPDATE travel_plans SET updated_at = NOW()");
        if let Some(destination) = &changes.destination {
            qb.push(", destination = ");
            qb.push_bind(destination.clone());
        }
        if let Some(start_date) = changes.start_date {
            qb.push(", start_date = ");
            qb.push_bind(start_date);
        }
        if let Some(end_date) = changes.end_date {
            qb.push(", end_date = ");
            qb.push_bind(end_date);
        }
        if let Some(budget) = changes.budget {
            qb.push(", budget = ");
            qb.push_bind(budget);
        }
        if let Some(travel_type) = changes.travel_type {
            qb.push(", travel_type = ");
            qb.push_bind(travel_type.as_str());
        }
        if let Some(itinerary) = &changes.itinerary {
            qb.push(", itinerary = ");
            qb.push_bind(itinerary.clone());
        }
        if let Some(description) = &changes.description {
            qb.push(", description = ");
            qb.push_bind(description.clone());
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" RETURNING *");

        let row = qb
            .build_query_as::<PlanRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::store)?
            .ok_or_else(|| Error::not_found("Plan not found"))?;

        row.try_into()
    }

    async fn set_status(&self, id: Uuid, status: PlanStatus) -> Result<TravelPlan> {
        let row = sqlx::query_as::<_, PlanRow>(
            "UPDATE travel_plans SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::store)?
        .ok_or_else(|| Error::not_found("Plan not found"))?;

        row.try_into()
    }

    async fn set_deleted(&self, id: Uuid) -> Result<TravelPlan> {
        let row = sqlx::query_as::<_, PlanRow>(
            "UPDATE travel_plans SET is_deleted = TRUE, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::store)?
        .ok_or_else(|| Error::not_found("Plan not found"))?;

        row.try_into()
    }

    async fn hard_delete(&self, id: Uuid) -> Result<()> {
        // Requests and reviews go with the plan via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM travel_plans WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::store)?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("Plan not found"));
        }
        Ok(())
    }

    async fn count_for_owner(&self, traveler_id: Uuid) -> Result<i64> {
        // Admin view: soft-deleted plans count too.
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM travel_plans WHERE traveler_id = $1",
        )
        .bind(traveler_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::store)
    }

    async fn start_due(&self, today: NaiveDate) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE travel_plans SET status = 'ONGOING', updated_at = NOW() \
             WHERE status = 'PENDING' AND is_deleted = FALSE AND start_date <= $1",
        )
        .bind(today)
        .execute(&self.pool)
        .await
        .map_err(Error::store)?;

        Ok(result.rows_affected())
    }

    async fn complete_due(&self, today: NaiveDate) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE travel_plans SET status = 'COMPLETED', updated_at = NOW() \
             WHERE status = 'ONGOING' AND is_deleted = FALSE AND end_date < $1",
        )
        .bind(today)
        .execute(&self.pool)
        .await
        .map_err(Error::store)?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl MatchRepository for PgPlanRepository {
    async fn list_matched(
        &self,
        criteria: &MatchCriteria,
        sort_by: PlanSortField,
        options: &PageOptions,
    ) -> Result<(Vec<PlanWithOwner>, i64)> {
        let mut qb = QueryBuilder::new(SELECT_PLAN_WITH_OWNER);
        push_match_filters(&mut qb, criteria);
        push_page(&mut qb, sort_by, options);
        let rows = qb
            .build_query_as::<PlanOwnerRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(Error::store)?;

        // Same predicate, without the page window. The score never feeds in.
        let mut count_qb = QueryBuilder::new(COUNT_PLAN_WITH_OWNER);
        push_match_filters(&mut count_qb, criteria);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(Error::store)?;

        Ok((plans_with_owner(rows)?, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tripmate_shared::models::TravelType;
    use tripmate_shared::pagination::SortOrder;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_match_query_excludes_soft_deleted() {
        let mut qb = QueryBuilder::new(SELECT_PLAN_WITH_OWNER);
        push_match_filters(&mut qb, &MatchCriteria::default());
        let sql = qb.into_sql();
        assert!(sql.contains("p.is_deleted = FALSE"));

        let mut count_qb = QueryBuilder::new(COUNT_PLAN_WITH_OWNER);
        push_match_filters(&mut count_qb, &MatchCriteria::default());
        assert!(count_qb.into_sql().contains("p.is_deleted = FALSE"));
    }

    #[test]
    fn test_budget_bounds_become_bound_predicates() {
        let criteria = MatchCriteria {
            min_budget: Some(100),
            max_budget: Some(500),
            ..Default::default()
        };
        let mut qb = QueryBuilder::new(SELECT_PLAN_WITH_OWNER);
        push_match_filters(&mut qb, &criteria);
        let sql = qb.into_sql();

        assert!(sql.contains("p.budget >= $1"));
        assert!(sql.contains("p.budget <= $2"));
        // Values are bound, never spliced into the text.
        assert!(!sql.contains("100"));
        assert!(!sql.contains("500"));
    }

    #[test]
    fn test_single_date_bound_is_open_ended() {
        let criteria = MatchCriteria {
            start_date: Some(date(2024, 6, 1)),
            ..Default::default()
        };
        let mut qb = QueryBuilder::new(SELECT_PLAN_WITH_OWNER);
        push_match_filters(&mut qb, &criteria);
        let sql = qb.into_sql();

        assert!(sql.contains("p.end_date >= $1"));
        assert!(!sql.contains("p.start_date <="));
    }

    #[test]
    fn test_interest_filter_uses_array_overlap() {
        let criteria = MatchCriteria {
            interests: vec!["diving".to_string()],
            ..Default::default()
        };
        let mut qb = QueryBuilder::new(SELECT_PLAN_WITH_OWNER);
        push_match_filters(&mut qb, &criteria);
        let sql = qb.into_sql();

        assert!(sql.contains("t.interests && $1"));
        assert!(!sql.contains("diving"));
    }

    #[test]
    fn test_list_filters_are_conjunctive_and_bound() {
        let filter = PlanListFilter {
            search_term: Some("beach".to_string()),
            travel_type: Some(TravelType::Adventure),
            status: Some(PlanStatus::Pending),
        };
        let mut qb = QueryBuilder::new(SELECT_PLAN_WITH_OWNER);
        push_list_filters(&mut qb, &filter);
        let sql = qb.into_sql();

        assert!(sql.contains("p.destination ILIKE $1"));
        assert!(sql.contains("p.itinerary ILIKE $2"));
        assert!(sql.contains("p.description ILIKE $3"));
        assert!(sql.contains("p.travel_type = $4"));
        assert!(sql.contains("p.status = $5"));
        assert!(!sql.contains("beach"));
        assert!(!sql.contains("ADVENTURE"));
    }

    #[test]
    fn test_page_clause_whitelists_sort_column() {
        let options = PageOptions {
            page: 2,
            limit: 10,
            sort_order: SortOrder::Asc,
        };
        let mut qb = QueryBuilder::new(SELECT_PLAN_WITH_OWNER);
        push_page(&mut qb, PlanSortField::Budget, &options);
        let sql = qb.into_sql();

        assert!(sql.contains("ORDER BY p.budget ASC"));
        assert!(sql.contains("LIMIT $1"));
        assert!(sql.contains("OFFSET $2"));
    }
}
