use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use tripmate_core::error::{Error, Result};
use tripmate_core::models::{RequestWithRequester, SentRequest, TravelBuddyRequest};
use tripmate_core::repository::RequestRepository;
use tripmate_shared::models::RequestStatus;
use tripmate_shared::pagination::PageOptions;

use crate::rows::{PlanRow, RequestRow, TravelerSummaryRow};

pub struct PgRequestRepository {
    pool: PgPool,
}

impl PgRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_status_filter(qb: &mut QueryBuilder<'_, Postgres>, status: Option<RequestStatus>) {
    if let Some(status) = status {
        qb.push(" AND r.status = ");
        qb.push_bind(status.as_str());
    }
}

fn push_page(qb: &mut QueryBuilder<'_, Postgres>, options: &PageOptions) {
    qb.push(" ORDER BY r.created_at ");
    qb.push(options.sort_order.as_sql());
    qb.push(" LIMIT ");
    qb.push_bind(options.limit());
    qb.push(" OFFSET ");
    qb.push_bind(options.offset());
}

#[async_trait]
impl RequestRepository for PgRequestRepository {
    async fn create(
        &self,
        travel_plan_id: Uuid,
        requester_id: Uuid,
        message: Option<String>,
    ) -> Result<TravelBuddyRequest> {
        let row = sqlx::query_as::<_, RequestRow>(
            "INSERT INTO travel_buddy_requests (id, travel_plan_id, requester_id, message) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(travel_plan_id)
        .bind(requester_id)
        .bind(&message)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::store)?;

        row.try_into()
    }

    async fn find(&self, id: Uuid) -> Result<Option<TravelBuddyRequest>> {
        let row =
            sqlx::query_as::<_, RequestRow>("SELECT * FROM travel_buddy_requests WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(Error::store)?;

        row.map(TryInto::try_into).transpose()
    }

    async fn exists_for(&self, travel_plan_id: Uuid, requester_id: Uuid) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM travel_buddy_requests \
             WHERE travel_plan_id = $1 AND requester_id = $2)",
        )
        .bind(travel_plan_id)
        .bind(requester_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::store)
    }

    async fn list_for_plan(
        &self,
        travel_plan_id: Uuid,
        status: Option<RequestStatus>,
        options: &PageOptions,
    ) -> Result<(Vec<RequestWithRequester>, i64)> {
        let mut qb = QueryBuilder::new(
            "SELECT r.id, r.travel_plan_id, r.requester_id, r.message, r.status, r.created_at, \
             t.id AS owner_id, t.name AS owner_name, t.email AS owner_email, t.bio AS owner_bio, \
             t.gender AS owner_gender, t.interests AS owner_interests, \
             t.visited_countries AS owner_visited_countries, \
             t.profile_photo AS owner_profile_photo, t.is_verified AS owner_is_verified \
             FROM travel_buddy_requests r JOIN travelers t ON t.id = r.requester_id \
             WHERE r.travel_plan_id = ",
        );
        qb.push_bind(travel_plan_id);
        push_status_filter(&mut qb, status);
        push_page(&mut qb, options);

        let rows = qb
            .build_query_as::<RequestRequesterRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(Error::store)?;

        let mut count_qb = QueryBuilder::new(
            "SELECT COUNT(*) FROM travel_buddy_requests r WHERE r.travel_plan_id = ",
        );
        count_qb.push_bind(travel_plan_id);
        push_status_filter(&mut count_qb, status);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(Error::store)?;

        let requests = rows
            .into_iter()
            .map(|row| {
                Ok(RequestWithRequester {
                    requester: row.requester.summary()?,
                    request: row.request.try_into()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((requests, total))
    }

    async fn list_sent(
        &self,
        requester_id: Uuid,
        status: Option<RequestStatus>,
        options: &PageOptions,
    ) -> Result<(Vec<SentRequest>, i64)> {
        let mut qb = QueryBuilder::new(
            "SELECT r.id, r.travel_plan_id, r.requester_id, r.message, r.status, r.created_at, \
             p.id AS plan_id, p.traveler_id AS plan_traveler_id, \
             p.destination AS plan_destination, p.start_date AS plan_start_date, \
             p.end_date AS plan_end_date, p.budget AS plan_budget, \
             p.travel_type AS plan_travel_type, p.itinerary AS plan_itinerary, \
             p.description AS plan_description, p.status AS plan_status, \
             p.is_deleted AS plan_is_deleted, p.created_at AS plan_created_at, \
             p.updated_at AS plan_updated_at \
             FROM travel_buddy_requests r JOIN travel_plans p ON p.id = r.travel_plan_id \
             WHERE r.requester_id = ",
        );
        qb.push_bind(requester_id);
        push_status_filter(&mut qb, status);
        push_page(&mut qb, options);

        let rows = qb
            .build_query_as::<SentRequestRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(Error::store)?;

        let mut count_qb =
            QueryBuilder::new("SELECT COUNT(*) FROM travel_buddy_requests r WHERE r.requester_id = ");
        count_qb.push_bind(requester_id);
        push_status_filter(&mut count_qb, status);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(Error::store)?;

        let requests = rows
            .into_iter()
            .map(|row| {
                Ok(SentRequest {
                    travel_plan: row.plan()?,
                    request: row.request.try_into()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((requests, total))
    }

    async fn transition_if_pending(
        &self,
        id: Uuid,
        status: RequestStatus,
    ) -> Result<Option<TravelBuddyRequest>> {
        // Compare-and-swap on status: two concurrent accepts cannot both win.
        let row = sqlx::query_as::<_, RequestRow>(
            "UPDATE travel_buddy_requests SET status = $1 \
             WHERE id = $2 AND status = 'PENDING' RETURNING *",
        )
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::store)?;

        row.map(TryInto::try_into).transpose()
    }

    async fn accepted_requester_ids(&self, travel_plan_id: Uuid) -> Result<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT requester_id FROM travel_buddy_requests \
             WHERE travel_plan_id = $1 AND status = 'ACCEPTED'",
        )
        .bind(travel_plan_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::store)
    }
}

#[derive(sqlx::FromRow)]
struct RequestRequesterRow {
    #[sqlx(flatten)]
    request: RequestRow,
    #[sqlx(flatten)]
    requester: TravelerSummaryRow,
}

#[derive(sqlx::FromRow)]
struct SentRequestRow {
    #[sqlx(flatten)]
    request: RequestRow,
    plan_id: Uuid,
    plan_traveler_id: Uuid,
    plan_destination: String,
    plan_start_date: chrono::NaiveDate,
    plan_end_date: chrono::NaiveDate,
    plan_budget: i32,
    plan_travel_type: String,
    plan_itinerary: Option<String>,
    plan_description: Option<String>,
    plan_status: String,
    plan_is_deleted: bool,
    plan_created_at: chrono::DateTime<chrono::Utc>,
    plan_updated_at: chrono::DateTime<chrono::Utc>,
}

impl SentRequestRow {
    fn plan(&self) -> Result<tripmate_core::models::TravelPlan> {
        PlanRow {
            id: self.plan_id,
            traveler_id: self.plan_traveler_id,
            destination: self.plan_destination.clone(),
            start_date: self.plan_start_date,
            end_date: self.plan_end_date,
            budget: self.plan_budget,
            travel_type: self.plan_travel_type.clone(),
            itinerary: self.plan_itinerary.clone(),
            description: self.plan_description.clone(),
            status: self.plan_status.clone(),
            is_deleted: self.plan_is_deleted,
            created_at: self.plan_created_at,
            updated_at: self.plan_updated_at,
        }
        .try_into()
    }
}
