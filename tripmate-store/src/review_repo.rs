use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use tripmate_core::error::{Error, Result};
use tripmate_core::models::{HostRating, NewReview, Review};
use tripmate_core::repository::ReviewRepository;

use crate::rows::ReviewRow;

pub struct PgReviewRepository {
    pool: PgPool,
}

impl PgReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn round_one_decimal(avg: Option<f64>) -> f64 {
    (avg.unwrap_or(0.0) * 10.0).round() / 10.0
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn create(&self, review: NewReview) -> Result<Review> {
        let row = sqlx::query_as::<_, ReviewRow>(
            "INSERT INTO reviews (id, reviewer_id, reviewee_id, travel_plan_id, rating, comment) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(review.reviewer_id)
        .bind(review.reviewee_id)
        .bind(review.travel_plan_id)
        .bind(review.rating)
        .bind(&review.comment)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::store)?;

        Ok(row.into())
    }

    async fn exists(
        &self,
        reviewer_id: Uuid,
        reviewee_id: Uuid,
        travel_plan_id: Uuid,
    ) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM reviews \
             WHERE reviewer_id = $1 AND reviewee_id = $2 AND travel_plan_id = $3)",
        )
        .bind(reviewer_id)
        .bind(reviewee_id)
        .bind(travel_plan_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::store)
    }

    async fn list_for_reviewee(&self, reviewee_id: Uuid) -> Result<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT * FROM reviews WHERE reviewee_id = $1 ORDER BY created_at DESC",
        )
        .bind(reviewee_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::store)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_for_plan(&self, travel_plan_id: Uuid) -> Result<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT * FROM reviews WHERE travel_plan_id = $1 ORDER BY created_at DESC",
        )
        .bind(travel_plan_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::store)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn summary_for(&self, traveler_id: Uuid) -> Result<HostRating> {
        let (avg, total): (Option<f64>, i64) = sqlx::query_as(
            "SELECT AVG(rating)::float8, COUNT(*) FROM reviews WHERE reviewee_id = $1",
        )
        .bind(traveler_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::store)?;

        Ok(HostRating {
            avg_rating: round_one_decimal(avg),
            total_reviews: total,
        })
    }

    async fn summaries_for(&self, traveler_ids: &[Uuid]) -> Result<HashMap<Uuid, HostRating>> {
        if traveler_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Uuid, Option<f64>, i64)> = sqlx::query_as(
            "SELECT reviewee_id, AVG(rating)::float8, COUNT(*) FROM reviews \
             WHERE reviewee_id = ANY($1) GROUP BY reviewee_id",
        )
        .bind(traveler_ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(Error::store)?;

        Ok(rows
            .into_iter()
            .map(|(id, avg, total)| {
                (
                    id,
                    HostRating {
                        avg_rating: round_one_decimal(avg),
                        total_reviews: total,
                    },
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_one_decimal() {
        assert_eq!(round_one_decimal(Some(4.666)), 4.7);
        assert_eq!(round_one_decimal(Some(3.04)), 3.0);
        assert_eq!(round_one_decimal(None), 0.0);
    }
}
