use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use tripmate_core::error::{Error, Result};
use tripmate_core::models::{NewTraveler, ProfileChanges, Traveler, User};
use tripmate_core::repository::TravelerRepository;
use tripmate_shared::models::UserStatus;

use crate::rows::{TravelerRow, UserRow};

pub struct PgTravelerRepository {
    pool: PgPool,
}

impl PgTravelerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TravelerRepository for PgTravelerRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Traveler>> {
        let row = sqlx::query_as::<_, TravelerRow>("SELECT * FROM travelers WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::store)?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Traveler>> {
        let row = sqlx::query_as::<_, TravelerRow>("SELECT * FROM travelers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::store)?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::store)?;

        row.map(TryInto::try_into).transpose()
    }

    async fn create_with_user(
        &self,
        password_hash: &str,
        profile: NewTraveler,
    ) -> Result<Traveler> {
        // Credential row and profile row land together or not at all.
        let mut tx = self.pool.begin().await.map_err(Error::store)?;

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, role, status) \
             VALUES ($1, $2, $3, 'TRAVELER', 'ACTIVE')",
        )
        .bind(Uuid::new_v4())
        .bind(&profile.email)
        .bind(password_hash)
        .execute(&mut *tx)
        .await
        .map_err(Error::store)?;

        let row = sqlx::query_as::<_, TravelerRow>(
            "INSERT INTO travelers \
             (id, name, email, bio, gender, interests, address, visited_countries, profile_photo) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(&profile.bio)
        .bind(profile.gender.map(|g| g.as_str()))
        .bind(&profile.interests)
        .bind(&profile.address)
        .bind(&profile.visited_countries)
        .bind(&profile.profile_photo)
        .fetch_one(&mut *tx)
        .await
        .map_err(Error::store)?;

        tx.commit().await.map_err(Error::store)?;

        row.try_into()
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<Traveler> {
        let mut qb = QueryBuilder::new("UPDATE travelers SET updated_at = NOW()");
        if let Some(name) = &changes.name {
            qb.push(", name = ");
            qb.push_bind(name.clone());
        }
        if let Some(bio) = &changes.bio {
            qb.push(", bio = ");
            qb.push_bind(bio.clone());
        }
        if let Some(gender) = changes.gender {
            qb.push(", gender = ");
            qb.push_bind(gender.as_str());
        }
        if let Some(interests) = &changes.interests {
            qb.push(", interests = ");
            qb.push_bind(interests.clone());
        }
        if let Some(address) = &changes.address {
            qb.push(", address = ");
            qb.push_bind(address.clone());
        }
        if let Some(visited) = &changes.visited_countries {
            qb.push(", visited_countries = ");
            qb.push_bind(visited.clone());
        }
        if let Some(photo) = &changes.profile_photo {
            qb.push(", profile_photo = ");
            qb.push_bind(photo.clone());
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" RETURNING *");

        let row = qb
            .build_query_as::<TravelerRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::store)?
            .ok_or_else(|| Error::not_found("Traveler not found"))?;

        row.try_into()
    }

    async fn create_admin_if_absent(&self, email: &str, password_hash: &str) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO users (id, email, password_hash, role, status) \
             VALUES ($1, $2, $3, 'ADMIN', 'ACTIVE') \
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(Error::store)?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_user_status(&self, id: Uuid, status: UserStatus) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(
            "UPDATE users SET status = $1 WHERE id = $2 RETURNING *",
        )
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::store)?
        .ok_or_else(|| Error::not_found("User not found"))?;

        row.try_into()
    }
}
