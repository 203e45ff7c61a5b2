use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::{
    domain::{
        errors::{RepositoryError, RepositoryResult},
        models::{DeliveryFrequency, DeliveryProfile, DeliveryTime},
    },
    ports::repositories::ProfileRepository,
};

const PROFILE_COLUMNS: &str = "id, line_user_id, delivery_freq, delivery_time, next_scheduled_at";

/// SQL-based implementation of ProfileRepository using PostgreSQL
#[derive(Clone)]
pub struct SqlProfileRepository {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct ProfileRow {
    id: Uuid,
    line_user_id: String,
    delivery_freq: String,
    delivery_time: String,
    next_scheduled_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for DeliveryProfile {
    type Error = RepositoryError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let delivery_time =
            DeliveryTime::parse(&row.delivery_time).map_err(|e| RepositoryError::InvalidRow {
                message: format!("profile {}: {}", row.id, e),
            })?;

        Ok(DeliveryProfile {
            id: row.id,
            line_user_id: row.line_user_id,
            frequency: DeliveryFrequency::parse(&row.delivery_freq),
            delivery_time,
            next_scheduled_at: row.next_scheduled_at,
        })
    }
}

impl SqlProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Initialize database tables
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                line_user_id TEXT NOT NULL UNIQUE,
                delivery_freq TEXT NOT NULL DEFAULT 'daily',
                delivery_time TEXT NOT NULL DEFAULT '20:00',
                next_scheduled_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );

            CREATE INDEX IF NOT EXISTS idx_profiles_next_scheduled_at ON profiles(next_scheduled_at);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for SqlProfileRepository {
    async fn due_for_delivery(&self, now: DateTime<Utc>) -> RepositoryResult<Vec<DeliveryProfile>> {
        let query = format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles
             WHERE next_scheduled_at <= $1 AND delivery_freq = 'daily'
             ORDER BY next_scheduled_at ASC"
        );
        let rows = sqlx::query_as::<_, ProfileRow>(&query)
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::infrastructure("Database error loading due profiles", e))?;

        rows.into_iter().map(DeliveryProfile::try_from).collect()
    }

    async fn set_next_scheduled(&self, id: &Uuid, at: DateTime<Utc>) -> RepositoryResult<()> {
        let result = sqlx::query("UPDATE profiles SET next_scheduled_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::infrastructure("Database error rescheduling profile", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::ProfileNotFound { id: *id });
        }
        Ok(())
    }

    async fn save(&self, profile: &DeliveryProfile) -> RepositoryResult<()> {
        sqlx::query(
            "INSERT INTO profiles (id, line_user_id, delivery_freq, delivery_time, next_scheduled_at)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE SET
                line_user_id = EXCLUDED.line_user_id,
                delivery_freq = EXCLUDED.delivery_freq,
                delivery_time = EXCLUDED.delivery_time,
                next_scheduled_at = EXCLUDED.next_scheduled_at",
        )
        .bind(profile.id)
        .bind(&profile.line_user_id)
        .bind(profile.frequency.as_str())
        .bind(profile.delivery_time.to_string())
        .bind(profile.next_scheduled_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::infrastructure("Database error saving profile", e))?;

        Ok(())
    }
}
