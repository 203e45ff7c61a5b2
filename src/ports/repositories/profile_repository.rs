use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{errors::RepositoryResult, models::DeliveryProfile};

/// Persistence of messaging subscribers and their schedules
#[async_trait]
pub trait ProfileRepository: Send + Sync + 'static {
    /// Daily profiles whose `next_scheduled_at` is not after `now`
    async fn due_for_delivery(&self, now: DateTime<Utc>) -> RepositoryResult<Vec<DeliveryProfile>>;

    async fn set_next_scheduled(&self, id: &Uuid, at: DateTime<Utc>) -> RepositoryResult<()>;

    /// Insert or replace a profile
    async fn save(&self, profile: &DeliveryProfile) -> RepositoryResult<()>;
}
