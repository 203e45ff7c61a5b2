use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    domain::{
        errors::{RepositoryError, RepositoryResult},
        models::{DeliveryFrequency, DeliveryProfile},
    },
    ports::repositories::ProfileRepository,
};

/// In-memory implementation of ProfileRepository for testing and development
#[derive(Clone, Default)]
pub struct InMemoryProfileRepository {
    profiles: Arc<RwLock<HashMap<Uuid, DeliveryProfile>>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: &Uuid) -> Option<DeliveryProfile> {
        self.profiles.read().await.get(id).cloned()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn due_for_delivery(&self, now: DateTime<Utc>) -> RepositoryResult<Vec<DeliveryProfile>> {
        let profiles = self.profiles.read().await;

        let mut due: Vec<DeliveryProfile> = profiles
            .values()
            .filter(|p| p.frequency == DeliveryFrequency::Daily && p.next_scheduled_at <= now)
            .cloned()
            .collect();
        due.sort_by_key(|p| p.next_scheduled_at);

        Ok(due)
    }

    async fn set_next_scheduled(&self, id: &Uuid, at: DateTime<Utc>) -> RepositoryResult<()> {
        let mut profiles = self.profiles.write().await;

        let profile = profiles
            .get_mut(id)
            .ok_or(RepositoryError::ProfileNotFound { id: *id })?;
        profile.next_scheduled_at = at;

        Ok(())
    }

    async fn save(&self, profile: &DeliveryProfile) -> RepositoryResult<()> {
        self.profiles
            .write()
            .await
            .insert(profile.id, profile.clone());
        Ok(())
    }
}
