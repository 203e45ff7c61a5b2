use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use chrono::Utc;

use crate::{
    domain::{
        errors::{RepositoryError, RepositoryResult},
        models::{CopyEntry, EntryOrder, EntryQuery, EntryRecord, OrderField},
        value_objects::EntryId,
    },
    ports::repositories::EntryRepository,
};

/// In-memory implementation of EntryRepository for testing and development
#[derive(Clone, Default)]
pub struct InMemoryEntryRepository {
    data: Arc<RwLock<RepositoryData>>,
}

#[derive(Default)]
struct RepositoryData {
    entries: HashMap<EntryId, CopyEntry>,
    last_serial: i64,
}

impl InMemoryEntryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntryRepository for InMemoryEntryRepository {
    async fn select(&self, query: &EntryQuery) -> RepositoryResult<Vec<CopyEntry>> {
        let data = self.data.read().await;

        let mut entries: Vec<CopyEntry> = data
            .entries
            .values()
            .filter(|entry| query.matches(entry))
            .cloned()
            .collect();

        let order = query
            .order
            .unwrap_or(EntryOrder::asc(OrderField::SerialNumber));
        entries.sort_by(|a, b| order.compare(a, b));

        if let Some(limit) = query.limit {
            entries.truncate(limit);
        }

        Ok(entries)
    }

    async fn find(&self, id: &EntryId) -> RepositoryResult<Option<CopyEntry>> {
        let data = self.data.read().await;
        Ok(data.entries.get(id).cloned())
    }

    async fn insert(&self, record: EntryRecord) -> RepositoryResult<CopyEntry> {
        let mut data = self.data.write().await;

        data.last_serial += 1;
        let entry = CopyEntry {
            id: EntryId::new(),
            serial_number: data.last_serial,
            content: record.content,
            key_visual_urls: record.key_visual_urls,
            legacy_image_urls: record.legacy_image_urls,
            created_at: Utc::now(),
            updated_at: record.updated_at,
        };

        data.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn update(&self, id: &EntryId, record: EntryRecord) -> RepositoryResult<CopyEntry> {
        let mut data = self.data.write().await;

        let entry = data
            .entries
            .get_mut(id)
            .ok_or(RepositoryError::EntryNotFound { id: *id })?;

        entry.content = record.content;
        entry.key_visual_urls = record.key_visual_urls;
        entry.legacy_image_urls = record.legacy_image_urls;
        entry.updated_at = record.updated_at;

        Ok(entry.clone())
    }

    async fn delete(&self, id: &EntryId) -> RepositoryResult<()> {
        let mut data = self.data.write().await;

        data.entries
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::EntryNotFound { id: *id })
    }
}
