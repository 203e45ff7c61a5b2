use async_trait::async_trait;

use crate::domain::{
    errors::RepositoryResult,
    models::{CopyEntry, EntryQuery, EntryRecord},
    value_objects::EntryId,
};

/// Persistence of copy entries.
///
/// Stored image paths come back normalized to bucket-relative form.
#[async_trait]
pub trait EntryRepository: Send + Sync + 'static {
    /// Entries matching the query's filters, in its order, up to its limit
    async fn select(&self, query: &EntryQuery) -> RepositoryResult<Vec<CopyEntry>>;

    async fn find(&self, id: &EntryId) -> RepositoryResult<Option<CopyEntry>>;

    /// Insert a new entry. The repository assigns id, serial number and `created_at`.
    async fn insert(&self, record: EntryRecord) -> RepositoryResult<CopyEntry>;

    /// Replace every editable column of an existing entry
    async fn update(&self, id: &EntryId, record: EntryRecord) -> RepositoryResult<CopyEntry>;

    /// Delete an entry, failing with `EntryNotFound` when it does not exist
    async fn delete(&self, id: &EntryId) -> RepositoryResult<()>;
}
