use async_trait::async_trait;

use crate::domain::{
    errors::ListingResult,
    models::{CopyEntry, EntryDetail, Listing},
    value_objects::EntryId,
};

/// Service port for the public reads
#[async_trait]
pub trait ListingService: Send + Sync + 'static {
    /// All published entries with thumbnails and tag facets
    async fn listing(&self) -> ListingResult<Listing>;

    /// The `limit` most recently published entries
    async fn latest(&self, limit: usize) -> ListingResult<Vec<CopyEntry>>;

    /// Any entry by id with signed images and its published neighbours
    async fn detail(&self, id: &EntryId) -> ListingResult<Option<EntryDetail>>;
}
