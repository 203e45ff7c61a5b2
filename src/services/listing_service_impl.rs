use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{
    domain::{
        errors::ListingResult,
        models::{
            CopyEntry, EntryDetail, EntryOrder, EntryQuery, EntryStatus, ListedEntry, Listing,
            OrderField, DETAIL_URL_TTL_SECS, THUMBNAIL_URL_TTL_SECS,
        },
        value_objects::{EntryId, ImagePath},
    },
    ports::{repositories::EntryRepository, services::ListingService, storage::ObjectStore},
};

/// Read side of the public site
#[derive(Clone)]
pub struct ListingServiceImpl {
    repository: Arc<dyn EntryRepository>,
    store: Arc<dyn ObjectStore>,
}

impl ListingServiceImpl {
    pub fn new(repository: Arc<dyn EntryRepository>, store: Arc<dyn ObjectStore>) -> Self {
        Self { repository, store }
    }

    /// Sign a batch of paths. Failure yields an empty map, never an error.
    async fn sign(&self, paths: &[ImagePath], ttl_secs: u64) -> HashMap<ImagePath, String> {
        if paths.is_empty() {
            return HashMap::new();
        }

        match self
            .store
            .create_signed_urls(paths, Duration::from_secs(ttl_secs))
            .await
        {
            Ok(signed) => signed.into_iter().map(|s| (s.path, s.url)).collect(),
            Err(e) => {
                warn!(error = %e, count = paths.len(), "Signing image URLs failed");
                HashMap::new()
            }
        }
    }

    /// The published neighbour of `serial_number` in one direction
    async fn neighbour(&self, serial_number: i64, older: bool) -> ListingResult<Option<EntryId>> {
        let query = if older {
            EntryQuery::builder()
                .status(EntryStatus::Published)
                .serial_before(serial_number)
                .order(EntryOrder::desc(OrderField::SerialNumber))
                .limit(1)
                .build()
        } else {
            EntryQuery::builder()
                .status(EntryStatus::Published)
                .serial_after(serial_number)
                .order(EntryOrder::asc(OrderField::SerialNumber))
                .limit(1)
                .build()
        };

        Ok(self
            .repository
            .select(&query)
            .await?
            .first()
            .map(|entry| entry.id))
    }
}

#[async_trait]
impl ListingService for ListingServiceImpl {
    async fn listing(&self) -> ListingResult<Listing> {
        let entries = self.repository.select(&EntryQuery::published()).await?;

        let thumbnails: Vec<ImagePath> = entries
            .iter()
            .filter_map(|entry| entry.thumbnail_path().cloned())
            .collect();
        let signed = self.sign(&thumbnails, THUMBNAIL_URL_TTL_SECS).await;

        let listed = entries
            .into_iter()
            .map(|entry| {
                let thumbnail_url = entry
                    .thumbnail_path()
                    .and_then(|path| signed.get(path).cloned());
                ListedEntry {
                    entry,
                    thumbnail_url,
                }
            })
            .collect::<Vec<_>>();

        debug!(entries = listed.len(), "Loaded published listing");
        Ok(Listing::new(listed))
    }

    async fn latest(&self, limit: usize) -> ListingResult<Vec<CopyEntry>> {
        let query = EntryQuery::builder()
            .status(EntryStatus::Published)
            .order(EntryOrder::desc(OrderField::PublishAt))
            .limit(limit)
            .build();

        Ok(self.repository.select(&query).await?)
    }

    async fn detail(&self, id: &EntryId) -> ListingResult<Option<EntryDetail>> {
        let Some(entry) = self.repository.find(id).await? else {
            return Ok(None);
        };

        let signed = self.sign(&entry.key_visual_urls, DETAIL_URL_TTL_SECS).await;
        // All or nothing: a partially signed gallery is not shown.
        let image_urls = if entry.key_visual_urls.iter().all(|p| signed.contains_key(p)) {
            entry
                .key_visual_urls
                .iter()
                .filter_map(|path| signed.get(path).cloned())
                .collect()
        } else {
            Vec::new()
        };

        let previous_id = self.neighbour(entry.serial_number, true).await?;
        let next_id = self.neighbour(entry.serial_number, false).await?;

        Ok(Some(EntryDetail {
            youtube_video_id: entry.youtube_video_id(),
            entry,
            image_urls,
            previous_id,
            next_id,
        }))
    }
}
