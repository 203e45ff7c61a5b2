use serde::Serialize;

use crate::domain::{
    models::{CopyEntry, TagFilter},
    value_objects::{EntryId, TagSet},
};

/// Lifetime of listing thumbnail URLs
pub const THUMBNAIL_URL_TTL_SECS: u64 = 300;
/// Lifetime of image URLs on the detail view
pub const DETAIL_URL_TTL_SECS: u64 = 3600;

pub const DEFAULT_PER_PAGE: usize = 20;
pub const MAX_PER_PAGE: usize = 100;

/// A published entry with its signed thumbnail, if one could be produced
#[derive(Debug, Clone)]
pub struct ListedEntry {
    pub entry: CopyEntry,
    pub thumbnail_url: Option<String>,
}

/// All published entries plus the tag facets derived from them
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub entries: Vec<ListedEntry>,
    pub industry_tags: TagSet,
    pub category_tags: TagSet,
}

impl Listing {
    /// Build the facets from the entries in their given order.
    pub fn new(entries: Vec<ListedEntry>) -> Self {
        let mut industry_tags = TagSet::new();
        let mut category_tags = TagSet::new();

        for listed in &entries {
            industry_tags.extend(listed.entry.content.industry_tags.iter());
            category_tags.extend(listed.entry.content.category_tags.iter());
        }

        Self {
            entries,
            industry_tags,
            category_tags,
        }
    }

    /// Entries passing the filter, original order kept. Facets are left untouched.
    pub fn filter(&self, filter: &TagFilter) -> Vec<&ListedEntry> {
        self.entries
            .iter()
            .filter(|listed| filter.matches(&listed.entry))
            .collect()
    }
}

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    /// Clamp user input: page at least 1, per_page between 1 and `MAX_PER_PAGE`.
    pub fn new(page: Option<usize>, per_page: Option<usize>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.per_page)
    }
}

pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len();
    let start = (request.page - 1).saturating_mul(request.per_page);

    Page {
        items: items
            .into_iter()
            .skip(start)
            .take(request.per_page)
            .collect(),
        page: request.page,
        per_page: request.per_page,
        total,
    }
}

/// One entry with every image signed and its neighbours resolved
#[derive(Debug, Clone)]
pub struct EntryDetail {
    pub entry: CopyEntry,
    /// Signed image URLs in stored order; empty when signing failed
    pub image_urls: Vec<String>,
    /// Published entry with the next-lower serial number
    pub previous_id: Option<EntryId>,
    /// Published entry with the next-higher serial number
    pub next_id: Option<EntryId>,
    pub youtube_video_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_clamping() {
        assert_eq!(PageRequest::new(None, None), PageRequest { page: 1, per_page: 20 });
        assert_eq!(PageRequest::new(Some(0), Some(0)), PageRequest { page: 1, per_page: 1 });
        assert_eq!(PageRequest::new(Some(3), Some(500)).per_page, MAX_PER_PAGE);
    }

    #[test]
    fn test_paginate() {
        let page = paginate((1..=45).collect::<Vec<_>>(), PageRequest::new(Some(3), Some(20)));

        assert_eq!(page.items, vec![41, 42, 43, 44, 45]);
        assert_eq!(page.total, 45);
        assert_eq!(page.total_pages(), 3);

        let beyond = paginate(vec![1, 2], PageRequest::new(Some(9), None));
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 2);
    }
}
