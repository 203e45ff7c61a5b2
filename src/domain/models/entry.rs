use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    errors::ValidationError,
    value_objects::{EntryId, ImagePath, TagSet},
};

/// Publication status of a copy entry.
///
/// A plain field: any value may be set by the admin form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Draft => "draft",
            EntryStatus::Published => "published",
            EntryStatus::Archived => "archived",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(EntryStatus::Draft),
            "published" => Ok(EntryStatus::Published),
            "archived" => Ok(EntryStatus::Archived),
            _ => Err(ValidationError::invalid_field(
                "status",
                s,
                "draft, published or archived",
            )),
        }
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference the copy or its explanation was sourced from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLink {
    pub title: String,
    pub url: String,
}

/// The admin-editable content of a copy entry
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntryContent {
    pub headline: String,
    pub copy_text: String,
    pub explanation: String,
    pub advertiser: String,
    pub copywriter: Option<String>,
    pub year_created: Option<i32>,
    pub awards: Option<String>,
    pub sources: Vec<SourceLink>,
    pub youtube_url: Option<String>,
    pub industry_tags: TagSet,
    pub category_tags: TagSet,
    pub status: EntryStatus,
    pub publish_at: Option<DateTime<Utc>>,
}

/// A stored copy entry
#[derive(Debug, Clone, PartialEq)]
pub struct CopyEntry {
    pub id: EntryId,
    /// Assigned by the repository on insert; drives volume numbering and
    /// previous/next navigation.
    pub serial_number: i64,
    pub content: EntryContent,
    /// Bucket-relative paths, never signed URLs
    pub key_visual_urls: Vec<ImagePath>,
    /// Stored image values that are not bucket paths, e.g. absolute URLs
    /// written by older generation runs. Carried through untouched.
    pub legacy_image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CopyEntry {
    /// The image used as the listing thumbnail
    pub fn thumbnail_path(&self) -> Option<&ImagePath> {
        self.key_visual_urls.first()
    }

    pub fn youtube_video_id(&self) -> Option<String> {
        self.content.youtube_url.as_deref().and_then(youtube_video_id)
    }
}

/// Everything written for an insert or a full update.
///
/// `id`, `serial_number` and `created_at` are owned by the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryRecord {
    pub content: EntryContent,
    pub key_visual_urls: Vec<ImagePath>,
    pub legacy_image_urls: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

/// Extract the 11-character video id from the usual YouTube URL shapes
pub fn youtube_video_id(url: &str) -> Option<String> {
    let url = url.trim();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    let rest = rest.strip_prefix("m.").unwrap_or(rest);

    let candidate = if let Some(path) = rest.strip_prefix("youtu.be/") {
        path
    } else if let Some(path) = rest.strip_prefix("youtube.com/") {
        if let Some(query) = path.strip_prefix("watch?") {
            query
                .split('&')
                .find_map(|pair| pair.strip_prefix("v="))?
        } else {
            ["embed/", "shorts/", "v/", "live/"]
                .iter()
                .find_map(|prefix| path.strip_prefix(prefix))?
        }
    } else {
        return None;
    };

    let id: String = candidate
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    (id.len() == 11).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!(EntryStatus::from_str("Published").unwrap(), EntryStatus::Published);
        assert_eq!(EntryStatus::from_str(" archived ").unwrap(), EntryStatus::Archived);
        assert!(EntryStatus::from_str("deleted").is_err());
        assert_eq!(EntryStatus::default(), EntryStatus::Draft);
    }

    #[test]
    fn test_youtube_video_id() {
        let id = Some("dQw4w9WgXcQ".to_string());
        assert_eq!(youtube_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), id);
        assert_eq!(
            youtube_video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=3"),
            id
        );
        assert_eq!(youtube_video_id("https://youtu.be/dQw4w9WgXcQ?si=abc"), id);
        assert_eq!(youtube_video_id("youtube.com/embed/dQw4w9WgXcQ"), id);
        assert_eq!(youtube_video_id("https://m.youtube.com/shorts/dQw4w9WgXcQ"), id);
    }

    #[test]
    fn test_youtube_video_id_rejects_other_urls() {
        assert_eq!(youtube_video_id("https://vimeo.com/123"), None);
        assert_eq!(youtube_video_id("https://youtube.com/watch?v=short"), None);
        assert_eq!(youtube_video_id(""), None);
    }
}
