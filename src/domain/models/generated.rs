use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::{
    models::{EntryContent, EntryStatus, SourceLink},
    value_objects::TagSet,
};

/// A copy entry as returned by the language model.
///
/// Every field is optional so a partial answer still yields a draft.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeneratedCopy {
    pub headline: String,
    pub copy_text: String,
    pub explanation: String,
    pub sources: Vec<SourceLink>,
    pub copywriter: Option<String>,
    pub advertiser: Option<String>,
    pub awards: Option<String>,
    pub year_created: Option<i32>,
    pub tags: Vec<String>,
    /// Image URLs picked by the model. They point outside the bucket and are never stored.
    pub key_visual_urls: Vec<String>,
}

impl GeneratedCopy {
    /// Draft content published "now"; the model's industry tags become `industry_tags`.
    pub fn into_draft(self, now: DateTime<Utc>) -> EntryContent {
        let headline = match self.headline.trim() {
            "" => super::UNTITLED_HEADLINE.to_string(),
            headline => headline.to_string(),
        };

        EntryContent {
            headline,
            copy_text: self.copy_text,
            explanation: self.explanation,
            advertiser: self.advertiser.unwrap_or_default(),
            copywriter: self.copywriter.filter(|v| !v.trim().is_empty()),
            year_created: self.year_created,
            awards: self.awards.filter(|v| !v.trim().is_empty()),
            sources: self.sources,
            youtube_url: None,
            industry_tags: TagSet::from(self.tags),
            category_tags: TagSet::new(),
            status: EntryStatus::Draft,
            publish_at: Some(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_draft() {
        let generated: GeneratedCopy = serde_json::from_str(
            r#"{
                "headline": "おしりだって、洗ってほしい。",
                "copy_text": "おしりだって、洗ってほしい。",
                "explanation": "1982年のキャンペーン",
                "sources": [{"title": "TCC", "url": "https://example.com"}],
                "advertiser": "TOTO",
                "year_created": 1982,
                "tags": ["住宅設備", "住宅設備"],
                "key_visual_urls": ["https://example.com/a.jpg"]
            }"#,
        )
        .unwrap();

        let now = Utc::now();
        let content = generated.into_draft(now);

        assert_eq!(content.status, EntryStatus::Draft);
        assert_eq!(content.publish_at, Some(now));
        assert_eq!(content.industry_tags.len(), 1);
        assert_eq!(content.year_created, Some(1982));
    }

    #[test]
    fn test_missing_fields_default() {
        let generated: GeneratedCopy = serde_json::from_str("{}").unwrap();
        assert_eq!(generated.into_draft(Utc::now()).headline, super::super::UNTITLED_HEADLINE);
    }
}
