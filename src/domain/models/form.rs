use std::collections::HashMap;

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{
    errors::ValidationError,
    models::{EntryContent, EntryStatus, SourceLink},
    value_objects::TagSet,
};

/// Headline used when the form leaves it blank
pub const UNTITLED_HEADLINE: &str = "Untitled";

/// A file attached to an admin submission
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Name the file had on the administrator's machine; only its extension is used
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Raw text fields of the admin entry form, keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct EntryForm {
    fields: HashMap<String, String>,
}

impl EntryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.fields.insert(name.to_string(), value.to_string());
    }

    fn text(&self, name: &str) -> &str {
        self.fields.get(name).map(|v| v.trim()).unwrap_or("")
    }

    fn optional_text(&self, name: &str) -> Option<String> {
        let value = self.text(name);
        (!value.is_empty()).then(|| value.to_string())
    }

    /// Turn the submitted fields into entry content.
    ///
    /// Blank optional fields become `None`; tag fields are comma separated.
    pub fn parse(&self) -> Result<EntryContent, ValidationError> {
        let headline = match self.text("headline") {
            "" => UNTITLED_HEADLINE.to_string(),
            headline => headline.to_string(),
        };

        let year_created = match self.text("year_created") {
            "" => None,
            raw => Some(
                raw.parse::<i32>()
                    .map_err(|_| ValidationError::invalid_field("year_created", raw, "an integer"))?,
            ),
        };

        let status = match self.text("status") {
            "" => EntryStatus::default(),
            raw => EntryStatus::from_str(raw)?,
        };

        let publish_at = match self.text("publish_at") {
            "" => None,
            raw => Some(parse_publish_at(raw)?),
        };

        Ok(EntryContent {
            headline,
            copy_text: self.text("copy_text").to_string(),
            explanation: self.text("explanation").to_string(),
            advertiser: self.text("advertiser").to_string(),
            copywriter: self.optional_text("copywriter"),
            year_created,
            awards: self.optional_text("awards"),
            sources: parse_sources(self.text("sources"))?,
            youtube_url: self.optional_text("youtube_url"),
            industry_tags: TagSet::parse(self.text("industry_tags")),
            category_tags: TagSet::parse(self.text("category_tags")),
            status,
            publish_at,
        })
    }
}

/// Accepts a bare date (midnight UTC) or a full RFC 3339 timestamp
fn parse_publish_at(raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc());
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ValidationError::invalid_field("publish_at", raw, "YYYY-MM-DD or RFC 3339"))
}

/// Sources are either a JSON array of `{title, url}` or one `title | url` per line
fn parse_sources(raw: &str) -> Result<Vec<SourceLink>, ValidationError> {
    if raw.starts_with('[') {
        return serde_json::from_str(raw).map_err(|e| {
            ValidationError::invalid_field("sources", raw, &format!("a JSON array of {{title, url}} ({})", e))
        });
    }

    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match line.split_once('|') {
            Some((title, url)) => SourceLink {
                title: title.trim().to_string(),
                url: url.trim().to_string(),
            },
            None => SourceLink {
                title: line.to_string(),
                url: line.to_string(),
            },
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_form_defaults() {
        let content = EntryForm::new().parse().unwrap();

        assert_eq!(content.headline, UNTITLED_HEADLINE);
        assert_eq!(content.status, EntryStatus::Draft);
        assert_eq!(content.copywriter, None);
        assert_eq!(content.year_created, None);
        assert_eq!(content.publish_at, None);
        assert!(content.sources.is_empty());
        assert!(content.industry_tags.is_empty());
    }

    #[test]
    fn test_full_form() {
        let content = EntryForm::new()
            .with_field("headline", " 夏の一杯 ")
            .with_field("copywriter", "山田")
            .with_field("year_created", "1998")
            .with_field("status", "published")
            .with_field("publish_at", "2024-05-01")
            .with_field("industry_tags", "飲料, 食品")
            .with_field("category_tags", "TVCM")
            .with_field("sources", "TCC年鑑 | https://example.com/tcc\nhttps://example.com/raw")
            .parse()
            .unwrap();

        assert_eq!(content.headline, "夏の一杯");
        assert_eq!(content.copywriter.as_deref(), Some("山田"));
        assert_eq!(content.year_created, Some(1998));
        assert_eq!(content.status, EntryStatus::Published);
        assert_eq!(
            content.publish_at.unwrap().to_rfc3339(),
            "2024-05-01T00:00:00+00:00"
        );
        assert_eq!(content.industry_tags.len(), 2);
        assert_eq!(content.sources.len(), 2);
        assert_eq!(content.sources[0].title, "TCC年鑑");
        assert_eq!(content.sources[0].url, "https://example.com/tcc");
        assert_eq!(content.sources[1].url, "https://example.com/raw");
    }

    #[test]
    fn test_json_sources() {
        let content = EntryForm::new()
            .with_field("sources", r#"[{"title":"Interview","url":"https://example.com/i"}]"#)
            .parse()
            .unwrap();

        assert_eq!(content.sources[0].title, "Interview");
    }

    #[test]
    fn test_invalid_fields() {
        assert!(EntryForm::new().with_field("year_created", "nineteen").parse().is_err());
        assert!(EntryForm::new().with_field("status", "deleted").parse().is_err());
        assert!(EntryForm::new().with_field("publish_at", "yesterday").parse().is_err());
        assert!(EntryForm::new().with_field("sources", "[not json").parse().is_err());
    }
}
