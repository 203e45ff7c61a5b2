use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{
    domain::{
        errors::{
            DeliveryError, EntryLifecycleError, GenerationError, ListingError, RepositoryError,
            StorageError,
        },
        models::{
            CopyEntry, DeliveryReport, EntryDeletion, EntryDetail, EntryUpdate, ListedEntry, Page,
            SourceLink,
        },
        value_objects::{EntryId, ImagePath},
    },
    ports::services::{GeneratedDraft, WebhookEvent},
};

/// DTO for a full copy entry, as the admin screens and the detail page see it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryDto {
    pub id: EntryId,
    pub serial_number: i64,
    pub headline: String,
    pub copy_text: String,
    pub explanation: String,
    pub advertiser: String,
    pub copywriter: Option<String>,
    pub year_created: Option<i32>,
    pub awards: Option<String>,
    pub sources: Vec<SourceLink>,
    pub youtube_url: Option<String>,
    pub industry_tags: Vec<String>,
    pub category_tags: Vec<String>,
    /// Bucket-relative paths; never URLs
    pub key_visual_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub legacy_image_urls: Vec<String>,
    pub status: String,
    pub publish_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for one card of the public listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntrySummaryDto {
    pub id: EntryId,
    pub serial_number: i64,
    pub headline: String,
    pub copy_text: String,
    pub advertiser: String,
    pub industry_tags: Vec<String>,
    pub category_tags: Vec<String>,
    pub publish_at: Option<DateTime<Utc>>,
    pub thumbnail_url: Option<String>,
}

/// Query parameters of the public listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingQueryDto {
    pub industry: Option<String>,
    pub category: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// DTO for the public listing response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingResponseDto {
    pub entries: Vec<EntrySummaryDto>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    /// Facets over every published entry, not just the filtered page
    pub industry_tags: Vec<String>,
    pub category_tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LatestQueryDto {
    pub limit: Option<usize>,
}

/// DTO for the detail page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryDetailDto {
    pub entry: EntryDto,
    pub image_urls: Vec<String>,
    pub previous_id: Option<EntryId>,
    pub next_id: Option<EntryId>,
    pub youtube_video_id: Option<String>,
}

/// DTO for a successful update; warnings list images that could not be removed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryUpdateDto {
    pub entry: EntryDto,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryDeletionDto {
    pub id: EntryId,
    pub orphaned_images: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedDeliveryDto {
    pub profile_id: uuid::Uuid,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReportDto {
    pub entry_id: EntryId,
    pub delivered: Vec<uuid::Uuid>,
    pub failed: Vec<FailedDeliveryDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedDraftDto {
    pub entry: EntryDto,
    pub skipped_image_urls: Vec<String>,
}

/// Inbound messaging webhook body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayloadDto {
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// Query parameters of a locally signed media URL
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaQueryDto {
    pub expires: Option<i64>,
    pub signature: Option<String>,
}

/// DTO for error responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponseDto {
    pub error: String,
    pub message: String,
    pub details: Option<HashMap<String, serde_json::Value>>,
    pub timestamp: DateTime<Utc>,
}

/// DTO for success responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponseDto {
    pub message: String,
    pub data: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

// Conversion implementations

fn path_strings(paths: &[ImagePath]) -> Vec<String> {
    paths.iter().map(|p| p.as_str().to_string()).collect()
}

impl From<CopyEntry> for EntryDto {
    fn from(entry: CopyEntry) -> Self {
        let content = entry.content;
        EntryDto {
            id: entry.id,
            serial_number: entry.serial_number,
            headline: content.headline,
            copy_text: content.copy_text,
            explanation: content.explanation,
            advertiser: content.advertiser,
            copywriter: content.copywriter,
            year_created: content.year_created,
            awards: content.awards,
            sources: content.sources,
            youtube_url: content.youtube_url,
            industry_tags: content.industry_tags.into(),
            category_tags: content.category_tags.into(),
            key_visual_urls: path_strings(&entry.key_visual_urls),
            legacy_image_urls: entry.legacy_image_urls,
            status: content.status.as_str().to_string(),
            publish_at: content.publish_at,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

impl From<&ListedEntry> for EntrySummaryDto {
    fn from(listed: &ListedEntry) -> Self {
        let entry = &listed.entry;
        EntrySummaryDto {
            id: entry.id,
            serial_number: entry.serial_number,
            headline: entry.content.headline.clone(),
            copy_text: entry.content.copy_text.clone(),
            advertiser: entry.content.advertiser.clone(),
            industry_tags: entry.content.industry_tags.as_slice().to_vec(),
            category_tags: entry.content.category_tags.as_slice().to_vec(),
            publish_at: entry.content.publish_at,
            thumbnail_url: listed.thumbnail_url.clone(),
        }
    }
}

impl ListingResponseDto {
    pub fn new(
        page: Page<EntrySummaryDto>,
        industry_tags: Vec<String>,
        category_tags: Vec<String>,
    ) -> Self {
        ListingResponseDto {
            total_pages: page.total_pages(),
            entries: page.items,
            page: page.page,
            per_page: page.per_page,
            total: page.total,
            industry_tags,
            category_tags,
        }
    }
}

impl From<EntryDetail> for EntryDetailDto {
    fn from(detail: EntryDetail) -> Self {
        EntryDetailDto {
            entry: detail.entry.into(),
            image_urls: detail.image_urls,
            previous_id: detail.previous_id,
            next_id: detail.next_id,
            youtube_video_id: detail.youtube_video_id,
        }
    }
}

impl From<EntryUpdate> for EntryUpdateDto {
    fn from(update: EntryUpdate) -> Self {
        EntryUpdateDto {
            entry: update.entry.into(),
            warnings: update
                .stale_images
                .iter()
                .map(|warning| format!("Entry saved, but {}", warning))
                .collect(),
        }
    }
}

impl From<EntryDeletion> for EntryDeletionDto {
    fn from(deletion: EntryDeletion) -> Self {
        let (orphaned_images, warnings) = match &deletion.orphaned_images {
            Some(warning) => (
                path_strings(&warning.paths),
                vec![format!("Entry deleted, but {}", warning)],
            ),
            None => (Vec::new(), Vec::new()),
        };

        EntryDeletionDto {
            id: deletion.id,
            orphaned_images,
            warnings,
        }
    }
}

impl From<DeliveryReport> for DeliveryReportDto {
    fn from(report: DeliveryReport) -> Self {
        DeliveryReportDto {
            entry_id: report.entry_id,
            delivered: report.delivered,
            failed: report
                .failed
                .into_iter()
                .map(|f| FailedDeliveryDto {
                    profile_id: f.profile_id,
                    reason: f.reason,
                })
                .collect(),
        }
    }
}

impl From<GeneratedDraft> for GeneratedDraftDto {
    fn from(draft: GeneratedDraft) -> Self {
        GeneratedDraftDto {
            entry: draft.entry.into(),
            skipped_image_urls: draft.skipped_image_urls,
        }
    }
}

// Status code mapping

impl From<&RepositoryError> for StatusCode {
    fn from(error: &RepositoryError) -> Self {
        match error {
            RepositoryError::EntryNotFound { .. } | RepositoryError::ProfileNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<&EntryLifecycleError> for StatusCode {
    fn from(error: &EntryLifecycleError) -> Self {
        match error {
            EntryLifecycleError::InvalidSubmission(_) => StatusCode::BAD_REQUEST,
            EntryLifecycleError::Upload { source, .. } => match source {
                StorageError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                _ => StatusCode::BAD_GATEWAY,
            },
            EntryLifecycleError::Persistence { source, .. } => source.into(),
        }
    }
}

// Error response helpers

impl ErrorResponseDto {
    pub fn from_lifecycle_error(error: &EntryLifecycleError) -> Self {
        let mut details = HashMap::new();

        details.insert(
            "failure_classes".to_string(),
            serde_json::to_value(error.classes()).unwrap_or_default(),
        );
        details.insert(
            "compensated".to_string(),
            serde_json::Value::Bool(error.compensation().succeeded()),
        );
        let orphaned = error.compensation().orphaned();
        if !orphaned.is_empty() {
            details.insert(
                "manual_cleanup".to_string(),
                serde_json::Value::from(path_strings(orphaned)),
            );
        }

        let error_name = match error {
            EntryLifecycleError::InvalidSubmission(_) => "InvalidSubmission",
            EntryLifecycleError::Upload { .. } => "UploadFailed",
            EntryLifecycleError::Persistence { .. } => "PersistenceFailed",
        };

        ErrorResponseDto {
            error: error_name.to_string(),
            message: error.to_string(),
            details: Some(details),
            timestamp: Utc::now(),
        }
    }

    pub fn from_repository_error(error: &RepositoryError) -> Self {
        match error {
            RepositoryError::EntryNotFound { .. } | RepositoryError::ProfileNotFound { .. } => {
                Self::not_found(&error.to_string())
            }
            _ => Self::internal_error(&error.to_string()),
        }
    }

    pub fn from_listing_error(error: &ListingError) -> Self {
        match error {
            ListingError::Repository(e) => Self::from_repository_error(e),
        }
    }

    pub fn from_delivery_error(error: &DeliveryError) -> Self {
        match error {
            DeliveryError::NoPublishedEntry => ErrorResponseDto {
                error: "NoPublishedEntry".to_string(),
                message: error.to_string(),
                details: None,
                timestamp: Utc::now(),
            },
            DeliveryError::Repository(e) => Self::from_repository_error(e),
        }
    }

    pub fn from_generation_error(error: &GenerationError) -> Self {
        match error {
            GenerationError::Lifecycle(e) => Self::from_lifecycle_error(e),
            _ => ErrorResponseDto {
                error: "GeneratorFailed".to_string(),
                message: error.to_string(),
                details: None,
                timestamp: Utc::now(),
            },
        }
    }

    pub fn bad_request(message: &str) -> Self {
        ErrorResponseDto {
            error: "BadRequest".to_string(),
            message: message.to_string(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        ErrorResponseDto {
            error: "NotFound".to_string(),
            message: message.to_string(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    pub fn forbidden(message: &str) -> Self {
        ErrorResponseDto {
            error: "Forbidden".to_string(),
            message: message.to_string(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    pub fn internal_error(message: &str) -> Self {
        ErrorResponseDto {
            error: "InternalServerError".to_string(),
            message: message.to_string(),
            details: None,
            timestamp: Utc::now(),
        }
    }
}

impl SuccessResponseDto {
    pub fn with_data(message: &str, data: serde_json::Value) -> Self {
        SuccessResponseDto {
            message: message.to_string(),
            data: Some(data),
            timestamp: Utc::now(),
        }
    }
}
