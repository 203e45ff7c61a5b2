use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::warn;
use uuid::Uuid;

use crate::{
    domain::{
        errors::{RepositoryError, RepositoryResult},
        models::{
            CopyEntry, Direction, EntryContent, EntryQuery, EntryRecord, EntryStatus, OrderField,
            SourceLink,
        },
        value_objects::{EntryId, ImagePath, TagSet},
    },
    ports::repositories::EntryRepository,
};

/// Column list for copy_entries queries.
const ENTRY_COLUMNS: &str = "id, serial_number, headline, copy_text, explanation, advertiser, \
    copywriter, year_created, awards, source, youtube_url, industry_tags, category_tags, \
    key_visual_urls, status, publish_at, created_at, updated_at";

/// SQL-based implementation of EntryRepository using PostgreSQL
#[derive(Clone)]
pub struct SqlEntryRepository {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct EntryRow {
    id: Uuid,
    serial_number: i64,
    headline: String,
    copy_text: String,
    explanation: String,
    advertiser: String,
    copywriter: Option<String>,
    year_created: Option<i32>,
    awards: Option<String>,
    source: sqlx::types::Json<Vec<SourceLink>>,
    youtube_url: Option<String>,
    industry_tags: Vec<String>,
    category_tags: Vec<String>,
    key_visual_urls: Vec<String>,
    status: String,
    publish_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EntryRow> for CopyEntry {
    type Error = RepositoryError;

    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        let status = EntryStatus::from_str(&row.status).map_err(|e| RepositoryError::InvalidRow {
            message: format!("entry {}: {}", row.id, e),
        })?;

        let (key_visual_urls, legacy_image_urls) = split_stored_paths(&row.id, row.key_visual_urls);

        Ok(CopyEntry {
            id: EntryId::from(row.id),
            serial_number: row.serial_number,
            content: EntryContent {
                headline: row.headline,
                copy_text: row.copy_text,
                explanation: row.explanation,
                advertiser: row.advertiser,
                copywriter: row.copywriter,
                year_created: row.year_created,
                awards: row.awards,
                sources: row.source.0,
                youtube_url: row.youtube_url,
                industry_tags: TagSet::from(row.industry_tags),
                category_tags: TagSet::from(row.category_tags),
                status,
                publish_at: row.publish_at,
            },
            key_visual_urls,
            legacy_image_urls,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Older rows may carry legacy prefixes, which are normalized, or values that
/// are not bucket paths at all, which are kept aside verbatim.
fn split_stored_paths(id: &Uuid, raw: Vec<String>) -> (Vec<ImagePath>, Vec<String>) {
    let mut paths = Vec::with_capacity(raw.len());
    let mut legacy = Vec::new();
    for value in raw {
        match ImagePath::normalize(&value) {
            Ok(path) => paths.push(path),
            Err(e) => {
                warn!(%id, path = %value, error = %e, "Keeping stored image value that is not a bucket path");
                legacy.push(value);
            }
        }
    }
    (paths, legacy)
}

fn stored_paths(record: &EntryRecord) -> Vec<String> {
    record
        .key_visual_urls
        .iter()
        .map(|p| p.as_str().to_string())
        .chain(record.legacy_image_urls.iter().cloned())
        .collect()
}

impl SqlEntryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Initialize database tables
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(
            r#"
            CREATE TABLE IF NOT EXISTS copy_entries (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                serial_number BIGSERIAL NOT NULL UNIQUE,
                headline TEXT NOT NULL,
                copy_text TEXT NOT NULL DEFAULT '',
                explanation TEXT NOT NULL DEFAULT '',
                advertiser TEXT NOT NULL DEFAULT '',
                copywriter TEXT,
                year_created INTEGER,
                awards TEXT,
                source JSONB NOT NULL DEFAULT '[]',
                youtube_url TEXT,
                industry_tags TEXT[] NOT NULL DEFAULT '{}',
                category_tags TEXT[] NOT NULL DEFAULT '{}',
                key_visual_urls TEXT[] NOT NULL DEFAULT '{}',
                status TEXT NOT NULL DEFAULT 'draft',
                publish_at TIMESTAMPTZ,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );

            CREATE INDEX IF NOT EXISTS idx_copy_entries_status_serial ON copy_entries(status, serial_number);
            CREATE INDEX IF NOT EXISTS idx_copy_entries_publish_at ON copy_entries(publish_at);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn fetch_entries(
        &self,
        mut builder: QueryBuilder<'_, Postgres>,
        context: &str,
    ) -> RepositoryResult<Vec<CopyEntry>> {
        let rows = builder
            .build_query_as::<EntryRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::infrastructure(context, e))?;

        rows.into_iter().map(CopyEntry::try_from).collect()
    }
}

#[async_trait]
impl EntryRepository for SqlEntryRepository {
    async fn select(&self, query: &EntryQuery) -> RepositoryResult<Vec<CopyEntry>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {ENTRY_COLUMNS} FROM copy_entries WHERE TRUE"
        ));

        if let Some(status) = query.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(id) = &query.id {
            builder.push(" AND id = ").push_bind(*id.as_uuid());
        }
        if let Some(before) = query.serial_before {
            builder.push(" AND serial_number < ").push_bind(before);
        }
        if let Some(after) = query.serial_after {
            builder.push(" AND serial_number > ").push_bind(after);
        }

        match query.order {
            Some(order) => {
                let direction = match order.direction {
                    Direction::Asc => "ASC",
                    Direction::Desc => "DESC",
                };
                builder.push(format!(" ORDER BY {} {}", order.field.column(), direction));
                match order.field {
                    OrderField::PublishAt => {
                        builder.push(format!(" NULLS LAST, serial_number {}", direction));
                    }
                    OrderField::CreatedAt => {
                        builder.push(format!(", serial_number {}", direction));
                    }
                    OrderField::SerialNumber => {}
                }
            }
            None => {
                builder.push(" ORDER BY serial_number ASC");
            }
        }

        if let Some(limit) = query.limit {
            builder.push(" LIMIT ").push_bind(limit as i64);
        }

        self.fetch_entries(builder, "Database error selecting entries")
            .await
    }

    async fn find(&self, id: &EntryId) -> RepositoryResult<Option<CopyEntry>> {
        let query = format!("SELECT {ENTRY_COLUMNS} FROM copy_entries WHERE id = $1");
        let row = sqlx::query_as::<_, EntryRow>(&query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::infrastructure("Database error finding entry", e))?;

        row.map(CopyEntry::try_from).transpose()
    }

    async fn insert(&self, record: EntryRecord) -> RepositoryResult<CopyEntry> {
        let query = format!(
            "INSERT INTO copy_entries
                (headline, copy_text, explanation, advertiser, copywriter, year_created, awards,
                 source, youtube_url, industry_tags, category_tags, key_visual_urls, status,
                 publish_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING {ENTRY_COLUMNS}"
        );
        let content = &record.content;

        let row = sqlx::query_as::<_, EntryRow>(&query)
            .bind(&content.headline)
            .bind(&content.copy_text)
            .bind(&content.explanation)
            .bind(&content.advertiser)
            .bind(&content.copywriter)
            .bind(content.year_created)
            .bind(&content.awards)
            .bind(sqlx::types::Json(&content.sources))
            .bind(&content.youtube_url)
            .bind(content.industry_tags.as_slice())
            .bind(content.category_tags.as_slice())
            .bind(stored_paths(&record))
            .bind(content.status.as_str())
            .bind(content.publish_at)
            .bind(record.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::infrastructure("Database error inserting entry", e))?;

        CopyEntry::try_from(row)
    }

    async fn update(&self, id: &EntryId, record: EntryRecord) -> RepositoryResult<CopyEntry> {
        let query = format!(
            "UPDATE copy_entries SET
                headline = $2, copy_text = $3, explanation = $4, advertiser = $5,
                copywriter = $6, year_created = $7, awards = $8, source = $9,
                youtube_url = $10, industry_tags = $11, category_tags = $12,
                key_visual_urls = $13, status = $14, publish_at = $15, updated_at = $16
             WHERE id = $1
             RETURNING {ENTRY_COLUMNS}"
        );
        let content = &record.content;

        let row = sqlx::query_as::<_, EntryRow>(&query)
            .bind(id.as_uuid())
            .bind(&content.headline)
            .bind(&content.copy_text)
            .bind(&content.explanation)
            .bind(&content.advertiser)
            .bind(&content.copywriter)
            .bind(content.year_created)
            .bind(&content.awards)
            .bind(sqlx::types::Json(&content.sources))
            .bind(&content.youtube_url)
            .bind(content.industry_tags.as_slice())
            .bind(content.category_tags.as_slice())
            .bind(stored_paths(&record))
            .bind(content.status.as_str())
            .bind(content.publish_at)
            .bind(record.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::infrastructure("Database error updating entry", e))?
            .ok_or(RepositoryError::EntryNotFound { id: *id })?;

        CopyEntry::try_from(row)
    }

    async fn delete(&self, id: &EntryId) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM copy_entries WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::infrastructure("Database error deleting entry", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::EntryNotFound { id: *id });
        }
        Ok(())
    }
}
