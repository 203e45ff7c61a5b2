use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    adapters::inbound::http::{
        dto::{
            EntryDetailDto, EntryDto, EntrySummaryDto, ErrorResponseDto, LatestQueryDto,
            ListingQueryDto, ListingResponseDto,
        },
        router::AppState,
    },
    domain::{
        errors::ListingError,
        models::{paginate, PageRequest, TagFilter},
        value_objects::EntryId,
    },
};

type ErrorResponse = (StatusCode, Json<ErrorResponseDto>);

const DEFAULT_LATEST_LIMIT: usize = 5;
const MAX_LATEST_LIMIT: usize = 20;

fn listing_error(e: ListingError) -> ErrorResponse {
    let status = match &e {
        ListingError::Repository(source) => StatusCode::from(source),
    };
    (status, Json(ErrorResponseDto::from_listing_error(&e)))
}

fn not_found(id: &str) -> ErrorResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponseDto::not_found(&format!(
            "Copy entry not found: {}",
            id
        ))),
    )
}

/// Published entries filtered by tag and paginated
pub async fn list_published(
    State(app_state): State<AppState>,
    Query(query): Query<ListingQueryDto>,
) -> Result<(StatusCode, Json<ListingResponseDto>), ErrorResponse> {
    let listing = app_state
        .listing_service
        .listing()
        .await
        .map_err(listing_error)?;

    let filter = TagFilter {
        industry: query.industry,
        category: query.category,
    };
    let matching: Vec<EntrySummaryDto> = listing
        .filter(&filter)
        .into_iter()
        .map(EntrySummaryDto::from)
        .collect();
    let page = paginate(matching, PageRequest::new(query.page, query.per_page));

    Ok((
        StatusCode::OK,
        Json(ListingResponseDto::new(
            page,
            listing.industry_tags.into(),
            listing.category_tags.into(),
        )),
    ))
}

/// Most recently published entries
pub async fn list_latest(
    State(app_state): State<AppState>,
    Query(query): Query<LatestQueryDto>,
) -> Result<(StatusCode, Json<Vec<EntryDto>>), ErrorResponse> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LATEST_LIMIT)
        .clamp(1, MAX_LATEST_LIMIT);

    let entries = app_state
        .listing_service
        .latest(limit)
        .await
        .map_err(listing_error)?;

    Ok((
        StatusCode::OK,
        Json(entries.into_iter().map(EntryDto::from).collect()),
    ))
}

/// One published entry. Malformed ids are answered without a lookup.
pub async fn get_published(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<EntryDetailDto>), ErrorResponse> {
    let entry_id = EntryId::parse(&id).map_err(|_| not_found(&id))?;

    let detail = app_state
        .listing_service
        .detail(&entry_id)
        .await
        .map_err(listing_error)?
        .ok_or_else(|| not_found(&id))?;

    Ok((StatusCode::OK, Json(detail.into())))
}
