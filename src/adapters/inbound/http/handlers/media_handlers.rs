use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::debug;

use crate::{
    adapters::inbound::http::{
        dto::{ErrorResponseDto, MediaQueryDto},
        router::AppState,
    },
    domain::{errors::StorageError, value_objects::ImagePath},
};

type ErrorResponse = (StatusCode, Json<ErrorResponseDto>);

fn media_not_found() -> ErrorResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponseDto::not_found("Media not found")),
    )
}

/// Serve an image behind a locally signed URL
pub async fn get_media(
    State(app_state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<MediaQueryDto>,
) -> Result<Response, ErrorResponse> {
    // Only available when this server signs its own URLs
    let signer = app_state.media_signer.as_ref().ok_or_else(media_not_found)?;
    let image_path = ImagePath::new(path).map_err(|_| media_not_found())?;

    let (expires, signature) = match (query.expires, query.signature.as_deref()) {
        (Some(expires), Some(signature)) => (expires, signature),
        _ => {
            return Err((
                StatusCode::FORBIDDEN,
                Json(ErrorResponseDto::forbidden("Missing signature")),
            ))
        }
    };

    signer
        .verify(&image_path, expires, signature, Utc::now())
        .map_err(|e| {
            debug!(path = %image_path, error = %e, "Rejected media request");
            (
                StatusCode::FORBIDDEN,
                Json(ErrorResponseDto::forbidden(&e.to_string())),
            )
        })?;

    let object = app_state
        .store
        .download(&image_path)
        .await
        .map_err(|e| match e {
            StorageError::ObjectNotFound { .. } => media_not_found(),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponseDto::internal_error(&other.to_string())),
            ),
        })?;

    let content_type = object
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "private, max-age=300".to_string()),
        ],
        object.data,
    )
        .into_response())
}
