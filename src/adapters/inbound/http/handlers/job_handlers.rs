use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde_json::json;
use tracing::warn;

use crate::{
    adapters::inbound::http::{
        dto::{
            DeliveryReportDto, ErrorResponseDto, GeneratedDraftDto, SuccessResponseDto,
            WebhookPayloadDto,
        },
        router::AppState,
    },
    domain::errors::{DeliveryError, GenerationError},
};

type ErrorResponse = (StatusCode, Json<ErrorResponseDto>);

/// Run one delivery pass
pub async fn run_delivery(
    State(app_state): State<AppState>,
) -> Result<(StatusCode, Json<DeliveryReportDto>), ErrorResponse> {
    let report = app_state
        .delivery_service
        .deliver_due()
        .await
        .map_err(|e| {
            let status = match &e {
                DeliveryError::NoPublishedEntry => StatusCode::NOT_FOUND,
                DeliveryError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(ErrorResponseDto::from_delivery_error(&e)))
        })?;

    Ok((StatusCode::OK, Json(report.into())))
}

/// Generate and store one draft entry
pub async fn run_generation(
    State(app_state): State<AppState>,
) -> Result<(StatusCode, Json<GeneratedDraftDto>), ErrorResponse> {
    let draft = app_state
        .generation_service
        .generate_draft()
        .await
        .map_err(|e| {
            let status = match &e {
                GenerationError::Lifecycle(source) => StatusCode::from(source),
                _ => StatusCode::BAD_GATEWAY,
            };
            (status, Json(ErrorResponseDto::from_generation_error(&e)))
        })?;

    Ok((StatusCode::CREATED, Json(draft.into())))
}

/// Messaging webhook. Always acknowledged so the platform does not retry.
pub async fn messaging_webhook(
    State(app_state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<SuccessResponseDto>) {
    let payload: WebhookPayloadDto = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Unreadable webhook payload");
            WebhookPayloadDto::default()
        }
    };

    let replies = app_state
        .webhook_service
        .handle_events(payload.events)
        .await;

    (
        StatusCode::OK,
        Json(SuccessResponseDto::with_data(
            "Webhook processed",
            json!({ "replies": replies }),
        )),
    )
}
