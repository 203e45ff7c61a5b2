use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use tracing::warn;

use crate::{
    adapters::inbound::http::{
        dto::{EntryDeletionDto, EntryDto, EntryUpdateDto, ErrorResponseDto},
        router::AppState,
    },
    domain::{
        models::{CopyEntry, EntryForm, ImageUpload},
        value_objects::{EntryId, ImagePath},
    },
};

type ErrorResponse = (StatusCode, Json<ErrorResponseDto>);

/// Everything an admin form post carries
struct Submission {
    form: EntryForm,
    files: Vec<ImageUpload>,
    delete_images: Vec<String>,
}

fn bad_request(message: String) -> ErrorResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponseDto::bad_request(&message)),
    )
}

fn entry_not_found(id: &str) -> ErrorResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponseDto::not_found(&format!(
            "Copy entry not found: {}",
            id
        ))),
    )
}

/// Split a multipart body into text fields, `files` parts and `delete_images` values
async fn read_submission(mut multipart: Multipart) -> Result<Submission, ErrorResponse> {
    let mut submission = Submission {
        form: EntryForm::new(),
        files: Vec::new(),
        delete_images: Vec::new(),
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "files" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(format!("Failed to read uploaded file: {}", e)))?;

                // Browsers submit an empty part when no file was chosen
                if data.is_empty() {
                    continue;
                }

                submission.files.push(ImageUpload {
                    file_name,
                    content_type,
                    data,
                });
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| bad_request(format!("Invalid form field '{}': {}", name, e)))?;

                if name == "delete_images" {
                    if !value.trim().is_empty() {
                        submission.delete_images.push(value);
                    }
                } else {
                    submission.form.set(&name, &value);
                }
            }
        }
    }

    Ok(submission)
}

async fn load_entry(app_state: &AppState, id: &str) -> Result<CopyEntry, ErrorResponse> {
    let entry_id = EntryId::parse(id).map_err(|_| entry_not_found(id))?;

    app_state
        .lifecycle_service
        .get(&entry_id)
        .await
        .map_err(|e| {
            (
                StatusCode::from(&e),
                Json(ErrorResponseDto::from_repository_error(&e)),
            )
        })?
        .ok_or_else(|| entry_not_found(id))
}

/// List every entry for the admin screen, newest first
pub async fn list_entries(
    State(app_state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<EntryDto>>), ErrorResponse> {
    let entries = app_state.lifecycle_service.list_all().await.map_err(|e| {
        (
            StatusCode::from(&e),
            Json(ErrorResponseDto::from_repository_error(&e)),
        )
    })?;

    Ok((
        StatusCode::OK,
        Json(entries.into_iter().map(EntryDto::from).collect()),
    ))
}

/// Fetch one entry for editing
pub async fn get_entry(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<EntryDto>), ErrorResponse> {
    let entry = load_entry(&app_state, &id).await?;
    Ok((StatusCode::OK, Json(entry.into())))
}

/// Handle entry creation
pub async fn create_entry(
    State(app_state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<EntryDto>), ErrorResponse> {
    let submission = read_submission(multipart).await?;
    let content = submission
        .form
        .parse()
        .map_err(|e| bad_request(format!("Invalid submission: {}", e)))?;

    if !submission.delete_images.is_empty() {
        warn!(
            count = submission.delete_images.len(),
            "Ignoring delete_images on a new entry"
        );
    }

    let entry = app_state
        .lifecycle_service
        .create(content, submission.files)
        .await
        .map_err(|e| {
            (
                StatusCode::from(&e),
                Json(ErrorResponseDto::from_lifecycle_error(&e)),
            )
        })?;

    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// Handle entry update
pub async fn update_entry(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<EntryUpdateDto>), ErrorResponse> {
    let existing = load_entry(&app_state, &id).await?;

    let submission = read_submission(multipart).await?;
    let content = submission
        .form
        .parse()
        .map_err(|e| bad_request(format!("Invalid submission: {}", e)))?;

    let images_to_delete = submission
        .delete_images
        .iter()
        .map(|raw| ImagePath::normalize(raw))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| bad_request(format!("Invalid image to delete: {}", e)))?;

    let update = app_state
        .lifecycle_service
        .update(&existing, content, submission.files, images_to_delete)
        .await
        .map_err(|e| {
            (
                StatusCode::from(&e),
                Json(ErrorResponseDto::from_lifecycle_error(&e)),
            )
        })?;

    Ok((StatusCode::OK, Json(update.into())))
}

/// Handle entry deletion
pub async fn delete_entry(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<EntryDeletionDto>), ErrorResponse> {
    let existing = load_entry(&app_state, &id).await?;

    let deletion = app_state
        .lifecycle_service
        .delete(&existing)
        .await
        .map_err(|e| {
            (
                StatusCode::from(&e),
                Json(ErrorResponseDto::from_lifecycle_error(&e)),
            )
        })?;

    Ok((StatusCode::OK, Json(deletion.into())))
}
