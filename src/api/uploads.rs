use crate::AppState;
use crate::error::ApiError;
use crate::storage::uploads::UploadedFile;
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

const ALLOWED_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/svg+xml",
    "image/webp",
];

/// POST /api/upload: multipart form with a single `file` field.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("Malformed multipart body"))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("file").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        if !ALLOWED_TYPES.contains(&content_type.as_str()) {
            return Err(ApiError::bad_request("Unsupported file type"));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|_| ApiError::bad_request("Failed to read uploaded file"))?;
        if bytes.len() as u64 > state.config.max_upload_bytes {
            return Err(ApiError::new(
                StatusCode::PAYLOAD_TOO_LARGE,
                "File too large",
            ));
        }

        let saved = state.uploads.save_file(&file_name, &bytes).await?;
        return Ok(Json(json!({
            "success": true,
            "filePath": saved.url,
            "fileName": saved.name,
            "size": saved.size,
            "mimetype": content_type,
        })));
    }

    Err(ApiError::bad_request("No file uploaded"))
}

/// GET /api/upload/files
pub async fn list_files(
    State(state): State<AppState>,
) -> Result<Json<Vec<UploadedFile>>, ApiError> {
    Ok(Json(state.uploads.list().await?))
}

/// DELETE /api/upload/files/{name}
pub async fn delete_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !state.uploads.delete(&name).await? {
        return Err(ApiError::not_found("File"));
    }
    Ok(Json(json!({ "success": true })))
}
