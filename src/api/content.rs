use crate::AppState;
use crate::error::ApiError;
use crate::models::ContentDocument;
use crate::services::sorter::sort_by_end_date;
use axum::{Json, extract::State};
use chrono::Utc;
use serde_json::{Value, json};

/// GET /api/content and /content.json: the public document.
pub async fn get_content(
    State(state): State<AppState>,
) -> Result<Json<ContentDocument>, ApiError> {
    let document = state
        .content
        .load()
        .await?
        .ok_or_else(|| ApiError::not_found("Content"))?;
    Ok(Json(document))
}

/// POST /api/content/update: validate, order the dated lists, persist,
/// then notify listeners.
pub async fn update_content(
    State(state): State<AppState>,
    Json(mut document): Json<ContentDocument>,
) -> Result<Json<Value>, ApiError> {
    document
        .validate()
        .map_err(|err| validation_error(&state, err))?;

    document.education = sort_by_end_date(&document.education, |entry| Some(entry.years.as_str()));
    document.experience =
        sort_by_end_date(&document.experience, |entry| Some(entry.years.as_str()));

    state.content.save(&document).await?;
    // Broadcast only after the save is durable.
    state.events.content_updated();

    Ok(Json(json!({
        "success": true,
        "message": "Content updated successfully",
        "timestamp": Utc::now(),
    })))
}

/// POST /api/content/backup: snapshot the current document on demand.
pub async fn create_backup(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let backup = state
        .content
        .backup_current()
        .await?
        .ok_or_else(|| ApiError::not_found("Content"))?;

    Ok(Json(json!({
        "success": true,
        "message": "Backup created",
        "backupPath": backup,
    })))
}

/// Field-level validation detail is only shown outside production.
pub(crate) fn validation_error(state: &AppState, err: anyhow::Error) -> ApiError {
    if state.config.is_production() {
        ApiError::bad_request("Invalid request body")
    } else {
        ApiError::bad_request(err.to_string())
    }
}
