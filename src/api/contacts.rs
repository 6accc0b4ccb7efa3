use crate::AppState;
use crate::error::ApiError;
use crate::models::{ContactRecord, ContactSubmission};
use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use super::content::validation_error;

/// POST /api/contact: public submission endpoint.
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(submission): Json<ContactSubmission>,
) -> Result<Json<Value>, ApiError> {
    let submission = submission.sanitized();
    submission
        .validate()
        .map_err(|err| validation_error(&state, err))?;

    let record = state.contacts.create(submission).await?;

    // Email is fire-and-forget; the response never waits on SMTP.
    if state.mailer.is_some() {
        let state = state.clone();
        let contact = record.clone();
        tokio::spawn(async move {
            if let Some(mailer) = &state.mailer {
                if let Err(err) = mailer.send_contact_notification(&contact).await {
                    tracing::error!(error = %err, "Contact notification email failed");
                }
            }
        });
    }

    state.events.new_contact(&record);

    Ok(Json(json!({
        "success": true,
        "message": "Message sent successfully",
        "id": record.id,
    })))
}

/// GET /api/contacts
pub async fn list_contacts(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContactRecord>>, ApiError> {
    Ok(Json(state.contacts.list().await?))
}

/// GET /api/contacts/unread-count
pub async fn unread_count(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let count = state.contacts.unread_count().await?;
    Ok(Json(json!({ "count": count })))
}

/// PATCH /api/contacts/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !state.contacts.mark_read(&id).await? {
        return Err(ApiError::not_found("Contact"));
    }
    Ok(Json(json!({ "success": true })))
}

/// DELETE /api/contacts/{id}
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !state.contacts.delete(&id).await? {
        return Err(ApiError::not_found("Contact"));
    }
    Ok(Json(json!({ "success": true })))
}
