pub mod auth;
pub mod contacts;
pub mod content;
pub mod system;
pub mod uploads;
pub mod ws;

use crate::AppState;
use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::services::ServeDir;

/// The full route table: public reads, the credential exchange, and the
/// privileged admin surface behind the bearer check.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(system::health))
        .route("/content.json", get(content::get_content))
        .route("/api/content", get(content::get_content))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/token-info", get(auth::token_info))
        .route("/api/contact", post(contacts::submit_contact))
        .route("/ws", get(ws::ws_handler));

    let privileged = Router::new()
        .route("/api/content/update", post(content::update_content))
        // Older admin clients still post to the flat route.
        .route("/api/update-content", post(content::update_content))
        .route("/api/content/backup", post(content::create_backup))
        .route("/api/contacts", get(contacts::list_contacts))
        .route("/api/contacts/unread-count", get(contacts::unread_count))
        .route("/api/contacts/{id}/read", patch(contacts::mark_read))
        .route("/api/contacts/{id}", delete(contacts::delete_contact))
        .route("/api/upload", post(uploads::upload_file))
        .route("/api/upload/files", get(uploads::list_files))
        .route("/api/upload/files/{name}", delete(uploads::delete_file))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::middleware::require_admin,
        ));

    let uploads_dir = state.uploads.dir().to_path_buf();

    public
        .merge(privileged)
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .with_state(state)
}
