use crate::AppState;
use crate::auth::middleware::extract_bearer;
use crate::error::ApiError;
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    admin_token: String,
}

/// POST /api/auth/login: exchange the shared secret for a signed token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let issued = state
        .tokens
        .issue(&request.admin_token)
        .map_err(|_| ApiError::unauthorized("Unauthorized"))?;

    Ok(Json(json!({
        "success": true,
        "token": issued.token,
        "expiresIn": issued.expires_in_ms,
        "message": "Authentication successful",
    })))
}

/// GET /api/auth/token-info: non-authoritative introspection for the admin
/// UI's session display.
pub async fn token_info(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    let Some(token) = extract_bearer(headers.get(header::AUTHORIZATION)) else {
        return Json(json!({"valid": false, "message": "No token provided"}));
    };

    if state.tokens.is_raw_secret(&token) {
        return Json(json!({
            "valid": true,
            "type": "direct",
            "message": "Direct admin token (no expiration)",
        }));
    }

    let valid = state.tokens.verify(&token);
    let mut body = json!({
        "valid": valid,
        "type": "signed",
        "message": if valid { "Token is valid" } else { "Token is expired or invalid" },
    });
    if let Some(info) = state.tokens.inspect(&token) {
        if let Ok(Value::Object(fields)) = serde_json::to_value(&info) {
            for (key, value) in fields {
                body[key] = value;
            }
        }
    }
    Json(body)
}
