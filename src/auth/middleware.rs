use crate::AppState;
use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Gate for privileged routes. Accepts a signed token or the raw shared
/// secret; every failure looks the same to the caller.
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let Some(token) = extract_bearer(req.headers().get(header::AUTHORIZATION)) else {
        return unauthorized();
    };

    if !state.tokens.authorize_bearer(&token) {
        return unauthorized();
    }

    next.run(req).await
}

pub fn extract_bearer(header: Option<&HeaderValue>) -> Option<String> {
    let value = header?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(|token| token.trim().to_string())
}

fn unauthorized() -> Response {
    ApiError::unauthorized("Unauthorized").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bearer_value() {
        let value = HeaderValue::from_static("Bearer abc.def");
        assert_eq!(extract_bearer(Some(&value)), Some("abc.def".to_string()));

        let lower = HeaderValue::from_static("bearer  raw-secret ");
        assert_eq!(extract_bearer(Some(&lower)), Some("raw-secret".to_string()));
    }

    #[test]
    fn rejects_missing_or_unprefixed_header() {
        assert_eq!(extract_bearer(None), None);
        let value = HeaderValue::from_static("Basic dXNlcg==");
        assert_eq!(extract_bearer(Some(&value)), None);
    }
}
