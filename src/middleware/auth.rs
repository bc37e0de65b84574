//! Authentication extractor for Axum.
//!
//! Validates the bearer token against the token signer, loads the caller's
//! account, and hands it to handlers as `CurrentUser`.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use campus_core::{CampusStore, Error, TokenSigner, User};
use serde::Serialize;
use std::sync::Arc;

/// JSON error response for auth failures
#[derive(Debug, Serialize)]
struct AuthErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl AuthErrorResponse {
    fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: code.into(),
        }
    }
}

/// Auth rejection type
pub struct AuthRejection {
    status: StatusCode,
    body: AuthErrorResponse,
}

impl AuthRejection {
    fn missing() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            body: AuthErrorResponse::new(
                "Authentication required. Provide Authorization: Bearer <token>.",
                "UNAUTHORIZED",
            ),
        }
    }

    fn invalid() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            body: AuthErrorResponse::new("Invalid or expired token", "INVALID_CREDENTIALS"),
        }
    }

    fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: AuthErrorResponse::new(msg, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Axum extractor that requires an authenticated caller.
///
/// Extracts the token from:
/// 1. `Authorization: Bearer <token>` header
/// 2. `?token=<token>` query parameter, WebSocket upgrade requests only
pub struct CurrentUser(pub User);

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let token = extract_token(parts).ok_or_else(AuthRejection::missing)?;
        authenticate(parts, &token).await.map(CurrentUser)
    }
}

async fn authenticate(parts: &Parts, token: &str) -> std::result::Result<User, AuthRejection> {
    let signer = parts
        .extensions
        .get::<Arc<TokenSigner>>()
        .ok_or_else(|| AuthRejection::internal("TokenSigner not configured"))?;
    let store = parts
        .extensions
        .get::<Arc<CampusStore>>()
        .ok_or_else(|| AuthRejection::internal("CampusStore not configured"))?;

    let user_id = signer.verify(token).map_err(|_| AuthRejection::invalid())?;

    // A valid token for a deleted account is still unauthenticated
    match store.get_user(user_id).await {
        Ok(user) => Ok(user),
        Err(Error::NotFound(_)) => Err(AuthRejection::invalid()),
        Err(e) => Err(AuthRejection::internal(e.to_string())),
    }
}

/// Extract token from request headers or query params
fn extract_token(parts: &Parts) -> Option<String> {
    // 1. Authorization: Bearer <token>
    if let Some(auth_header) = parts.headers.get("authorization") {
        if let Ok(value) = auth_header.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token.trim().to_string());
            }
        }
    }

    // 2. ?token= query parameter. Browsers cannot set headers on a
    // WebSocket handshake, so upgrade requests may carry the token in the
    // query string; plain REST calls may not, keeping tokens out of
    // access logs.
    if is_websocket_upgrade(parts) {
        if let Some(query) = parts.uri.query() {
            for param in query.split('&') {
                if let Some(token) = param.strip_prefix("token=") {
                    return Some(token.to_string());
                }
            }
        }
    }

    None
}

fn is_websocket_upgrade(parts: &Parts) -> bool {
    parts
        .headers
        .get("upgrade")
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v.eq_ignore_ascii_case("websocket"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_for(uri: &str, headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_header_token_extracted() {
        let parts = parts_for("/api/events", &[("authorization", "Bearer tok123")]);
        assert_eq!(extract_token(&parts), Some("tok123".to_string()));
    }

    #[test]
    fn test_query_token_rejected_on_plain_requests() {
        let parts = parts_for("/api/events?token=tok123", &[]);
        assert_eq!(extract_token(&parts), None);
    }

    #[test]
    fn test_query_token_accepted_on_websocket_upgrade() {
        let parts = parts_for(
            "/ws/live?token=tok123",
            &[("connection", "Upgrade"), ("upgrade", "websocket")],
        );
        assert_eq!(extract_token(&parts), Some("tok123".to_string()));
    }

    #[test]
    fn test_missing_rejection_is_unauthorized() {
        let rejection = AuthRejection::missing();
        assert_eq!(rejection.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_invalid_rejection_is_unauthorized() {
        let rejection = AuthRejection::invalid();
        assert_eq!(rejection.status, StatusCode::UNAUTHORIZED);
        assert_eq!(rejection.body.code, "INVALID_CREDENTIALS");
    }
}
