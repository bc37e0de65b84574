//! Account endpoints
//!
//! POST /api/auth/register - Create an account and issue a token
//! POST /api/auth/login    - Exchange credentials for a token
//! GET  /api/auth/verify   - Return the account behind the presented token

use axum::{extract::Extension, http::StatusCode, routing::get, routing::post, Json, Router};
use campus_core::{hash_password, verify_password, CampusStore, Error, Role, TokenSigner, User};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use super::error::ApiError;
use crate::middleware::auth::CurrentUser;

/// Request to create an account
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    /// "student" (default), "organizer" or "admin"
    pub role: Option<String>,
}

/// Login credentials
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Account view for API responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.to_string(),
        }
    }
}

/// Token plus the account it belongs to
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserView,
}

/// Create the auth routes
pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/verify", get(verify))
}

/// Create an account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid input or duplicate email")
    )
)]
pub async fn register(
    Extension(store): Extension<Arc<CampusStore>>,
    Extension(signer): Extension<Arc<TokenSigner>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    validate_register(&request)?;

    let role = match request.role.as_deref() {
        Some(s) => Role::parse(s).map_err(|_| invalid("unknown role"))?,
        None => Role::default(),
    };

    let user = User::new(
        &request.email,
        hash_password(&request.password),
        request.name.trim(),
        role,
    );
    store.create_user(&user).await?;
    info!(user_id = %user.id, role = %user.role, "account created");

    let token = signer.issue(user.id)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserView::from(&user),
        }),
    ))
}

/// Exchange credentials for a token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    Extension(store): Extension<Arc<CampusStore>>,
    Extension(signer): Extension<Arc<TokenSigner>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    // Unknown email and wrong password get the same answer
    let user = store
        .find_user_by_email(&request.email)
        .await?
        .ok_or(Error::Unauthenticated)?;

    if !verify_password(&request.password, &user.password_hash) {
        return Err(Error::Unauthenticated.into());
    }

    let token = signer.issue(user.id)?;
    Ok(Json(AuthResponse {
        token,
        user: UserView::from(&user),
    }))
}

/// Return the account behind the presented token
#[utoipa::path(
    get,
    path = "/api/auth/verify",
    tag = "auth",
    responses(
        (status = 200, description = "Authenticated account", body = UserView),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_token" = []))
)]
pub async fn verify(CurrentUser(user): CurrentUser) -> Json<UserView> {
    Json(UserView::from(&user))
}

fn validate_register(request: &RegisterRequest) -> Result<(), ApiError> {
    let email = request.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(invalid("a valid email is required"));
    }
    if request.password.len() < 6 {
        return Err(invalid("password must be at least 6 characters"));
    }
    if request.name.trim().is_empty() {
        return Err(invalid("name is required"));
    }
    Ok(())
}

fn invalid(msg: &str) -> ApiError {
    ApiError(Error::Validation(msg.to_string()))
}
