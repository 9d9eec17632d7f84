//! Authentication routes for login, registration, and token refresh.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use forecourt_core::auth::{hash_password, verify_password};
use forecourt_core::entry::Branch;
use forecourt_db::repositories::{CreateUserInput, UserRepository};
use forecourt_db::entities::sea_orm_active_enums::UserRole;
use forecourt_shared::auth::{
    LoginRequest, LoginResponse, RefreshRequest, RegisterRequest, TokenKind, UserInfo,
};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/refresh", post(refresh))
}

/// POST /auth/login - Authenticate a worker and return tokens.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent user");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_credentials",
                    "message": "Invalid email or password"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error();
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_credentials",
                    "message": "Invalid email or password"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error();
        }
    }

    let pair = match state
        .jwt_service
        .issue_pair(user.id, user.role.as_str(), &user.branch)
    {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "Failed to issue tokens");
            return internal_error();
        }
    };

    info!(user_id = %user.id, "User logged in successfully");

    let response = LoginResponse {
        user: UserInfo {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            role: user.role.as_str().to_string(),
            branch: user.branch,
        },
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        expires_in: pair.expires_in,
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// POST /auth/register - Create a worker account.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    let Some(role) = UserRole::parse(&payload.role) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_role",
                "message": "Role must be admin, manager, or station_supervisor"
            })),
        )
            .into_response();
    };

    let Ok(branch) = payload.branch.parse::<Branch>() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_branch",
                "message": format!("Invalid branch: {}", payload.branch)
            })),
        )
            .into_response();
    };

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return internal_error();
        }
    };

    let user_repo = UserRepository::new((*state.db).clone());
    let input = CreateUserInput {
        full_name: payload.full_name,
        email: payload.email,
        password_hash,
        role,
        branch: branch.as_str().to_string(),
    };

    match user_repo.create(input).await {
        Ok(user) => {
            info!(user_id = %user.id, email = %user.email, "Created new user");
            let info = UserInfo {
                id: user.id,
                full_name: user.full_name,
                email: user.email,
                role: user.role.as_str().to_string(),
                branch: user.branch,
            };
            (StatusCode::CREATED, Json(info)).into_response()
        }
        Err(forecourt_db::repositories::UserError::EmailTaken) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "email_taken",
                "message": "User with this email already exists"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to create user");
            internal_error()
        }
    }
}

/// POST /auth/refresh - Exchange a refresh token for a new pair.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> impl IntoResponse {
    let claims = match state
        .jwt_service
        .validate_token(&payload.refresh_token, TokenKind::Refresh)
    {
        Ok(c) => c,
        Err(e) => {
            info!(error = %e, "Refresh token rejected");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_token",
                    "message": "Could not validate refresh token"
                })),
            )
                .into_response();
        }
    };

    // The account must still exist; roles may have changed since issue.
    let user_repo = UserRepository::new((*state.db).clone());
    let user = match user_repo.find_by_id(claims.user_id()).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_token",
                    "message": "Could not validate refresh token"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during token refresh");
            return internal_error();
        }
    };

    match state
        .jwt_service
        .issue_pair(user.id, user.role.as_str(), &user.branch)
    {
        Ok(pair) => (StatusCode::OK, Json(pair)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to issue tokens");
            internal_error()
        }
    }
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}
