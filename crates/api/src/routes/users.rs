//! User management routes.
//!
//! Listing and reading are open to any authenticated actor; updating
//! and deleting accounts require the admin role. The admin override
//! applies here only, never to sales or truck entries.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, put},
};
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::entries::ListQuery;
use crate::{AppState, middleware::AuthUser};
use forecourt_core::auth::hash_password;
use forecourt_core::entry::Branch;
use forecourt_db::entities::sea_orm_active_enums::UserRole;
use forecourt_db::entities::users;
use forecourt_db::repositories::{UpdateUserInput, UserRepository};
use forecourt_shared::AppError;
use forecourt_shared::auth::UserInfo;

/// Creates the user management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/me", get(current_user))
        .route("/users/{user_id}", get(get_user))
        .route("/users/{user_id}", put(update_user))
        .route("/users/{user_id}", delete(delete_user))
}

/// Request body for updating a worker account.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    /// New full name.
    pub full_name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New password (hashed before storage).
    pub password: Option<String>,
    /// New role.
    pub role: Option<String>,
    /// New branch assignment.
    pub branch: Option<String>,
}

fn user_info(user: users::Model) -> UserInfo {
    UserInfo {
        id: user.id,
        full_name: user.full_name,
        email: user.email,
        role: user.role.as_str().to_string(),
        branch: user.branch,
    }
}

/// GET /users - List worker accounts with pagination.
async fn list_users(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = UserRepository::new((*state.db).clone());
    let users = repo
        .list(query.skip, query.effective_limit())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to list users");
            ApiError::from(e)
        })?;

    let items: Vec<UserInfo> = users.into_iter().map(user_info).collect();

    Ok((StatusCode::OK, Json(items)))
}

/// GET /users/me - The authenticated actor's own account.
async fn current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let repo = UserRepository::new((*state.db).clone());
    let user = repo
        .find_by_id(auth.user_id())
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok((StatusCode::OK, Json(user_info(user))))
}

/// GET /users/{user_id} - One worker account.
async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = UserRepository::new((*state.db).clone());
    let user = repo
        .find_by_id(user_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok((StatusCode::OK, Json(user_info(user))))
}

/// PUT /users/{user_id} - Update a worker account. Admin only.
async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !auth.is_admin() {
        return Err(AppError::Forbidden("Not authorized to update this user".to_string()).into());
    }

    let role = match payload.role.as_deref() {
        Some(r) => Some(UserRole::parse(r).ok_or_else(|| {
            AppError::Validation(
                "Role must be admin, manager, or station_supervisor".to_string(),
            )
        })?),
        None => None,
    };

    let branch = match payload.branch.as_deref() {
        Some(b) => Some(
            b.parse::<Branch>()
                .map_err(|_| AppError::Validation(format!("Invalid branch: {b}")))?
                .as_str()
                .to_string(),
        ),
        None => None,
    };

    let password_hash = match payload.password.as_deref() {
        Some(p) => Some(hash_password(p).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            AppError::Internal("Failed to hash password".to_string())
        })?),
        None => None,
    };

    let repo = UserRepository::new((*state.db).clone());
    let input = UpdateUserInput {
        full_name: payload.full_name,
        email: payload.email,
        password_hash,
        role,
        branch,
    };

    let user = repo.update(user_id, input).await.map_err(|e| {
        error!(error = %e, user_id = %user_id, "Failed to update user");
        ApiError::from(e)
    })?;

    info!(user_id = %user_id, "Updated user");

    Ok((StatusCode::OK, Json(user_info(user))))
}

/// DELETE /users/{user_id} - Remove a worker account. Admin only.
async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !auth.is_admin() {
        return Err(AppError::Forbidden("Not authorized to delete this user".to_string()).into());
    }

    let repo = UserRepository::new((*state.db).clone());
    repo.delete(user_id).await.map_err(|e| {
        error!(error = %e, user_id = %user_id, "Failed to delete user");
        ApiError::from(e)
    })?;

    info!(user_id = %user_id, "Deleted user");

    Ok(StatusCode::NO_CONTENT)
}
