use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use reelvault_model::{User, UserRole};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::handlers::hash_password;
use crate::infra::{AppError, AppResult, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
}

pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.users.list().await?;
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<User>> {
    let user = state
        .users
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("user {id}")))?;
    Ok(Json(user))
}

pub async fn create_user(
    State(state): State<AppState>,
    Extension(caller): Extension<User>,
    Json(request): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    // Nobody hands out a role above their own
    if !caller.role.has_permission_level(request.role) {
        return Err(AppError::forbidden(
            "Cannot create an account with a higher role than your own",
        ));
    }
    if request.username.trim().is_empty() {
        return Err(AppError::bad_request("Username must not be empty"));
    }
    if !request.email.contains('@') {
        return Err(AppError::bad_request("Email address is invalid"));
    }
    if request.password.len() < 6 {
        return Err(AppError::bad_request(
            "Password must be at least 6 characters",
        ));
    }

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        username: request.username.trim().to_string(),
        email: request.email.to_lowercase(),
        password_hash: hash_password(&request.password)?,
        role: request.role,
        created_at: now,
        updated_at: now,
    };

    state.users.create(&user).await?;
    info!(user_id = %user.id, role = user.role.as_str(), "created account");

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    let mut user = state
        .users
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("user {id}")))?;

    if let Some(username) = request.username {
        if username.trim().is_empty() {
            return Err(AppError::bad_request("Username must not be empty"));
        }
        user.username = username.trim().to_string();
    }
    if let Some(email) = request.email {
        if !email.contains('@') {
            return Err(AppError::bad_request("Email address is invalid"));
        }
        user.email = email.to_lowercase();
    }
    if let Some(password) = request.password {
        if password.len() < 6 {
            return Err(AppError::bad_request(
                "Password must be at least 6 characters",
            ));
        }
        user.password_hash = hash_password(&password)?;
    }
    if let Some(role) = request.role {
        user.role = role;
    }
    user.updated_at = Utc::now();

    state.users.update(&user).await?;
    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.users.delete(id).await? {
        return Err(AppError::not_found(format!("user {id}")));
    }
    info!(user_id = %id, "deleted account");
    Ok(StatusCode::NO_CONTENT)
}
