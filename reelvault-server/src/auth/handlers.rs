use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;
use reelvault_model::{User, UserRole};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::jwt::generate_access_token;
use crate::infra::{AppError, AppResult, AppState};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

pub(crate) fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("failed to hash password: {e}")))
}

fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| AppError::internal(format!("stored password hash is invalid: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn validate_registration(request: &RegisterRequest) -> Result<(), AppError> {
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
    Ok(())
}

/// Self-service registration. Accounts always start at the lowest role;
/// promotion is a separate superadmin operation.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    validate_registration(&request)?;

    if state.users.get_by_email(&request.email).await?.is_some() {
        return Err(AppError::conflict("An account with this email exists"));
    }

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        username: request.username.trim().to_string(),
        email: request.email.to_lowercase(),
        password_hash: hash_password(&request.password)?,
        role: UserRole::User,
        created_at: now,
        updated_at: now,
    };

    state.users.create(&user).await?;
    info!(user_id = %user.id, "registered new account");

    let token = generate_access_token(
        &user,
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_secs,
    )
    .map_err(|e| AppError::internal(format!("failed to issue token: {e}")))?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let Some(user) = state
        .users
        .get_by_email(&request.email.to_lowercase())
        .await?
    else {
        return Err(AppError::unauthorized("User not found"));
    };

    if !verify_password(&request.password, &user.password_hash)? {
        return Err(AppError::unauthorized("Invalid password"));
    }

    let token = generate_access_token(
        &user,
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_secs,
    )
    .map_err(|e| AppError::internal(format!("failed to issue token: {e}")))?;

    info!(user_id = %user.id, "login succeeded");
    Ok(Json(AuthResponse { token, user }))
}

/// Token issuance is stateless, so logout is just an acknowledgement the
/// client can hang UI behavior off.
pub async fn logout() -> Json<serde_json::Value> {
    Json(json!({ "message": "Logged out" }))
}

pub async fn me(Extension(user): Extension<User>) -> Json<User> {
    Json(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_and_differ_per_salt() {
        let first = hash_password("hunter42").unwrap();
        let second = hash_password("hunter42").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("hunter42", &first).unwrap());
        assert!(!verify_password("wrong", &first).unwrap());
    }

    #[test]
    fn registration_validation_rejects_bad_input() {
        let base = RegisterRequest {
            username: "casey".to_string(),
            email: "casey@example.com".to_string(),
            password: "hunter42".to_string(),
        };
        assert!(validate_registration(&base).is_ok());

        let empty_name = RegisterRequest {
            username: "  ".to_string(),
            ..registration_clone(&base)
        };
        assert!(validate_registration(&empty_name).is_err());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            ..registration_clone(&base)
        };
        assert!(validate_registration(&bad_email).is_err());

        let short_password = RegisterRequest {
            password: "abc".to_string(),
            ..registration_clone(&base)
        };
        assert!(validate_registration(&short_password).is_err());
    }

    fn registration_clone(request: &RegisterRequest) -> RegisterRequest {
        RegisterRequest {
            username: request.username.clone(),
            email: request.email.clone(),
            password: request.password.clone(),
        }
    }
}
