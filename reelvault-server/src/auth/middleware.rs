use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use reelvault_model::{User, UserRole};

use super::jwt::validate_token;
use crate::infra::{AppError, AppState};

/// Resolve the bearer token into a live account and stash it in extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&request)?;
    let user = validate_and_get_user(&state, &token).await?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Like [`auth_middleware`] but anonymous requests pass through untouched.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Ok(token) = extract_bearer_token(&request)
        && let Ok(user) = validate_and_get_user(&state, &token).await
    {
        request.extensions_mut().insert(user);
    }

    next.run(request).await
}

/// Must run after `auth_middleware` in the layer stack.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    require_role(&request, UserRole::Admin)?;
    Ok(next.run(request).await)
}

/// Must run after `auth_middleware` in the layer stack.
pub async fn require_superadmin(request: Request, next: Next) -> Result<Response, AppError> {
    require_role(&request, UserRole::SuperAdmin)?;
    Ok(next.run(request).await)
}

fn require_role(request: &Request, required: UserRole) -> Result<(), AppError> {
    let user = request
        .extensions()
        .get::<User>()
        .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    if !user.role.has_permission_level(required) {
        return Err(AppError::forbidden(format!(
            "{} access required",
            required.as_str()
        )));
    }
    Ok(())
}

fn extract_bearer_token(request: &Request) -> Result<String, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(|token| token.to_string())
        .ok_or_else(|| AppError::unauthorized("Invalid authorization header"))
}

async fn validate_and_get_user(state: &AppState, token: &str) -> Result<User, AppError> {
    let claims = validate_token(token, &state.config.auth.jwt_secret)
        .map_err(|_| AppError::unauthorized("Invalid or expired token"))?;

    // The account may have been deleted or demoted since the token was
    // issued, so claims alone are never trusted for identity or role.
    state
        .users
        .get(claims.sub)
        .await?
        .ok_or_else(|| AppError::unauthorized("Account no longer exists"))
}
