//! Bearer token authentication middleware and role guards

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::auth::token::verify_token;
use crate::domain::entities::User;
use crate::error::AppError;
use crate::AppState;

/// Extract the bearer token from the Authorization header
fn extract_bearer(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Authentication middleware
///
/// Validates the access token and injects the User into request extensions.
/// Routes that require authentication should use this middleware.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer(&request).ok_or(AppError::Unauthorized)?;

    let claims =
        verify_token(token, &state.config.token_secret).map_err(|_| AppError::Unauthorized)?;

    // The token is signed, but the user row is still the source of truth
    let user = state
        .auth_service
        .find_by_id(&claims.sub.into())
        .await?
        .ok_or(AppError::Unauthorized)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Guard layer for admin-only routes; runs after `auth_middleware`
pub async fn require_admin(request: Request<Body>, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<User>()
        .ok_or(AppError::Unauthorized)?;

    if user.role != crate::domain::entities::Role::Admin {
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}

/// Guard layer for field routes (brigadists and admins)
pub async fn require_field_role(
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<User>()
        .ok_or(AppError::Unauthorized)?;

    if !user.role.is_field_role() {
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}
