//! Auth handlers
//!
//! Endpoints for registration, login, and the current profile.

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Role, User};
use crate::error::AppError;
use crate::AppState;

/// Request body for registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub display_name: String,
    pub password: String,
    /// "customer" (default) or "brigadist"
    #[serde(default)]
    pub role: Option<String>,
}

/// Public view of an account
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id.to_string(),
            email: user.email,
            display_name: user.display_name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Response body for registration
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: UserResponse,
    pub green_balance: i64,
    pub seed_balance: i64,
    pub message: String,
}

/// POST /auth/register
///
/// Create an account and its wallet.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let role: Role = match request.role.as_deref() {
        None => Role::Customer,
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::BadRequest(format!("Unknown role: {}", raw)))?,
    };

    let (user, wallet) = state
        .auth_service
        .register(&request.email, &request.display_name, &request.password, role)
        .await?;

    Ok(Json(RegisterResponse {
        user: user.into(),
        green_balance: wallet.green_balance,
        seed_balance: wallet.seed_balance,
        message: "Welcome to Canopy! Log in to receive your access token.".to_string(),
    }))
}

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response body for login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token for the Authorization header
    pub token: String,
    pub user: UserResponse,
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (user, token) = state
        .auth_service
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// GET /auth/me
pub async fn me(Extension(user): Extension<User>) -> Json<UserResponse> {
    Json(user.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_register_request_with_role() {
        let json = r#"{"email":"a@b.co","display_name":"Ana","password":"hunter22!","role":"brigadist"}"#;
        let request: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.role.as_deref(), Some("brigadist"));
    }

    #[test]
    fn parse_register_request_role_defaults_to_none() {
        let json = r#"{"email":"a@b.co","display_name":"Ana","password":"hunter22!"}"#;
        let request: RegisterRequest = serde_json::from_str(json).unwrap();
        assert!(request.role.is_none());
    }

    #[test]
    fn parse_login_request_missing_password_fails() {
        let json = r#"{"email":"a@b.co"}"#;
        let result: Result<LoginRequest, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn user_response_hides_credentials() {
        let user = crate::test_utils::test_user();
        let response: UserResponse = user.into();
        let json = serde_json::to_string(&response).unwrap();

        assert!(!json.contains("password"));
        assert!(!json.contains("hash"));
        assert!(json.contains("customer"));
    }
}
