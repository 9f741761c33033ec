//! Auth service
//!
//! Handles registration, login, and token issuance. Every new account gets
//! an empty wallet in the same flow.

use std::sync::Arc;

use regex::Regex;

use crate::auth::{generate_salt, hash_password, issue_token, verify_password};
use crate::domain::entities::{NewUser, Role, User, UserId, Wallet};
use crate::domain::ports::{UserRepository, WalletRepository};
use crate::error::{AppError, DomainError};

/// Service for accounts and credentials
pub struct AuthService<UR, WR>
where
    UR: UserRepository,
    WR: WalletRepository,
{
    users: Arc<UR>,
    wallets: Arc<WR>,
    token_secret: String,
    token_ttl_secs: i64,
    email_re: Regex,
}

impl<UR, WR> AuthService<UR, WR>
where
    UR: UserRepository,
    WR: WalletRepository,
{
    pub fn new(users: Arc<UR>, wallets: Arc<WR>, token_secret: String, token_ttl_secs: i64) -> Self {
        Self {
            users,
            wallets,
            token_secret,
            token_ttl_secs,
            email_re: Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"),
        }
    }

    /// Register a new account and its wallet
    ///
    /// Self-registration is limited to customer and brigadist roles.
    pub async fn register(
        &self,
        email: &str,
        display_name: &str,
        password: &str,
        role: Role,
    ) -> Result<(User, Wallet), AppError> {
        if !self.email_re.is_match(email) {
            return Err(AppError::BadRequest(format!("Invalid email: {}", email)));
        }
        if password.len() < 8 {
            return Err(AppError::BadRequest(
                "Password must be at least 8 characters".to_string(),
            ));
        }
        if display_name.is_empty() || display_name.len() > 100 {
            return Err(AppError::BadRequest(
                "Display name must be between 1 and 100 characters".to_string(),
            ));
        }
        if role == Role::Admin {
            // Admins are provisioned out of band
            return Err(AppError::Forbidden);
        }

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                "Account with email '{}' already exists",
                email
            ))));
        }

        let salt = generate_salt();
        let hash = hash_password(password, &salt);

        let new_user = NewUser {
            email: email.to_string(),
            display_name: display_name.to_string(),
            password_hash: hash,
            password_salt: salt,
            role,
        };

        let user = self.users.create(&new_user).await?;
        let wallet = self.wallets.create(&user.id).await?;

        Ok((user, wallet))
    }

    /// Verify credentials and issue an access token
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AppError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password_salt, &user.password_hash) {
            return Err(AppError::Unauthorized);
        }

        let token = issue_token(user.id.0, user.role, &self.token_secret, self.token_ttl_secs);

        Ok((user, token))
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AppError> {
        Ok(self.users.find_by_id(id).await?)
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.find_by_email(email).await?)
    }
}
