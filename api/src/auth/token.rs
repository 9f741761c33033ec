//! Password hashing and signed access tokens
//!
//! Tokens are HMAC-SHA256 over a base64 JSON payload carrying the user id,
//! role, and expiry. Verification is constant-time via the Mac trait.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::entities::Role;

type HmacSha256 = Hmac<Sha256>;

/// Claims carried inside an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id
    pub sub: Uuid,
    pub role: Role,
    /// Expiry as unix seconds
    pub exp: i64,
}

/// Generate a random password salt
pub fn generate_salt() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..16).map(|_| rng.gen()).collect();
    hex::encode(bytes)
}

/// Hash a password with its salt for storage
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check a password against a stored hash
pub fn verify_password(password: &str, salt: &str, stored_hash: &str) -> bool {
    hash_password(password, salt) == stored_hash
}

/// Issue a signed access token
pub fn issue_token(user_id: Uuid, role: Role, secret: &str, ttl_secs: i64) -> String {
    let claims = TokenClaims {
        sub: user_id,
        role,
        exp: Utc::now().timestamp() + ttl_secs,
    };

    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).expect("claims serialize"));

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    format!("{}.{}", payload, signature)
}

/// Verify a token's signature and expiry, returning its claims
pub fn verify_token(token: &str, secret: &str) -> Result<TokenClaims, String> {
    let (payload, signature) = token
        .split_once('.')
        .ok_or_else(|| "Malformed token".to_string())?;

    let signature_bytes = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| "Malformed signature".to_string())?;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature_bytes)
        .map_err(|_| "Invalid signature".to_string())?;

    let payload_bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| "Malformed payload".to_string())?;
    let claims: TokenClaims =
        serde_json::from_slice(&payload_bytes).map_err(|_| "Malformed claims".to_string())?;

    if claims.exp < Utc::now().timestamp() {
        return Err("Token expired".to_string());
    }

    Ok(claims)
}
