//! Authentication
//!
//! Signed bearer tokens, password hashing, and the axum middleware/guard
//! layers that enforce them.

pub mod middleware;
pub mod token;

pub use middleware::{auth_middleware, require_admin, require_field_role};
pub use token::{
    generate_salt, hash_password, issue_token, verify_password, verify_token, TokenClaims,
};
