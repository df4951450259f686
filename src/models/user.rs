//! User models for admin authentication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User stored in database.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// User info response (returned by login and /auth/me).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email.unwrap_or_default(),
            role: u.role.unwrap_or_default(),
        }
    }
}

/// Identity attached to a request by the API auth gate.
///
/// Present in request extensions only after the gate verified the token and
/// found a matching active user. `email` and `role` fall back to `""` when the
/// underlying columns are NULL, so downstream checks compare plain strings.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RequestIdentity {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl RequestIdentity {
    /// Build an identity from a user record, defaulting absent fields.
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone().unwrap_or_default(),
            role: user.role.clone().unwrap_or_default(),
        }
    }
}

/// Login request body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response body. The same token is also set as the `admin_token`
/// cookie so page navigation and API calls share one session.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Admin session JWT claims.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iss: String,
    pub exp: usize,
    pub iat: usize,
    pub username: String,
    pub role: String,
}
