//! Admin session tokens (HS256 JWT) shared by the API gate and the page gate.

use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};

use crate::config::ADMIN_TOKEN_COOKIE;
use crate::error::{AppError, AppResult};
use crate::models::user::TokenClaims;

/// Issuer claim stamped into every admin token.
pub const TOKEN_ISSUER: &str = "minimall-admin";

/// Create a signed admin session token.
pub fn create_admin_token(
    user_id: &str,
    username: &str,
    role: &str,
    secret: &SecretString,
    ttl_secs: u64,
) -> AppResult<String> {
    let now = chrono::Utc::now();
    let exp = now + chrono::Duration::seconds(ttl_secs as i64);

    let claims = TokenClaims {
        sub: user_id.to_string(),
        iss: TOKEN_ISSUER.to_string(),
        exp: exp.timestamp() as usize,
        iat: now.timestamp() as usize,
        username: username.to_string(),
        role: role.to_string(),
    };

    let key = EncodingKey::from_secret(secret.expose_secret().as_bytes());
    encode(&Header::default(), &claims, &key)
        .map_err(|e| AppError::InvalidInput(format!("Failed to create session token: {}", e)))
}

/// Verify an admin session token and return its claims.
///
/// Malformed tokens, bad signatures and expired tokens all come back as the
/// same `Err` so callers cannot distinguish them; the error text is for logs
/// only and never reaches a client.
pub fn verify_admin_token(token: &str, secret: &SecretString) -> Result<TokenClaims, String> {
    let key = DecodingKey::from_secret(secret.expose_secret().as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[TOKEN_ISSUER]);
    validation.validate_aud = false;

    let token_data = decode::<TokenClaims>(token, &key, &validation)
        .map_err(|e| format!("Invalid session token: {}", e))?;

    Ok(token_data.claims)
}

/// Build the `admin_token` session cookie.
pub fn session_cookie(token: String, is_production: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(ADMIN_TOKEN_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(is_production);
    cookie
}

/// Build a cookie that clears the admin session.
pub fn clear_session_cookie(is_production: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(ADMIN_TOKEN_COOKIE, "");
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(is_production);
    cookie.set_max_age(actix_web::cookie::time::Duration::ZERO);
    cookie
}
