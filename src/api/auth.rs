//! Admin login, logout and session introspection.

use actix_web::{HttpResponse, post, web};
use tracing::{info, warn};

use crate::auth;
use crate::config::Config;
use crate::db::{self, DbPool};
use crate::error::{AppError, AppResult};
use crate::middleware::ApiAuthGate;
use crate::models::user::{LoginRequest, LoginResponse, RequestIdentity};

/// Log in with username and password.
///
/// On success returns the session token and user info, and sets the
/// `admin_token` cookie so page navigation shares the session. Unknown
/// usernames and wrong passwords are indistinguishable to the caller.
#[utoipa::path(
    post,
    path = "/api/admin/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
#[post("/login")]
pub async fn login(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let found = db::users::find_by_username(pool.connection(), &req.username).await?;

    let Some((user, password_hash)) = found else {
        warn!(target: "auth", username = %req.username, "Login failed: unknown user");
        return Err(AppError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    };

    if !auth::password::verify_password(&req.password, &password_hash) {
        warn!(target: "auth", username = %req.username, "Login failed: wrong password");
        return Err(AppError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let role = user.role.clone().unwrap_or_default();
    let token = auth::create_admin_token(
        &user.id,
        &user.username,
        &role,
        &config.auth.token_secret,
        config.auth.token_ttl_secs,
    )?;

    // Best effort; login does not fail on a bookkeeping error.
    let _ = db::users::touch_last_login(pool.connection(), &user.id).await;

    info!(target: "auth", username = %user.username, "Login succeeded");

    let cookie = auth::token::session_cookie(token.clone(), config.environment.is_production());

    Ok(HttpResponse::Ok().cookie(cookie).json(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// Log out by clearing the session cookie.
///
/// The token itself stays valid until expiry; there is no revocation store.
#[utoipa::path(
    post,
    path = "/api/admin/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Logged out")
    )
)]
#[post("/logout")]
pub async fn logout(config: web::Data<Config>) -> HttpResponse {
    let cookie = auth::token::clear_session_cookie(config.environment.is_production());

    HttpResponse::Ok()
        .cookie(cookie)
        .json(serde_json::json!({ "message": "Logged out" }))
}

/// Echo the authenticated identity.
#[utoipa::path(
    get,
    path = "/api/admin/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current identity", body = RequestIdentity),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn me(identity: RequestIdentity) -> HttpResponse {
    HttpResponse::Ok().json(identity)
}

/// Configure auth routes. Login and logout are reachable without a session;
/// `/me` sits behind the API auth gate.
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login).service(logout).service(
        web::resource("/me")
            .wrap(ApiAuthGate)
            .route(web::get().to(me)),
    );
}
