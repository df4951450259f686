//! Cookie gate for admin page navigation.
//!
//! Guards every path under `/admin` except the login page. Browsers get a
//! 302 to the login page instead of a JSON error, for every failure mode.
//! The role claim inside the cookie is trusted as-is; no user lookup.

use std::future::{Ready, ready};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header;
use actix_web::{Error, HttpResponse, web};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, error};

use crate::config::{ADMIN_LOGIN_PATH, ADMIN_PATH_PREFIX, ADMIN_TOKEN_COOKIE, Config};

/// Role claim required for page access. Deliberately narrower than the API
/// role gate's allow-list: page sessions require the lowercase spelling.
const PAGE_ADMIN_ROLE: &str = "admin";

/// Whether the gate applies to a path. Plain prefix matching, so `/admin`
/// itself and nested paths are guarded while `/admin/login` and everything
/// under it stay reachable.
fn is_guarded_path(path: &str) -> bool {
    path.starts_with(ADMIN_PATH_PREFIX) && !path.starts_with(ADMIN_LOGIN_PATH)
}

/// Admin page gate middleware factory.
pub struct AdminPageGate;

impl<S, B> Transform<S, ServiceRequest> for AdminPageGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminPageGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminPageGateMiddleware { service }))
    }
}

/// Admin page gate middleware service.
pub struct AdminPageGateMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AdminPageGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if is_guarded_path(req.path()) && !self.session_is_admin(&req) {
            let resp = HttpResponse::Found()
                .insert_header((header::LOCATION, ADMIN_LOGIN_PATH))
                .finish();
            let res = req.into_response(resp).map_into_right_body();
            return Box::pin(async move { Ok(res) });
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}

impl<S> AdminPageGateMiddleware<S> {
    /// Check the `admin_token` cookie. Missing cookie, failed verification
    /// and a non-`admin` role claim all answer the same way: redirect.
    fn session_is_admin(&self, req: &ServiceRequest) -> bool {
        let Some(cookie) = req.cookie(ADMIN_TOKEN_COOKIE) else {
            debug!(target: "auth", path = %req.path(), "No session cookie, redirecting to login");
            return false;
        };

        let Some(config) = req.app_data::<web::Data<Config>>() else {
            // Fail closed: without a secret nothing can be verified.
            error!(target: "auth", "Config not registered in app data");
            return false;
        };

        let claims = match crate::auth::verify_admin_token(cookie.value(), &config.auth.token_secret)
        {
            Ok(c) => c,
            Err(reason) => {
                debug!(target: "auth", path = %req.path(), "Session cookie rejected: {}", reason);
                return false;
            }
        };

        if claims.role != PAGE_ADMIN_ROLE {
            debug!(
                target: "auth",
                path = %req.path(),
                role = %claims.role,
                "Session role is not page-admin, redirecting to login"
            );
            return false;
        }

        true
    }
}
