//! Bearer-token authentication gate for API routes.
//!
//! Verifies the `Authorization: Bearer` token, loads the referenced user and
//! attaches a [`RequestIdentity`] to the request extensions. Requests that do
//! not survive every step are answered with 401 here and never reach the
//! wrapped service.

use std::future::{Ready, ready};
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header;
use actix_web::{Error, HttpMessage, HttpResponse, web};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, error, warn};

use crate::config::Config;
use crate::db::DbPool;
use crate::error::ErrorResponse;
use crate::models::user::RequestIdentity;

/// Sent when no bearer credential was presented at all.
const MSG_LOG_IN: &str = "Please log in";

/// Sent when a credential was presented but did not hold up: bad signature,
/// expired token, unknown user, or a lookup failure. One message for all of
/// them; the distinction lives in the logs.
const MSG_LOG_IN_AGAIN: &str = "Session invalid or expired, please log in again";

/// API auth gate middleware factory.
pub struct ApiAuthGate;

impl<S, B> Transform<S, ServiceRequest> for ApiAuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ApiAuthGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiAuthGateMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// API auth gate middleware service.
pub struct ApiAuthGateMiddleware<S> {
    // Rc because the user lookup suspends before the inner call.
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ApiAuthGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            // Missing or non-Bearer header is rejected before any
            // verification is attempted.
            let token = match bearer_token(&req) {
                Some(t) => t,
                None => return Ok(unauthorized(req, MSG_LOG_IN)),
            };

            let Some(config) = req.app_data::<web::Data<Config>>().cloned() else {
                error!(target: "auth", "Config not registered in app data");
                return Ok(unauthorized(req, MSG_LOG_IN_AGAIN));
            };

            let claims = match crate::auth::verify_admin_token(&token, &config.auth.token_secret)
            {
                Ok(c) => c,
                Err(reason) => {
                    debug!(target: "auth", path = %req.path(), "Bearer token rejected: {}", reason);
                    return Ok(unauthorized(req, MSG_LOG_IN_AGAIN));
                }
            };

            let Some(pool) = req.app_data::<web::Data<DbPool>>().cloned() else {
                error!(target: "auth", "DbPool not registered in app data");
                return Ok(unauthorized(req, MSG_LOG_IN_AGAIN));
            };

            // A transport failure is handled like an unknown user: same 401,
            // detail goes to the log only.
            let user = match crate::db::users::find_by_id(pool.connection(), &claims.sub).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    debug!(target: "auth", sub = %claims.sub, "Token subject has no active user");
                    return Ok(unauthorized(req, MSG_LOG_IN_AGAIN));
                }
                Err(e) => {
                    warn!(target: "auth", "User lookup failed: {}", e);
                    return Ok(unauthorized(req, MSG_LOG_IN_AGAIN));
                }
            };

            req.extensions_mut().insert(RequestIdentity::from_user(&user));

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

fn unauthorized<B>(req: ServiceRequest, message: &str) -> ServiceResponse<EitherBody<B>> {
    let resp = HttpResponse::Unauthorized().json(ErrorResponse {
        error: "UNAUTHORIZED".to_string(),
        message: message.to_string(),
    });
    req.into_response(resp).map_into_right_body()
}
