//! Role gate for admin-only API routes.
//!
//! Runs after [`ApiAuthGate`](super::ApiAuthGate) and rejects any request
//! whose attached identity does not carry an administrator role. Pure check,
//! no I/O.

use std::future::{Ready, ready};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;

use crate::error::ErrorResponse;
use crate::models::user::RequestIdentity;

/// Role spellings accepted on API routes. Exact, case-sensitive matches;
/// no trimming or normalization. Note the page gate accepts only the
/// lowercase spelling, so a user with role `ADMIN` can call admin APIs but
/// cannot open the admin pages.
pub const ADMIN_ROLES: [&str; 3] = ["ADMIN", "admin", "ADMINISTRATOR"];

/// Check a role string against the admin allow-list.
pub fn is_admin_role(role: &str) -> bool {
    ADMIN_ROLES.contains(&role)
}

/// Admin role gate middleware factory.
pub struct AdminRoleGate;

impl<S, B> Transform<S, ServiceRequest> for AdminRoleGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminRoleGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminRoleGateMiddleware { service }))
    }
}

/// Admin role gate middleware service.
pub struct AdminRoleGateMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AdminRoleGateMiddleware<S>
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
        // Absent identity and non-admin role get the same refusal.
        let allowed = req
            .extensions()
            .get::<RequestIdentity>()
            .map(|identity| is_admin_role(&identity.role))
            .unwrap_or(false);

        if !allowed {
            let resp = HttpResponse::Forbidden().json(ErrorResponse {
                error: "FORBIDDEN".to_string(),
                message: "Administrators only".to_string(),
            });
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
