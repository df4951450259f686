//! Extractor giving handlers access to the gate-attached identity.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};

use crate::error::AppError;
use crate::models::user::RequestIdentity;

/// Pulls the [`RequestIdentity`] the API auth gate stored in request
/// extensions. Resolves to 401 when no gate ran on this route, so a handler
/// accidentally mounted outside the gated scope fails closed.
impl FromRequest for RequestIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = req.extensions().get::<RequestIdentity>().cloned();

        ready(identity.ok_or_else(|| AppError::Unauthorized("Please log in".to_string())))
    }
}
