//! API endpoint modules.

pub mod auth;
pub mod health;
pub mod images;
pub mod openapi;

pub use auth::configure_auth_routes;
pub use health::configure_health_routes;
pub use images::{configure_admin_image_routes, configure_public_image_routes};
pub use openapi::ApiDoc;
