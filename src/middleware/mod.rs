//! Actix middleware: request logging and the authorization gates.

pub mod admin_pages;
pub mod admin_role;
pub mod api_auth;
pub mod request_logger;

pub use admin_pages::AdminPageGate;
pub use admin_role::AdminRoleGate;
pub use api_auth::ApiAuthGate;
pub use request_logger::RequestLogger;
