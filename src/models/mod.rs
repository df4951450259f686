//! Domain models for the minimall admin server.

pub mod product;
pub mod user;

// Re-export commonly used types
pub use product::Product;
pub use user::{LoginRequest, LoginResponse, RequestIdentity, TokenClaims, User, UserResponse};
