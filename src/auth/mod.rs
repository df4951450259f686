//! Authentication building blocks: token signing, password hashing, and the
//! request identity extractor.

pub mod identity;
pub mod password;
pub mod token;

pub use token::{TOKEN_ISSUER, create_admin_token, verify_admin_token};
