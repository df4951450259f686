//! SeaORM entity definitions for PostgreSQL database.

pub mod product;
pub mod user;
