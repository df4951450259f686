//! Minimall admin server library.
//!
//! Backend and admin layer for the minimall storefront: session
//! authentication gates, product image storage, and catalog slug tooling.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
