//! Product models for the storefront catalog.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Product stored in database.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price_cents: i64,
    pub image_key: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
