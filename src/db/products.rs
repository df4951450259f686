//! Database operations for products.

use sea_orm::*;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::product::Product;

/// Find products whose slug is NULL or empty, oldest first.
pub async fn find_missing_slugs(db: &DatabaseConnection) -> AppResult<Vec<Product>> {
    let rows = crate::entity::product::Entity::find()
        .filter(
            Condition::any()
                .add(crate::entity::product::Column::Slug.is_null())
                .add(crate::entity::product::Column::Slug.eq("")),
        )
        .order_by_asc(crate::entity::product::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(rows.into_iter().map(model_to_product).collect())
}

/// Collect every slug currently in use.
pub async fn list_slugs(db: &DatabaseConnection) -> AppResult<Vec<String>> {
    let rows = crate::entity::product::Entity::find().all(db).await?;

    Ok(rows
        .into_iter()
        .filter_map(|m| m.slug)
        .filter(|s| !s.is_empty())
        .collect())
}

/// Set a product's slug.
pub async fn set_slug(db: &DatabaseConnection, id: &str, slug: &str) -> AppResult<u64> {
    let uuid = match Uuid::parse_str(id).ok() {
        Some(u) => u,
        None => return Ok(0),
    };

    let result = crate::entity::product::Entity::update_many()
        .col_expr(
            crate::entity::product::Column::Slug,
            sea_orm::prelude::Expr::value(Some(slug.to_string())),
        )
        .filter(crate::entity::product::Column::Id.eq(uuid))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

fn model_to_product(m: crate::entity::product::Model) -> Product {
    Product {
        id: m.id.to_string(),
        name: m.name,
        slug: m.slug,
        description: m.description,
        price_cents: m.price_cents,
        image_key: m.image_key,
        published: m.published,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}
