//! Migration: Create products table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE products (
                    id UUID PRIMARY KEY,
                    name VARCHAR(255) NOT NULL,
                    -- Nullable until the slug backfill has visited the row.
                    slug VARCHAR(255),
                    description TEXT,
                    price_cents BIGINT NOT NULL DEFAULT 0,
                    image_key VARCHAR(500),
                    published BOOLEAN NOT NULL DEFAULT FALSE,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE UNIQUE INDEX idx_products_slug
                    ON products(slug)
                    WHERE slug IS NOT NULL;

                -- Storefront listings filter on published
                CREATE INDEX idx_products_published
                    ON products(published, created_at DESC);

                CREATE TRIGGER update_products_updated_at
                    BEFORE UPDATE ON products
                    FOR EACH ROW
                    EXECUTE FUNCTION update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TRIGGER IF EXISTS update_products_updated_at ON products;
                DROP TABLE IF EXISTS products CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
