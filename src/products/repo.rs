use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Product record. Exactly one of `image_url` / `image_data` is set when an
/// image exists, depending on the configured storage strategy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    #[serde(skip_serializing)]
    pub image_data: Option<Vec<u8>>,
    pub created_at: OffsetDateTime,
}

impl Product {
    pub async fn list(db: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, image_url, image_data, created_at
            FROM products
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, image_url, image_data, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn insert(
        db: &PgPool,
        name: &str,
        price: Decimal,
        image_url: Option<&str>,
        image_data: Option<&[u8]>,
    ) -> Result<Product, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, price, image_url, image_data)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, price, image_url, image_data, created_at
            "#,
        )
        .bind(name)
        .bind(price)
        .bind(image_url)
        .bind(image_data)
        .fetch_one(db)
        .await
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        name: &str,
        price: Decimal,
        image_url: Option<&str>,
        image_data: Option<&[u8]>,
    ) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = $1, price = $2, image_url = $3, image_data = $4
            WHERE id = $5
            RETURNING id, name, price, image_url, image_data, created_at
            "#,
        )
        .bind(name)
        .bind(price)
        .bind(image_url)
        .bind(image_data)
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Unconditional delete. Returns the stored image_url (if the row existed)
    /// so the caller can clean up the referenced file or object.
    pub async fn delete(db: &PgPool, id: Uuid) -> Result<Option<Option<String>>, sqlx::Error> {
        let row: Option<(Option<String>,)> =
            sqlx::query_as("DELETE FROM products WHERE id = $1 RETURNING image_url")
                .bind(id)
                .fetch_optional(db)
                .await?;
        Ok(row.map(|(url,)| url))
    }

    /// Raw bytes for the database storage strategy.
    pub async fn image_bytes(
        db: &PgPool,
        id: Uuid,
    ) -> Result<Option<Option<Vec<u8>>>, sqlx::Error> {
        let row: Option<(Option<Vec<u8>>,)> =
            sqlx::query_as("SELECT image_data FROM products WHERE id = $1")
                .bind(id)
                .fetch_optional(db)
                .await?;
        Ok(row.map(|(data,)| data))
    }
}
