use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub created_at: OffsetDateTime,
}

impl Ingredient {
    pub async fn list(db: &PgPool) -> Result<Vec<Ingredient>, sqlx::Error> {
        sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, name, created_at
            FROM ingredients
            "#,
        )
        .fetch_all(db)
        .await
    }

    /// Ingredients are identified by name; creating an existing one returns
    /// the existing row. The no-op DO UPDATE makes RETURNING yield the row in
    /// both cases.
    pub async fn get_or_create(db: &PgPool, name: &str) -> Result<Ingredient, sqlx::Error> {
        sqlx::query_as::<_, Ingredient>(
            r#"
            INSERT INTO ingredients (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_one(db)
        .await
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Ingredient>, sqlx::Error> {
        sqlx::query_as::<_, Ingredient>(
            r#"
            UPDATE ingredients
            SET name = $1
            WHERE id = $2
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM ingredients WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn list_for_product(
        db: &PgPool,
        product_id: Uuid,
    ) -> Result<Vec<Ingredient>, sqlx::Error> {
        sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT i.id, i.name, i.created_at
            FROM ingredients i
            JOIN product_ingredients pi ON pi.ingredient_id = i.id
            WHERE pi.product_id = $1
            ORDER BY i.name
            "#,
        )
        .bind(product_id)
        .fetch_all(db)
        .await
    }

    /// Attaching twice is a no-op.
    pub async fn attach(
        db: &PgPool,
        product_id: Uuid,
        ingredient_id: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO product_ingredients (product_id, ingredient_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(product_id)
        .bind(ingredient_id)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Removes the join row only; the ingredient itself stays.
    pub async fn detach(
        db: &PgPool,
        product_id: Uuid,
        ingredient_id: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "DELETE FROM product_ingredients WHERE product_id = $1 AND ingredient_id = $2",
        )
        .bind(product_id)
        .bind(ingredient_id)
        .execute(db)
        .await?;
        Ok(())
    }
}
