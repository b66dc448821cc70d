//! Attribute and attribute-value storage.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::debug;

use optionhub_core::{Attribute, AttributeRepository, AttributeValue, Error, NewAttributeValue, Result};

/// PostgreSQL implementation of [`AttributeRepository`].
#[derive(Clone)]
pub struct PgAttributeRepository {
    pool: Pool<Postgres>,
}

impl PgAttributeRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttributeRepository for PgAttributeRepository {
    async fn list_values(&self, attribute_id: i64) -> Result<Vec<AttributeValue>> {
        sqlx::query_as::<_, AttributeValue>(
            "SELECT id, attribute_id, value, parent_id
             FROM attribute_value
             WHERE attribute_id = $1
             ORDER BY id",
        )
        .bind(attribute_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn insert_value(&self, value: NewAttributeValue) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO attribute_value (attribute_id, value, parent_id)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(value.attribute_id)
        .bind(&value.value)
        .bind(value.parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "attributes",
            op = "insert_value",
            attribute_id = value.attribute_id,
            value_id = id,
            "Attribute value inserted"
        );
        Ok(id)
    }

    async fn get_attributes(&self, ids: &[i64]) -> Result<Vec<Attribute>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Attribute>(
            "SELECT id, name FROM attribute WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }
}
