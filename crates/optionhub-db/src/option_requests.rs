//! Pending option requests awaiting moderation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use optionhub_core::{Error, OptionRequest, OptionRequestRepository, Result};

/// PostgreSQL implementation of [`OptionRequestRepository`].
#[derive(Clone)]
pub struct PgOptionRequestRepository {
    pool: Pool<Postgres>,
}

impl PgOptionRequestRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OptionRequestRepository for PgOptionRequestRepository {
    async fn list(&self) -> Result<Vec<OptionRequest>> {
        sqlx::query_as::<_, OptionRequest>(
            "SELECT id, attribute_id, value, user_uuid, created_at
             FROM option_request
             ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }
}
