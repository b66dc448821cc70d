//! Flat reference vocabularies (os, workplace, study_place, hobby, skill,
//! city, society_direction).
//!
//! All seven tables share the `(id, name, is_moderate, user_uuid, created_at)`
//! shape, so one repository serves them. The table name is interpolated from
//! [`Vocabulary::table`], a closed set; user input is always bound.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;

use optionhub_core::{CategoryItem, Error, Result, Vocabulary, VocabularyRepository};

use crate::escape_like;

fn search_sql(vocabulary: Vocabulary) -> String {
    format!(
        "SELECT id, name FROM {} WHERE name ILIKE $1 ORDER BY id LIMIT $2",
        vocabulary.table()
    )
}

fn preview_sql(vocabulary: Vocabulary) -> String {
    format!(
        "SELECT id, name FROM {} ORDER BY id LIMIT $1",
        vocabulary.table()
    )
}

fn get_by_id_sql(vocabulary: Vocabulary) -> String {
    format!("SELECT name FROM {} WHERE id = $1", vocabulary.table())
}

fn insert_sql(vocabulary: Vocabulary) -> String {
    format!(
        "INSERT INTO {} (name, is_moderate, user_uuid) VALUES ($1, TRUE, $2) RETURNING id",
        vocabulary.table()
    )
}

fn list_all_sql(vocabulary: Vocabulary) -> String {
    format!("SELECT id, name FROM {} ORDER BY id", vocabulary.table())
}

/// Wrap `substring` for a contains-match, escaping LIKE wildcards.
fn contains_pattern(substring: &str) -> String {
    format!("%{}%", escape_like(substring))
}

/// PostgreSQL implementation of [`VocabularyRepository`].
#[derive(Clone)]
pub struct PgVocabularyRepository {
    pool: Pool<Postgres>,
}

impl PgVocabularyRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VocabularyRepository for PgVocabularyRepository {
    async fn search(
        &self,
        vocabulary: Vocabulary,
        substring: &str,
        limit: i64,
    ) -> Result<Vec<CategoryItem>> {
        let sql = search_sql(vocabulary);
        sqlx::query_as::<_, CategoryItem>(&sql)
            .bind(contains_pattern(substring))
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn preview(&self, vocabulary: Vocabulary, limit: i64) -> Result<Vec<CategoryItem>> {
        let sql = preview_sql(vocabulary);
        sqlx::query_as::<_, CategoryItem>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn get_by_id(&self, vocabulary: Vocabulary, id: i64) -> Result<Option<String>> {
        let sql = get_by_id_sql(vocabulary);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.map(|r| r.get::<String, _>("name")))
    }

    async fn insert(&self, vocabulary: Vocabulary, name: &str, user_uuid: &str) -> Result<i64> {
        let sql = insert_sql(vocabulary);
        let id: i64 = sqlx::query_scalar(&sql)
            .bind(name)
            .bind(user_uuid)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "vocabulary",
            op = "insert",
            vocabulary = vocabulary.as_str(),
            value_id = id,
            "Vocabulary entry submitted for moderation"
        );
        Ok(id)
    }

    async fn list_all(&self, vocabulary: Vocabulary) -> Result<Vec<CategoryItem>> {
        let sql = list_all_sql(vocabulary);
        sqlx::query_as::<_, CategoryItem>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)
    }
}
