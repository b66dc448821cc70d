//! # optionhub-db
//!
//! PostgreSQL storage layer for optionhub.
//!
//! This crate provides:
//! - Connection pool management with startup retry
//! - One repository for all seven flat vocabularies
//! - Attribute value storage (the raw rows of each option tree)
//! - The option-request moderation feed
//!
//! ## Example
//!
//! ```rust,ignore
//! use optionhub_db::{Database, Vocabulary, VocabularyRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/optionhub").await?;
//!     let cities = db.vocabularies.preview(Vocabulary::City, 10).await?;
//!     println!("{} cities", cities.len());
//!     Ok(())
//! }
//! ```
pub mod attributes;
pub mod option_requests;
pub mod pool;
pub mod vocabulary;

// Re-export core types
pub use optionhub_core::*;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub use attributes::PgAttributeRepository;
pub use option_requests::PgOptionRequestRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use vocabulary::PgVocabularyRepository;

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Flat vocabularies (os, city, skill, ...).
    pub vocabularies: PgVocabularyRepository,
    /// Attributes and their hierarchical values.
    pub attributes: PgAttributeRepository,
    /// Pending option requests.
    pub option_requests: PgOptionRequestRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            vocabularies: PgVocabularyRepository::new(pool.clone()),
            attributes: PgAttributeRepository::new(pool.clone()),
            option_requests: PgOptionRequestRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration (including the startup retry policy).
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
