//! Core traits for optionhub collaborators.
//!
//! These traits define the interfaces that storage and event-delivery
//! implementations must satisfy, so the hierarchy pipeline and the search
//! dispatcher can run against Postgres in production and against in-memory
//! mocks in tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::events::EventEnvelope;
use crate::models::*;

// =============================================================================
// VOCABULARY REPOSITORY
// =============================================================================

/// Storage for the flat reference vocabularies.
///
/// One implementation serves every [`Vocabulary`]; the variant selects the
/// backing table.
#[async_trait]
pub trait VocabularyRepository: Send + Sync {
    /// Case-insensitive substring search, at most `limit` rows.
    async fn search(
        &self,
        vocabulary: Vocabulary,
        substring: &str,
        limit: i64,
    ) -> Result<Vec<CategoryItem>>;

    /// Unfiltered sample of at most `limit` rows.
    async fn preview(&self, vocabulary: Vocabulary, limit: i64) -> Result<Vec<CategoryItem>>;

    /// Label of the row with `id`, or `None` when there is no such row.
    async fn get_by_id(&self, vocabulary: Vocabulary, id: i64) -> Result<Option<String>>;

    /// Insert a new user-submitted entry (marked for moderation) and return its id.
    async fn insert(&self, vocabulary: Vocabulary, name: &str, user_uuid: &str) -> Result<i64>;

    /// Every row of the vocabulary in storage order.
    async fn list_all(&self, vocabulary: Vocabulary) -> Result<Vec<CategoryItem>>;
}

// =============================================================================
// ATTRIBUTE REPOSITORY
// =============================================================================

/// Storage for attributes and their hierarchical values.
#[async_trait]
pub trait AttributeRepository: Send + Sync {
    /// Every value of `attribute_id`, in storage order.
    async fn list_values(&self, attribute_id: i64) -> Result<Vec<AttributeValue>>;

    /// Persist a new value; the store allocates and returns the id.
    ///
    /// `parent_id` is not checked for existence or cycles.
    async fn insert_value(&self, value: NewAttributeValue) -> Result<i64>;

    /// Attributes whose ids are in `ids`. Missing ids are skipped.
    async fn get_attributes(&self, ids: &[i64]) -> Result<Vec<Attribute>>;
}

// =============================================================================
// OPTION REQUEST REPOSITORY
// =============================================================================

/// Read access to the moderation feed of pending submissions.
#[async_trait]
pub trait OptionRequestRepository: Send + Sync {
    /// All pending option requests, oldest first.
    async fn list(&self) -> Result<Vec<OptionRequest>>;
}

// =============================================================================
// EVENT PUBLISHER
// =============================================================================

/// Outbound change-notification channel.
///
/// Delivery is at-most-once from the caller's perspective: an `Ok` means the
/// channel accepted the message, an `Err` means it did not, and there is no
/// read receipt either way.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, topic: &str, envelope: &EventEnvelope) -> Result<()>;
}
