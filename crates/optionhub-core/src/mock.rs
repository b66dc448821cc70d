//! In-memory collaborator mocks for deterministic testing.
//!
//! Every mock records the calls it receives and can be switched into a
//! failing mode, so tests can assert both on results and on which store
//! operations were (or were not) reached.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use optionhub_core::mock::{MockAttributeRepository, MockEventPublisher};
//!
//! let store = MockAttributeRepository::new().with_next_id(42);
//! let publisher = MockEventPublisher::new().failing();
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::events::EventEnvelope;
use crate::models::*;
use crate::traits::*;

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn storage_failure() -> Error {
    Error::Database(sqlx::Error::PoolTimedOut)
}

// =============================================================================
// VOCABULARY
// =============================================================================

/// A call observed by [`MockVocabularyRepository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Search {
        vocabulary: Vocabulary,
        substring: String,
        limit: i64,
    },
    Preview {
        vocabulary: Vocabulary,
        limit: i64,
    },
    GetById {
        vocabulary: Vocabulary,
        id: i64,
    },
    Insert {
        vocabulary: Vocabulary,
        name: String,
        user_uuid: String,
    },
    ListAll {
        vocabulary: Vocabulary,
    },
}

/// Mock vocabulary store keyed by [`Vocabulary`].
#[derive(Clone, Default)]
pub struct MockVocabularyRepository {
    rows: Arc<Mutex<HashMap<Vocabulary, Vec<CategoryItem>>>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
    fail: bool,
}

impl MockVocabularyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `vocabulary` with `(id, label)` rows in storage order.
    pub fn with_items(self, vocabulary: Vocabulary, items: Vec<(i64, &str)>) -> Self {
        lock(&self.rows).insert(
            vocabulary,
            items
                .into_iter()
                .map(|(id, label)| CategoryItem {
                    id,
                    label: label.to_string(),
                })
                .collect(),
        );
        self
    }

    /// Make every operation fail with a storage error.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.call_log).clone()
    }

    fn record(&self, call: MockCall) -> Result<()> {
        lock(&self.call_log).push(call);
        if self.fail {
            return Err(storage_failure());
        }
        Ok(())
    }

    fn rows_of(&self, vocabulary: Vocabulary) -> Vec<CategoryItem> {
        lock(&self.rows)
            .get(&vocabulary)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl VocabularyRepository for MockVocabularyRepository {
    async fn search(
        &self,
        vocabulary: Vocabulary,
        substring: &str,
        limit: i64,
    ) -> Result<Vec<CategoryItem>> {
        self.record(MockCall::Search {
            vocabulary,
            substring: substring.to_string(),
            limit,
        })?;
        let needle = substring.to_lowercase();
        Ok(self
            .rows_of(vocabulary)
            .into_iter()
            .filter(|item| item.label.to_lowercase().contains(&needle))
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn preview(&self, vocabulary: Vocabulary, limit: i64) -> Result<Vec<CategoryItem>> {
        self.record(MockCall::Preview { vocabulary, limit })?;
        Ok(self
            .rows_of(vocabulary)
            .into_iter()
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn get_by_id(&self, vocabulary: Vocabulary, id: i64) -> Result<Option<String>> {
        self.record(MockCall::GetById { vocabulary, id })?;
        Ok(self
            .rows_of(vocabulary)
            .into_iter()
            .find(|item| item.id == id)
            .map(|item| item.label))
    }

    async fn insert(&self, vocabulary: Vocabulary, name: &str, user_uuid: &str) -> Result<i64> {
        self.record(MockCall::Insert {
            vocabulary,
            name: name.to_string(),
            user_uuid: user_uuid.to_string(),
        })?;
        let mut rows = lock(&self.rows);
        let table = rows.entry(vocabulary).or_default();
        let id = table.iter().map(|item| item.id).max().unwrap_or(0) + 1;
        table.push(CategoryItem {
            id,
            label: name.to_string(),
        });
        Ok(id)
    }

    async fn list_all(&self, vocabulary: Vocabulary) -> Result<Vec<CategoryItem>> {
        self.record(MockCall::ListAll { vocabulary })?;
        Ok(self.rows_of(vocabulary))
    }
}

// =============================================================================
// ATTRIBUTES
// =============================================================================

/// A call observed by [`MockAttributeRepository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeCall {
    ListValues(i64),
    InsertValue(NewAttributeValue),
    GetAttributes(Vec<i64>),
}

#[derive(Default)]
struct AttributeState {
    attributes: Vec<Attribute>,
    values: Vec<AttributeValue>,
    next_id: Option<i64>,
}

/// Mock attribute store holding attributes and their value rows.
#[derive(Clone, Default)]
pub struct MockAttributeRepository {
    state: Arc<Mutex<AttributeState>>,
    call_log: Arc<Mutex<Vec<AttributeCall>>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MockAttributeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(self, id: i64, name: &str) -> Self {
        lock(&self.state).attributes.push(Attribute {
            id,
            name: name.to_string(),
        });
        self
    }

    pub fn with_value(
        self,
        attribute_id: i64,
        id: i64,
        value: &str,
        parent_id: Option<i64>,
    ) -> Self {
        lock(&self.state).values.push(AttributeValue {
            id,
            attribute_id,
            value: value.to_string(),
            parent_id,
        });
        self
    }

    /// Id the next insert will allocate.
    pub fn with_next_id(self, id: i64) -> Self {
        lock(&self.state).next_id = Some(id);
        self
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn calls(&self) -> Vec<AttributeCall> {
        lock(&self.call_log).clone()
    }

    /// Snapshot of every stored value row.
    pub fn stored_values(&self) -> Vec<AttributeValue> {
        lock(&self.state).values.clone()
    }
}

#[async_trait]
impl AttributeRepository for MockAttributeRepository {
    async fn list_values(&self, attribute_id: i64) -> Result<Vec<AttributeValue>> {
        lock(&self.call_log).push(AttributeCall::ListValues(attribute_id));
        if self.fail_reads {
            return Err(storage_failure());
        }
        Ok(lock(&self.state)
            .values
            .iter()
            .filter(|v| v.attribute_id == attribute_id)
            .cloned()
            .collect())
    }

    async fn insert_value(&self, value: NewAttributeValue) -> Result<i64> {
        lock(&self.call_log).push(AttributeCall::InsertValue(value.clone()));
        if self.fail_writes {
            return Err(storage_failure());
        }
        let mut state = lock(&self.state);
        let id = match state.next_id.take() {
            Some(id) => id,
            None => state.values.iter().map(|v| v.id).max().unwrap_or(0) + 1,
        };
        state.values.push(AttributeValue {
            id,
            attribute_id: value.attribute_id,
            value: value.value,
            parent_id: value.parent_id,
        });
        Ok(id)
    }

    async fn get_attributes(&self, ids: &[i64]) -> Result<Vec<Attribute>> {
        lock(&self.call_log).push(AttributeCall::GetAttributes(ids.to_vec()));
        if self.fail_reads {
            return Err(storage_failure());
        }
        Ok(lock(&self.state)
            .attributes
            .iter()
            .filter(|a| ids.contains(&a.id))
            .cloned()
            .collect())
    }
}

// =============================================================================
// OPTION REQUESTS
// =============================================================================

/// Mock moderation feed.
#[derive(Clone, Default)]
pub struct MockOptionRequestRepository {
    requests: Arc<Mutex<Vec<OptionRequest>>>,
    fail: bool,
}

impl MockOptionRequestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request(
        self,
        id: i64,
        attribute_id: i64,
        value: &str,
        user_uuid: &str,
        created_at: DateTime<Utc>,
    ) -> Self {
        lock(&self.requests).push(OptionRequest {
            id,
            attribute_id,
            value: value.to_string(),
            user_uuid: user_uuid.to_string(),
            created_at,
        });
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl OptionRequestRepository for MockOptionRequestRepository {
    async fn list(&self) -> Result<Vec<OptionRequest>> {
        if self.fail {
            return Err(storage_failure());
        }
        Ok(lock(&self.requests).clone())
    }
}

// =============================================================================
// EVENT PUBLISHER
// =============================================================================

/// Mock publisher recording `(topic, envelope)` pairs.
#[derive(Clone, Default)]
pub struct MockEventPublisher {
    published: Arc<Mutex<Vec<(String, EventEnvelope)>>>,
    fail: bool,
}

impl MockEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every publish with a request error. Attempts are still recorded.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn published(&self) -> Vec<(String, EventEnvelope)> {
        lock(&self.published).clone()
    }
}

#[async_trait]
impl EventPublisher for MockEventPublisher {
    async fn publish(&self, topic: &str, envelope: &EventEnvelope) -> Result<()> {
        lock(&self.published).push((topic.to_string(), envelope.clone()));
        if self.fail {
            return Err(Error::Request("event channel unavailable".to_string()));
        }
        Ok(())
    }
}
