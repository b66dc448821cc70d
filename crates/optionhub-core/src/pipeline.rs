//! Attribute value mutation pipeline.
//!
//! Adding an attribute value is a dual write: the row goes to the store, then
//! a change notification goes to the event channel. The two systems share no
//! transaction.
//!
//! ## Steps
//!
//! 1. Require a caller identity (before any I/O).
//! 2. Reject blank values.
//! 3. Persist the row; a storage failure stops here and nothing is published.
//! 4. Publish [`DomainEvent::AttributeValueAdded`].
//!
//! ## Partial failure
//!
//! If step 3 succeeds and step 4 fails, the call returns
//! [`Error::Publish`] carrying the new row id. The row is **not** rolled back,
//! so a reported failure does not mean nothing was written, and retrying the
//! same logical add can create a duplicate row. The same holds when the
//! request is cancelled after the insert has been awaited: the row stays.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn, Instrument};

use crate::context::RequestContext;
use crate::error::{Error, Result};
use crate::events::{DomainEvent, EventActor, EventEnvelope, ATTRIBUTE_VALUE_TOPIC};
use crate::models::NewAttributeValue;
use crate::traits::{AttributeRepository, EventPublisher};

/// Persist-then-publish orchestration for new attribute values.
#[derive(Clone)]
pub struct AttributeMutationPipeline {
    store: Arc<dyn AttributeRepository>,
    publisher: Arc<dyn EventPublisher>,
    topic: String,
}

impl AttributeMutationPipeline {
    pub fn new(store: Arc<dyn AttributeRepository>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            store,
            publisher,
            topic: ATTRIBUTE_VALUE_TOPIC.to_string(),
        }
    }

    /// Publish on `topic` instead of the default.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    /// Add a value under `req.attribute_id` and announce it.
    ///
    /// Returns the id allocated by the store. See the module docs for the
    /// meaning of [`Error::Publish`].
    pub async fn add_attribute_value(
        &self,
        ctx: &RequestContext,
        req: NewAttributeValue,
    ) -> Result<i64> {
        let identity = ctx.require_identity()?.to_string();

        if req.value.trim().is_empty() {
            return Err(Error::InvalidInput("value must not be empty".to_string()));
        }

        let span = ctx.span().clone();
        async move {
            let start = Instant::now();
            let attribute_id = req.attribute_id;
            let parent_id = req.parent_id;
            let value = req.value.clone();

            let value_id = self.store.insert_value(req).await?;
            debug!(
                subsystem = "core",
                component = "mutation_pipeline",
                op = "persist",
                attribute_id,
                value_id,
                "Attribute value persisted"
            );

            let envelope = EventEnvelope::with_actor(
                DomainEvent::AttributeValueAdded {
                    attribute_id,
                    value_id,
                    value,
                    parent_id,
                },
                EventActor::user(identity),
                ctx.request_id().map(str::to_string),
            );

            if let Err(e) = self.publisher.publish(&self.topic, &envelope).await {
                warn!(
                    subsystem = "core",
                    component = "mutation_pipeline",
                    op = "publish",
                    attribute_id,
                    value_id,
                    topic = %self.topic,
                    request_id = ctx.request_id(),
                    error = %e,
                    "Attribute value persisted but change event was not published"
                );
                return Err(Error::Publish {
                    value_id,
                    reason: e.to_string(),
                });
            }

            debug!(
                subsystem = "core",
                component = "mutation_pipeline",
                op = "publish",
                attribute_id,
                value_id,
                event_id = %envelope.event_id,
                duration_ms = start.elapsed().as_millis() as u64,
                "Attribute value added"
            );
            Ok(value_id)
        }
        .instrument(span)
        .await
    }
}
