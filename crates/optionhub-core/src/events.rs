//! Change-notification events, envelope schema, and the in-process event bus.
//!
//! Mutations emit a [`DomainEvent`] wrapped in an [`EventEnvelope`] carrying
//! the event id, timestamp and actor. The envelope is what every
//! [`EventPublisher`](crate::traits::EventPublisher) implementation ships,
//! whether over HTTP or through the in-process [`EventBus`].
//!
//! ## Wire Format
//!
//! ```text
//! {"event_id":"019a...","event_type":"attribute_value.added","occurred_at":"...",
//!  "actor":{"kind":"user","id":"<uuid>"},"payload_version":1,
//!  "payload":{"type":"AttributeValueAdded","attribute_id":1,"value_id":42,...}}
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::Result;
use crate::traits::EventPublisher;

/// Default topic for attribute value notifications.
pub const ATTRIBUTE_VALUE_TOPIC: &str = "attribute_value.added";

// ============================================================================
// Event Envelope
// ============================================================================

/// Actor metadata for event attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventActor {
    /// Actor type: `"system"` or `"user"`.
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl EventActor {
    /// System actor (startup tasks, internal processes).
    pub fn system() -> Self {
        Self {
            kind: "system".to_string(),
            id: None,
        }
    }

    /// Authenticated user actor.
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            kind: "user".to_string(),
            id: Some(id.into()),
        }
    }
}

/// Versioned event envelope.
///
/// `payload_version` starts at `1` and increments on breaking payload changes.
/// Consumers should ignore unknown fields.
#[derive(Debug, Clone, Serialize)]
pub struct EventEnvelope {
    /// Unique event identifier (UUIDv7 for temporal ordering).
    pub event_id: Uuid,
    /// Namespaced event type (e.g., `"attribute_value.added"`).
    pub event_type: String,
    pub occurred_at: DateTime<Utc>,
    pub actor: EventActor,
    /// Request correlation id, when the event was caused by an HTTP request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    pub payload_version: u32,
    pub payload: DomainEvent,
}

impl EventEnvelope {
    /// Create an envelope attributed to the system actor.
    pub fn new(event: DomainEvent) -> Self {
        Self::with_actor(event, EventActor::system(), None)
    }

    /// Create an envelope with an explicit actor and correlation id.
    pub fn with_actor(event: DomainEvent, actor: EventActor, correlation_id: Option<String>) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            event_type: event.namespaced_event_type().to_string(),
            occurred_at: Utc::now(),
            actor,
            correlation_id,
            payload_version: 1,
            payload: event,
        }
    }
}

// ============================================================================
// Domain events
// ============================================================================

/// Domain payloads, serialized with a `type` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum DomainEvent {
    /// A new value was persisted under an attribute.
    AttributeValueAdded {
        attribute_id: i64,
        value_id: i64,
        value: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        parent_id: Option<i64>,
    },
}

impl DomainEvent {
    /// Dot-namespaced name used in envelopes and delivery headers.
    pub fn namespaced_event_type(&self) -> &'static str {
        match self {
            DomainEvent::AttributeValueAdded { .. } => ATTRIBUTE_VALUE_TOPIC,
        }
    }
}

// ============================================================================
// Event bus
// ============================================================================

/// An envelope together with the topic it was published on.
#[derive(Debug, Clone)]
pub struct PublishedEvent {
    pub topic: String,
    pub envelope: EventEnvelope,
}

/// In-process broadcast publisher.
///
/// Used when no external event sink is configured. Publishing never fails:
/// with no active subscribers the event is dropped.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<PublishedEvent>,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity.
    ///
    /// Recommended: 256 for production, 32 for tests.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to published events. Each subscriber gets an independent stream.
    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[async_trait]
impl EventPublisher for EventBus {
    async fn publish(&self, topic: &str, envelope: &EventEnvelope) -> Result<()> {
        tracing::debug!(
            topic,
            event_type = %envelope.event_type,
            event_id = %envelope.event_id,
            subscriber_count = self.tx.receiver_count(),
            "EventBus publish"
        );
        let _ = self.tx.send(PublishedEvent {
            topic: topic.to_string(),
            envelope: envelope.clone(),
        });
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
