//! Structured log mirror of the in-process event bus.
//!
//! Used when no webhook sink is configured, so published events still leave a
//! trace.

use tokio::sync::broadcast::{error::RecvError, Receiver};

use optionhub_core::{DomainEvent, PublishedEvent};

/// Log every event received on `rx` until the bus is dropped.
pub async fn telemetry_mirror(mut rx: Receiver<PublishedEvent>) {
    loop {
        match rx.recv().await {
            Ok(PublishedEvent { topic, envelope }) => match &envelope.payload {
                DomainEvent::AttributeValueAdded {
                    attribute_id,
                    value_id,
                    parent_id,
                    ..
                } => {
                    tracing::info!(
                        target: "optionhub::events",
                        event = envelope.payload.namespaced_event_type(),
                        %topic,
                        event_id = %envelope.event_id,
                        attribute_id,
                        value_id,
                        parent_id,
                        actor = %envelope.actor.id.as_deref().unwrap_or("-"),
                        "Attribute value added"
                    );
                }
            },
            Err(RecvError::Lagged(n)) => {
                tracing::warn!(missed = n, "Telemetry mirror lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
