//! Services used by the API server.

pub mod telemetry;
pub mod webhook_publisher;

pub use telemetry::telemetry_mirror;
pub use webhook_publisher::{sign_payload, WebhookPublisher};
