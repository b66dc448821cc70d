//! HTTP event sink.
//!
//! Each event is POSTed as its JSON envelope. When a secret is configured the
//! body is signed with HMAC-SHA256 and the hex digest sent as
//! `X-Optionhub-Signature: sha256=<hex>`. A transport error or a non-2xx
//! status is a publish failure; there is no retry.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{debug, warn};

use optionhub_core::{Error, EventEnvelope, EventPublisher, Result};

type HmacSha256 = Hmac<Sha256>;

pub const EVENT_HEADER: &str = "X-Optionhub-Event";
pub const TOPIC_HEADER: &str = "X-Optionhub-Topic";
pub const SIGNATURE_HEADER: &str = "X-Optionhub-Signature";

/// Compute the `sha256=<hex>` signature of `body`.
pub fn sign_payload(secret: &str, body: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| Error::Config(format!("invalid webhook secret: {}", e)))?;
    mac.update(body);
    Ok(format!("sha256={}", hex::encode(mac.finalize().into_bytes())))
}

/// [`EventPublisher`] that delivers to a single webhook URL.
#[derive(Clone)]
pub struct WebhookPublisher {
    client: reqwest::Client,
    url: String,
    secret: Option<String>,
}

impl WebhookPublisher {
    pub fn new(url: impl Into<String>, secret: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: url.into(),
            secret,
        })
    }
}

#[async_trait]
impl EventPublisher for WebhookPublisher {
    async fn publish(&self, topic: &str, envelope: &EventEnvelope) -> Result<()> {
        let start = Instant::now();
        let body = serde_json::to_vec(envelope)?;
        let event_type = envelope.payload.namespaced_event_type();

        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header(EVENT_HEADER, event_type)
            .header(TOPIC_HEADER, topic);

        if let Some(secret) = &self.secret {
            request = request.header(SIGNATURE_HEADER, sign_payload(secret, &body)?);
        }

        let response = request.body(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(
                subsystem = "events",
                component = "webhook_publisher",
                op = "publish",
                topic,
                status = status.as_u16(),
                "Event sink rejected delivery"
            );
            return Err(Error::Request(format!(
                "event sink returned HTTP {}",
                status.as_u16()
            )));
        }

        debug!(
            subsystem = "events",
            component = "webhook_publisher",
            op = "publish",
            topic,
            event_id = %envelope.event_id,
            duration_ms = start.elapsed().as_millis() as u64,
            "Event delivered"
        );
        Ok(())
    }
}
