//! # optionhub-api
//!
//! HTTP surface of optionhub: vocabulary lookups, attribute option trees,
//! attribute value submission and the moderation feed.
//!
//! [`app`] builds the full [`Router`] from an [`AppState`]; the binary wires
//! the state to Postgres, tests wire it to the in-memory mocks.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod services;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method},
    routing::get,
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use optionhub_core::{
    AttributeMutationPipeline, AttributeRepository, EventPublisher, OptionRequestRepository,
    SearchPolicy, VocabularyRepository,
};

pub use error::ApiError;

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub vocabularies: Arc<dyn VocabularyRepository>,
    pub attributes: Arc<dyn AttributeRepository>,
    pub option_requests: Arc<dyn OptionRequestRepository>,
    pub pipeline: AttributeMutationPipeline,
    pub search: SearchPolicy,
}

impl AppState {
    pub fn new(
        vocabularies: Arc<dyn VocabularyRepository>,
        attributes: Arc<dyn AttributeRepository>,
        option_requests: Arc<dyn OptionRequestRepository>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            vocabularies,
            pipeline: AttributeMutationPipeline::new(attributes.clone(), publisher),
            attributes,
            option_requests,
            search: SearchPolicy::default(),
        }
    }

    pub fn with_search_policy(mut self, search: SearchPolicy) -> Self {
        self.search = search;
        self
    }

    /// Publish attribute value events on `topic`.
    pub fn with_event_topic(mut self, topic: impl Into<String>) -> Self {
        self.pipeline = self.pipeline.with_topic(topic);
        self
    }
}

/// Build the HTTP router.
pub fn app(state: AppState) -> Router {
    use crate::handlers::{attributes, health, option_requests, vocabulary};

    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/v1/vocabularies/:vocabulary/items",
            get(vocabulary::search_items).post(vocabulary::add_item),
        )
        .route(
            "/api/v1/vocabularies/:vocabulary/items/:id",
            get(vocabulary::get_item),
        )
        .route(
            "/api/v1/vocabularies/:vocabulary/all",
            get(vocabulary::list_items),
        )
        .route(
            "/api/v1/attributes/:attribute_id/values",
            get(attributes::get_value_tree).post(attributes::add_value),
        )
        .route(
            "/api/v1/option-requests",
            get(option_requests::list_option_requests),
        )
        .layer(axum::middleware::from_fn(extract::single_identity))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::ACCEPT,
                    HeaderName::from_static(optionhub_core::defaults::IDENTITY_HEADER),
                ])
                .max_age(std::time::Duration::from_secs(3600)),
        )
        .with_state(state)
}
