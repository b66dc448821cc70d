//! End-to-end tests of the HTTP router, backed by the in-memory mocks.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use optionhub_api::{app, AppState};
use optionhub_core::mock::{
    AttributeCall, MockCall, MockAttributeRepository, MockEventPublisher,
    MockOptionRequestRepository, MockVocabularyRepository,
};
use optionhub_core::{DomainEvent, SearchPolicy, Vocabulary};

// ============================================================================
// Harness
// ============================================================================

#[derive(Default)]
struct Harness {
    vocabularies: MockVocabularyRepository,
    attributes: MockAttributeRepository,
    option_requests: MockOptionRequestRepository,
    publisher: MockEventPublisher,
}

impl Harness {
    fn state(&self) -> AppState {
        AppState::new(
            Arc::new(self.vocabularies.clone()),
            Arc::new(self.attributes.clone()),
            Arc::new(self.option_requests.clone()),
            Arc::new(self.publisher.clone()),
        )
    }

    fn router(&self) -> Router {
        app(self.state())
    }
}

async fn send(router: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = router.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, identity: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(identity) = identity {
        builder = builder.header("uuid", identity);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn post_raw(uri: &str, identity: Option<&str>, content_type: &str, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", content_type);
    if let Some(identity) = identity {
        builder = builder.header("uuid", identity);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (status, body) = send(Harness::default().router(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_response_carries_request_id() {
    let resp = Harness::default()
        .router()
        .oneshot(get("/health"))
        .await
        .unwrap();
    let id = resp
        .headers()
        .get("x-request-id")
        .expect("missing x-request-id")
        .to_str()
        .unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
}

// ============================================================================
// Vocabularies
// ============================================================================

#[tokio::test]
async fn test_short_query_returns_preview_in_store_order() {
    let h = Harness {
        vocabularies: MockVocabularyRepository::new()
            .with_items(Vocabulary::Os, vec![(1, "windows"), (2, "wsl")]),
        ..Default::default()
    };

    let (status, body) = send(h.router(), get("/api/v1/vocabularies/os/items?name=w")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"id": 1, "label": "windows"}, {"id": 2, "label": "wsl"}])
    );
    assert_eq!(
        h.vocabularies.calls(),
        vec![MockCall::Preview {
            vocabulary: Vocabulary::Os,
            limit: 10
        }]
    );
}

#[tokio::test]
async fn test_missing_query_returns_preview() {
    let h = Harness::default();
    let (status, body) = send(h.router(), get("/api/v1/vocabularies/hobby/items")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    assert!(matches!(
        h.vocabularies.calls()[0],
        MockCall::Preview { vocabulary: Vocabulary::Hobby, .. }
    ));
}

#[tokio::test]
async fn test_long_query_searches() {
    let h = Harness {
        vocabularies: MockVocabularyRepository::new().with_items(
            Vocabulary::City,
            vec![(1, "Moscow"), (2, "Kazan"), (3, "Novosibirsk")],
        ),
        ..Default::default()
    };

    let (status, body) = send(h.router(), get("/api/v1/vocabularies/city/items?name=os")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"id": 1, "label": "Moscow"}, {"id": 3, "label": "Novosibirsk"}])
    );
    assert_eq!(
        h.vocabularies.calls(),
        vec![MockCall::Search {
            vocabulary: Vocabulary::City,
            substring: "os".to_string(),
            limit: 10
        }]
    );
}

#[tokio::test]
async fn test_configured_search_policy_is_used() {
    let h = Harness::default();
    let router = app(h.state().with_search_policy(SearchPolicy::new(4, 3)));

    let (status, _) = send(router, get("/api/v1/vocabularies/skill/items?name=rust")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        h.vocabularies.calls(),
        vec![MockCall::Search {
            vocabulary: Vocabulary::Skill,
            substring: "rust".to_string(),
            limit: 3
        }]
    );
}

#[tokio::test]
async fn test_every_vocabulary_slug_is_routed() {
    for vocabulary in Vocabulary::ALL {
        let h = Harness::default();
        let uri = format!("/api/v1/vocabularies/{}/all", vocabulary.as_str());
        let (status, _) = send(h.router(), get(&uri)).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(h.vocabularies.calls(), vec![MockCall::ListAll { vocabulary }]);
    }
}

#[tokio::test]
async fn test_unknown_vocabulary_is_not_found() {
    let h = Harness::default();
    let (status, body) = send(h.router(), get("/api/v1/vocabularies/planets/items?name=ma")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
    assert!(h.vocabularies.calls().is_empty());
}

#[tokio::test]
async fn test_lookup_storage_failure_is_not_found() {
    let h = Harness {
        vocabularies: MockVocabularyRepository::new().failing(),
        ..Default::default()
    };

    let (status, body) = send(h.router(), get("/api/v1/vocabularies/os/items?name=linux")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "lookup failed"}));
}

#[tokio::test]
async fn test_get_item_found() {
    let h = Harness {
        vocabularies: MockVocabularyRepository::new()
            .with_items(Vocabulary::StudyPlace, vec![(3, "School 21")]),
        ..Default::default()
    };

    let (status, body) = send(h.router(), get("/api/v1/vocabularies/study_place/items/3")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 3, "value": "School 21"}));
}

#[tokio::test]
async fn test_get_item_missing_row_returns_empty_value() {
    let h = Harness::default();
    let (status, body) = send(h.router(), get("/api/v1/vocabularies/workplace/items/77")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 77, "value": ""}));
}

#[tokio::test]
async fn test_add_item_records_submitter() {
    let h = Harness {
        vocabularies: MockVocabularyRepository::new()
            .with_items(Vocabulary::Os, vec![(1, "windows")]),
        ..Default::default()
    };

    let (status, body) = send(
        h.router(),
        post("/api/v1/vocabularies/os/items", Some("user-1"), json!({"value": "Linux"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 2, "value": "Linux"}));
    assert_eq!(
        h.vocabularies.calls(),
        vec![MockCall::Insert {
            vocabulary: Vocabulary::Os,
            name: "Linux".to_string(),
            user_uuid: "user-1".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_add_item_without_identity_is_unauthorized() {
    let h = Harness::default();

    let (status, body) = send(
        h.router(),
        post("/api/v1/vocabularies/society_direction/items", None, json!({"value": "IT"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "cannot find uuid"}));
    assert!(h.vocabularies.calls().is_empty());
}

#[tokio::test]
async fn test_add_item_blank_value_is_bad_request() {
    let h = Harness::default();

    let (status, _) = send(
        h.router(),
        post("/api/v1/vocabularies/skill/items", Some("u"), json!({"value": "   "})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(h.vocabularies.calls().is_empty());
}

#[tokio::test]
async fn test_add_item_storage_failure_is_conflict() {
    let h = Harness {
        vocabularies: MockVocabularyRepository::new().failing(),
        ..Default::default()
    };

    let (status, body) = send(
        h.router(),
        post("/api/v1/vocabularies/city/items", Some("u"), json!({"value": "Tver"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({"error": "aborted"}));
}

#[tokio::test]
async fn test_multiple_identities_rejected_on_reads() {
    let h = Harness::default();
    let req = Request::builder()
        .uri("/api/v1/vocabularies/os/items?name=w")
        .header("uuid", "a")
        .header("uuid", "b")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(h.router(), req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(h.vocabularies.calls().is_empty());
}

// ============================================================================
// Attributes
// ============================================================================

#[tokio::test]
async fn test_value_tree_is_nested() {
    let h = Harness {
        attributes: MockAttributeRepository::new()
            .with_value(1, 1, "Russia", None)
            .with_value(1, 2, "Moscow", Some(1))
            .with_value(1, 3, "Kuryanovo", Some(2)),
        ..Default::default()
    };

    let (status, body) = send(h.router(), get("/api/v1/attributes/1/values")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"option_list": [
            {"option_id": 1, "option_value": "Russia", "children": [
                {"option_id": 2, "option_value": "Moscow", "children": [
                    {"option_id": 3, "option_value": "Kuryanovo", "children": []}
                ]}
            ]}
        ]})
    );
}

#[tokio::test]
async fn test_value_tree_of_unknown_attribute_is_empty() {
    let (status, body) = send(Harness::default().router(), get("/api/v1/attributes/9/values")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"option_list": []}));
}

#[tokio::test]
async fn test_value_tree_storage_failure_is_internal_error() {
    let h = Harness {
        attributes: MockAttributeRepository::new().failing_reads(),
        ..Default::default()
    };
    let (status, body) = send(h.router(), get("/api/v1/attributes/1/values")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_add_value_persists_and_publishes() {
    let h = Harness {
        attributes: MockAttributeRepository::new().with_value(3, 10, "Russia", None),
        ..Default::default()
    };

    let (status, body) = send(
        h.router(),
        post(
            "/api/v1/attributes/3/values",
            Some("user-1"),
            json!({"value": "Moscow", "parent_id": 10}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 11}));

    let published = h.publisher.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].0, "attribute_value.added");
    assert_eq!(
        published[0].1.payload,
        DomainEvent::AttributeValueAdded {
            attribute_id: 3,
            value_id: 11,
            value: "Moscow".to_string(),
            parent_id: Some(10),
        }
    );
    assert!(published[0].1.correlation_id.is_some());
}

#[tokio::test]
async fn test_add_value_uses_configured_topic() {
    let h = Harness::default();
    let router = app(h.state().with_event_topic("optionhub.set_attribute"));

    let (status, _) = send(
        router,
        post("/api/v1/attributes/1/values", Some("u"), json!({"value": "Linux"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(h.publisher.published()[0].0, "optionhub.set_attribute");
}

#[tokio::test]
async fn test_add_value_without_identity_makes_no_store_call() {
    let h = Harness::default();

    let (status, _) = send(
        h.router(),
        post("/api/v1/attributes/1/values", None, json!({"value": "Linux"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(h.attributes.calls().is_empty());
    assert!(h.publisher.published().is_empty());
}

#[tokio::test]
async fn test_anonymous_mutation_is_unauthorized_before_body_parsing() {
    let uris = ["/api/v1/attributes/1/values", "/api/v1/vocabularies/os/items"];
    let bodies = [
        ("application/json", "{}"),
        ("application/json", "not json"),
        ("text/plain", "Linux"),
    ];

    for uri in uris {
        for (content_type, raw) in bodies {
            let h = Harness::default();
            let (status, body) =
                send(h.router(), post_raw(uri, None, content_type, raw)).await;

            assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", uri, raw);
            assert_eq!(body, json!({"error": "cannot find uuid"}));
            assert!(h.attributes.calls().is_empty());
            assert!(h.vocabularies.calls().is_empty());
        }
    }
}

#[tokio::test]
async fn test_malformed_mutation_body_is_json_bad_request() {
    let cases = [
        ("application/json", "{}"),
        ("application/json", "not json"),
        ("text/plain", "Linux"),
    ];

    for (content_type, raw) in cases {
        let h = Harness::default();
        let (status, body) = send(
            h.router(),
            post_raw("/api/v1/attributes/1/values", Some("u"), content_type, raw),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", raw);
        assert!(body["error"].is_string(), "{}", raw);
        assert!(h.attributes.calls().is_empty());
        assert!(h.publisher.published().is_empty());
    }

    let h = Harness::default();
    let (status, body) = send(
        h.router(),
        post_raw("/api/v1/vocabularies/os/items", Some("u"), "application/json", "{}"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(h.vocabularies.calls().is_empty());
}

#[tokio::test]
async fn test_non_numeric_path_id_is_json_bad_request() {
    let h = Harness::default();

    let (status, body) = send(h.router(), get("/api/v1/attributes/abc/values")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(h.router(), get("/api/v1/vocabularies/os/items/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_add_value_storage_failure_is_conflict_and_not_published() {
    let h = Harness {
        attributes: MockAttributeRepository::new().failing_writes(),
        ..Default::default()
    };

    let (status, body) = send(
        h.router(),
        post("/api/v1/attributes/1/values", Some("u"), json!({"value": "Linux"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({"error": "aborted"}));
    assert!(h.publisher.published().is_empty());
}

#[tokio::test]
async fn test_publish_failure_reports_persisted_row() {
    let h = Harness {
        attributes: MockAttributeRepository::new()
            .with_value(1, 1, "Windows", None)
            .with_next_id(42),
        publisher: MockEventPublisher::new().failing(),
        ..Default::default()
    };

    let (status, body) = send(
        h.router(),
        post("/api/v1/attributes/1/values", Some("u"), json!({"value": "Linux"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["persisted"], json!(true));
    assert_eq!(body["id"], json!(42));
    assert!(body["error"].is_string());

    let (status, tree) = send(h.router(), get("/api/v1/attributes/1/values")).await;
    assert_eq!(status, StatusCode::OK);
    let roots = tree["option_list"].as_array().unwrap();
    assert!(roots
        .iter()
        .any(|n| n["option_id"] == json!(42) && n["option_value"] == json!("Linux")));
}

#[tokio::test]
async fn test_add_value_blank_is_bad_request() {
    let h = Harness::default();

    let (status, _) = send(
        h.router(),
        post("/api/v1/attributes/1/values", Some("u"), json!({"value": ""})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(h.attributes.calls().is_empty());
}

// ============================================================================
// Option requests
// ============================================================================

#[tokio::test]
async fn test_option_requests_are_annotated() {
    let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let h = Harness {
        attributes: MockAttributeRepository::new().with_attribute(2, "Language"),
        option_requests: MockOptionRequestRepository::new().with_request(7, 2, "Kotlin", "u-1", t0),
        ..Default::default()
    };

    let (status, body) = send(h.router(), get("/api/v1/option-requests")).await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["option_request_id"], json!(7));
    assert_eq!(items[0]["attribute_id"], json!(2));
    assert_eq!(items[0]["attribute_name"], json!("Language"));
    assert_eq!(items[0]["option_request_value"], json!("Kotlin"));
    assert_eq!(items[0]["user_uuid"], json!("u-1"));
    assert_eq!(h.attributes.calls(), vec![AttributeCall::GetAttributes(vec![2])]);
}

#[tokio::test]
async fn test_option_requests_failure_is_internal_error() {
    let h = Harness {
        option_requests: MockOptionRequestRepository::new().failing(),
        ..Default::default()
    };
    let (status, _) = send(h.router(), get("/api/v1/option-requests")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
