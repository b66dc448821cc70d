//! Read-only moderation feed of pending option requests.

use std::collections::HashMap;

use crate::error::Result;
use crate::models::{Attribute, OptionRequest, OptionRequestItem};
use crate::traits::{AttributeRepository, OptionRequestRepository};

/// Pair each request with the name of its attribute.
///
/// Requests keep their input order. A request whose attribute is missing from
/// `attributes` gets an empty `attribute_name`.
pub fn annotate(requests: Vec<OptionRequest>, attributes: &[Attribute]) -> Vec<OptionRequestItem> {
    let names: HashMap<i64, &str> = attributes
        .iter()
        .map(|a| (a.id, a.name.as_str()))
        .collect();

    requests
        .into_iter()
        .map(|r| OptionRequestItem {
            option_request_id: r.id,
            attribute_id: r.attribute_id,
            attribute_name: names
                .get(&r.attribute_id)
                .map(|n| n.to_string())
                .unwrap_or_default(),
            option_request_value: r.value,
            user_uuid: r.user_uuid,
            created_at: r.created_at,
        })
        .collect()
}

/// Load every pending request and resolve attribute names in one batch.
pub async fn list_option_requests(
    requests: &dyn OptionRequestRepository,
    attributes: &dyn AttributeRepository,
) -> Result<Vec<OptionRequestItem>> {
    let pending = requests.list().await?;
    if pending.is_empty() {
        return Ok(Vec::new());
    }

    let mut ids: Vec<i64> = pending.iter().map(|r| r.attribute_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let resolved = attributes.get_attributes(&ids).await?;
    Ok(annotate(pending, &resolved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{AttributeCall, MockAttributeRepository, MockOptionRequestRepository};
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_requests_annotated_in_order() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let requests = MockOptionRequestRepository::new()
            .with_request(7, 2, "Kotlin", "u-1", t0)
            .with_request(8, 1, "Tver", "u-2", t0)
            .with_request(9, 2, "Zig", "u-3", t0);
        let attributes = MockAttributeRepository::new()
            .with_attribute(1, "City")
            .with_attribute(2, "Language");

        let items = list_option_requests(&requests, &attributes).await.unwrap();

        let summary: Vec<(i64, &str, &str)> = items
            .iter()
            .map(|i| {
                (
                    i.option_request_id,
                    i.attribute_name.as_str(),
                    i.option_request_value.as_str(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![(7, "Language", "Kotlin"), (8, "City", "Tver"), (9, "Language", "Zig")]
        );
        assert_eq!(
            attributes.calls(),
            vec![AttributeCall::GetAttributes(vec![1, 2])]
        );
    }

    #[tokio::test]
    async fn test_unknown_attribute_yields_empty_name() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let requests = MockOptionRequestRepository::new().with_request(1, 77, "x", "u", t0);
        let attributes = MockAttributeRepository::new();

        let items = list_option_requests(&requests, &attributes).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].attribute_name, "");
        assert_eq!(items[0].created_at, t0);
    }

    #[tokio::test]
    async fn test_empty_feed_skips_attribute_lookup() {
        let requests = MockOptionRequestRepository::new();
        let attributes = MockAttributeRepository::new();

        assert!(list_option_requests(&requests, &attributes)
            .await
            .unwrap()
            .is_empty());
        assert!(attributes.calls().is_empty());
    }

    #[tokio::test]
    async fn test_feed_failure_propagates() {
        let requests = MockOptionRequestRepository::new().failing();
        let attributes = MockAttributeRepository::new();

        assert!(list_option_requests(&requests, &attributes).await.is_err());
    }
}
