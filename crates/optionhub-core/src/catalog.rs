//! Point lookups and user submissions for the flat vocabularies.

use tracing::debug;

use crate::context::RequestContext;
use crate::error::{Error, Result};
use crate::models::{Vocabulary, VocabularyRecord};
use crate::traits::VocabularyRepository;

/// Fetch one entry. A missing row yields an empty `value`, not an error.
pub async fn get_item(
    store: &dyn VocabularyRepository,
    vocabulary: Vocabulary,
    id: i64,
) -> Result<VocabularyRecord> {
    let value = store.get_by_id(vocabulary, id).await?.unwrap_or_default();
    Ok(VocabularyRecord { id, value })
}

/// Submit a new entry on behalf of the caller.
///
/// The caller identity is checked before any store call. The entry is stored
/// for moderation together with the submitting identity.
pub async fn add_item(
    store: &dyn VocabularyRepository,
    ctx: &RequestContext,
    vocabulary: Vocabulary,
    value: &str,
) -> Result<VocabularyRecord> {
    let identity = ctx.require_identity()?;

    if value.trim().is_empty() {
        return Err(Error::InvalidInput("value must not be empty".to_string()));
    }

    let id = store.insert(vocabulary, value, identity).await?;
    debug!(
        subsystem = "core",
        component = "catalog",
        op = "add_item",
        vocabulary = vocabulary.as_str(),
        value_id = id,
        "Vocabulary entry added"
    );

    Ok(VocabularyRecord {
        id,
        value: value.to_string(),
    })
}
