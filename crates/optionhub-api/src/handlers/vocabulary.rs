//! Vocabulary HTTP handlers.
//!
//! One set of handlers serves all seven vocabularies; the `{vocabulary}` path
//! segment selects which. Unknown slugs are 404.

use axum::{extract::State, Json};
use serde::Deserialize;

use optionhub_core::{catalog, CategoryItem, Vocabulary, VocabularyRecord};

use crate::{
    extract::{ApiJson, ApiPath, ApiQuery, RequireCaller},
    ApiError, AppState,
};

/// Query parameters for search-or-preview.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Substring to match; short or absent queries return a preview.
    #[serde(default)]
    pub name: String,
}

/// Request body for submitting a new entry.
#[derive(Debug, Deserialize)]
pub struct AddItemBody {
    pub value: String,
}

fn vocabulary(slug: &str) -> Result<Vocabulary, ApiError> {
    slug.parse::<Vocabulary>().map_err(ApiError::from)
}

/// Search a vocabulary, or preview it when the query is too short.
pub async fn search_items(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<Json<Vec<CategoryItem>>, ApiError> {
    let vocabulary = vocabulary(&slug)?;
    let items = state
        .search
        .resolve(state.vocabularies.as_ref(), vocabulary, &query.name)
        .await
        .map_err(ApiError::lookup)?;
    Ok(Json(items))
}

/// Fetch one entry; a missing row is returned with an empty value.
pub async fn get_item(
    State(state): State<AppState>,
    ApiPath((slug, id)): ApiPath<(String, i64)>,
) -> Result<Json<VocabularyRecord>, ApiError> {
    let vocabulary = vocabulary(&slug)?;
    let record = catalog::get_item(state.vocabularies.as_ref(), vocabulary, id)
        .await
        .map_err(ApiError::lookup)?;
    Ok(Json(record))
}

/// Submit a new entry for moderation. Requires a caller identity.
pub async fn add_item(
    State(state): State<AppState>,
    RequireCaller(ctx): RequireCaller,
    ApiPath(slug): ApiPath<String>,
    ApiJson(body): ApiJson<AddItemBody>,
) -> Result<Json<VocabularyRecord>, ApiError> {
    let vocabulary = vocabulary(&slug)?;
    let record = catalog::add_item(state.vocabularies.as_ref(), &ctx, vocabulary, &body.value)
        .await
        .map_err(ApiError::write)?;
    Ok(Json(record))
}

/// Every entry of a vocabulary.
pub async fn list_items(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<Vec<CategoryItem>>, ApiError> {
    let vocabulary = vocabulary(&slug)?;
    let items = state
        .vocabularies
        .list_all(vocabulary)
        .await
        .map_err(ApiError::lookup)?;
    Ok(Json(items))
}
