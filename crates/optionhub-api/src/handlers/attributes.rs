//! Attribute value handlers: the option tree and value submission.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use optionhub_core::{assemble, NewAttributeValue, OptionNode};

use crate::{
    extract::{ApiJson, ApiPath, RequireCaller},
    ApiError, AppState,
};

#[derive(Debug, Serialize)]
pub struct OptionTreeResponse {
    pub option_list: Vec<OptionNode>,
}

#[derive(Debug, Deserialize)]
pub struct AddValueBody {
    pub value: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AddValueResponse {
    pub id: i64,
}

/// The option forest of one attribute.
pub async fn get_value_tree(
    State(state): State<AppState>,
    ApiPath(attribute_id): ApiPath<i64>,
) -> Result<Json<OptionTreeResponse>, ApiError> {
    let rows = state.attributes.list_values(attribute_id).await?;
    Ok(Json(OptionTreeResponse {
        option_list: assemble(&rows),
    }))
}

/// Persist a value and publish its change event.
///
/// A publish failure after a successful insert is reported as 502 with
/// `persisted: true` and the new id.
pub async fn add_value(
    State(state): State<AppState>,
    RequireCaller(ctx): RequireCaller,
    ApiPath(attribute_id): ApiPath<i64>,
    ApiJson(body): ApiJson<AddValueBody>,
) -> Result<Json<AddValueResponse>, ApiError> {
    let id = state
        .pipeline
        .add_attribute_value(
            &ctx,
            NewAttributeValue {
                attribute_id,
                value: body.value,
                parent_id: body.parent_id,
            },
        )
        .await
        .map_err(ApiError::write)?;
    Ok(Json(AddValueResponse { id }))
}
