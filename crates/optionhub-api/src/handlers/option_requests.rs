use axum::{extract::State, Json};

use optionhub_core::{moderation, OptionRequestItem};

use crate::{ApiError, AppState};

/// Pending option requests with their attribute names.
pub async fn list_option_requests(
    State(state): State<AppState>,
) -> Result<Json<Vec<OptionRequestItem>>, ApiError> {
    let items = moderation::list_option_requests(
        state.option_requests.as_ref(),
        state.attributes.as_ref(),
    )
    .await?;
    Ok(Json(items))
}
