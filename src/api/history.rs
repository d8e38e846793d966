use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, PageQuery};
use crate::api::validation::{page_request, validate_id, validate_non_negative};
use crate::domain::{DeviceId, Paginated};
use crate::models::personal::{History, HistoryInput};

/// GET /history?page=&limit=, most recently watched first.
pub async fn list_history(
    State(state): State<Arc<AppState>>,
    Extension(device): Extension<DeviceId>,
    Query(params): Query<PageQuery>,
) -> Result<Json<ApiResponse<Paginated<History>>>, ApiError> {
    let page = page_request(params.page, params.limit)?;
    let history = state.personalization().list_history(&device, page).await?;
    Ok(Json(ApiResponse::success(history)))
}

pub async fn list_all_history(
    State(state): State<Arc<AppState>>,
    Extension(device): Extension<DeviceId>,
) -> Result<Json<ApiResponse<Vec<History>>>, ApiError> {
    let history = state.personalization().list_all_history(&device).await?;
    Ok(Json(ApiResponse::success(history)))
}

pub async fn add_history(
    State(state): State<Arc<AppState>>,
    Extension(device): Extension<DeviceId>,
    Json(mut input): Json<HistoryInput>,
) -> Result<StatusCode, ApiError> {
    input.anime_id = validate_id("anime_id", &input.anime_id)?.to_string();
    validate_non_negative("last_watched", input.last_watched)?;
    state.personalization().add_history(&device, input).await?;
    Ok(StatusCode::NO_CONTENT)
}
