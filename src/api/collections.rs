use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{
    ApiError, ApiResponse, AppState, CollectionQuery, CollectionRequest, CollectionTypeQuery,
};
use crate::api::validation::{page_request, validate_collection_type, validate_id};
use crate::domain::{DeviceId, Paginated};
use crate::models::personal::Collection;

/// GET /collections?type=&page=&limit=
///
/// Without `type` every collection of the device is listed.
pub async fn list_collections(
    State(state): State<Arc<AppState>>,
    Extension(device): Extension<DeviceId>,
    Query(params): Query<CollectionQuery>,
) -> Result<Json<ApiResponse<Paginated<Collection>>>, ApiError> {
    let page = page_request(params.page, params.limit)?;
    let kind = match params.kind.as_deref() {
        Some(kind) => Some(validate_collection_type(Some(kind))?),
        None => None,
    };
    let collections = state
        .personalization()
        .list_collections(&device, kind, page)
        .await?;
    Ok(Json(ApiResponse::success(collections)))
}

pub async fn list_all_collections(
    State(state): State<Arc<AppState>>,
    Extension(device): Extension<DeviceId>,
) -> Result<Json<ApiResponse<Vec<Collection>>>, ApiError> {
    let collections = state
        .personalization()
        .list_all_collections(&device)
        .await?;
    Ok(Json(ApiResponse::success(collections)))
}

pub async fn add_collection(
    State(state): State<Arc<AppState>>,
    Extension(device): Extension<DeviceId>,
    Json(request): Json<CollectionRequest>,
) -> Result<StatusCode, ApiError> {
    let anime_id = validate_id("anime_id", &request.anime_id)?;
    let kind = validate_collection_type(Some(&request.kind))?;
    state
        .personalization()
        .add_collection(&device, anime_id, kind)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /collections/{anime_id}?type=
pub async fn remove_collection(
    State(state): State<Arc<AppState>>,
    Extension(device): Extension<DeviceId>,
    Path(anime_id): Path<String>,
    Query(params): Query<CollectionTypeQuery>,
) -> Result<StatusCode, ApiError> {
    let anime_id = validate_id("anime_id", &anime_id)?;
    let kind = validate_collection_type(params.kind.as_deref())?;
    state
        .personalization()
        .remove_collection(&device, anime_id, kind)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
