use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, FavouriteRequest, FavouriteStatus, PageQuery};
use crate::api::validation::{page_request, validate_id};
use crate::domain::{DeviceId, Paginated};
use crate::models::personal::Favourite;

/// GET /favourites?page=&limit=
pub async fn list_favourites(
    State(state): State<Arc<AppState>>,
    Extension(device): Extension<DeviceId>,
    Query(params): Query<PageQuery>,
) -> Result<Json<ApiResponse<Paginated<Favourite>>>, ApiError> {
    let page = page_request(params.page, params.limit)?;
    let favourites = state
        .personalization()
        .list_favourites(&device, page)
        .await?;
    Ok(Json(ApiResponse::success(favourites)))
}

/// GET /favourites/all
pub async fn list_all_favourites(
    State(state): State<Arc<AppState>>,
    Extension(device): Extension<DeviceId>,
) -> Result<Json<ApiResponse<Vec<Favourite>>>, ApiError> {
    let favourites = state.personalization().list_all_favourites(&device).await?;
    Ok(Json(ApiResponse::success(favourites)))
}

/// POST /favourites
pub async fn add_favourite(
    State(state): State<Arc<AppState>>,
    Extension(device): Extension<DeviceId>,
    Json(request): Json<FavouriteRequest>,
) -> Result<StatusCode, ApiError> {
    let anime_id = validate_id("anime_id", &request.anime_id)?;
    state
        .personalization()
        .add_favourite(&device, anime_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /favourites/{anime_id}
pub async fn favourite_status(
    State(state): State<Arc<AppState>>,
    Extension(device): Extension<DeviceId>,
    Path(anime_id): Path<String>,
) -> Result<Json<ApiResponse<FavouriteStatus>>, ApiError> {
    let anime_id = validate_id("anime_id", &anime_id)?;
    let is_favourite = state
        .personalization()
        .is_favourite(&device, anime_id)
        .await?;
    Ok(Json(ApiResponse::success(FavouriteStatus {
        anime_id: anime_id.to_string(),
        is_favourite,
    })))
}

/// DELETE /favourites/{anime_id}
pub async fn remove_favourite(
    State(state): State<Arc<AppState>>,
    Extension(device): Extension<DeviceId>,
    Path(anime_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let anime_id = validate_id("anime_id", &anime_id)?;
    state
        .personalization()
        .remove_favourite(&device, anime_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
