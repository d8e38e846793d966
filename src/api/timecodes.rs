use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::api::validation::{validate_id, validate_non_negative};
use crate::domain::DeviceId;
use crate::models::personal::Timecode;

pub async fn list_timecodes(
    State(state): State<Arc<AppState>>,
    Extension(device): Extension<DeviceId>,
) -> Result<Json<ApiResponse<Vec<Timecode>>>, ApiError> {
    let timecodes = state.personalization().list_timecodes(&device).await?;
    Ok(Json(ApiResponse::success(timecodes)))
}

/// POST /timecodes, one row per (device, episode).
pub async fn add_timecode(
    State(state): State<Arc<AppState>>,
    Extension(device): Extension<DeviceId>,
    Json(mut timecode): Json<Timecode>,
) -> Result<StatusCode, ApiError> {
    timecode.episode_id = validate_id("episode_id", &timecode.episode_id)?.to_string();
    timecode.anime_id = validate_id("anime_id", &timecode.anime_id)?.to_string();
    validate_non_negative("time", timecode.time)?;
    state
        .personalization()
        .add_timecode(&device, timecode)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_timecode(
    State(state): State<Arc<AppState>>,
    Extension(device): Extension<DeviceId>,
    Path(episode_id): Path<String>,
) -> Result<Json<ApiResponse<Timecode>>, ApiError> {
    let episode_id = validate_id("episode_id", &episode_id)?;
    let timecode = state
        .personalization()
        .get_timecode(&device, episode_id)
        .await?;
    Ok(Json(ApiResponse::success(timecode)))
}

pub async fn list_anime_timecodes(
    State(state): State<Arc<AppState>>,
    Extension(device): Extension<DeviceId>,
    Path(anime_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Timecode>>>, ApiError> {
    let anime_id = validate_id("anime_id", &anime_id)?;
    let timecodes = state
        .personalization()
        .list_anime_timecodes(&device, anime_id)
        .await?;
    Ok(Json(ApiResponse::success(timecodes)))
}
