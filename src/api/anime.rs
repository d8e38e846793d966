use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, EpisodeQuery, ReleaseQuery, SearchQuery};
use crate::api::validation::{
    validate_id, validate_page, validate_path_segment, validate_release_limit,
    validate_search_query,
};
use crate::models::anime::{Anime, Genre, SearchPage, SearchResult};
use crate::models::episode::{Episode, EpisodeOverrides};

type ListResponse = Result<Json<ApiResponse<Vec<SearchResult>>>, ApiError>;

/// GET /anime/search/{id}
pub async fn search_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SearchResult>>, ApiError> {
    let id = validate_id("id", &id)?;
    let result = state.catalog().search_by_id(id).await?;
    Ok(Json(ApiResponse::success(result)))
}

// ============================================================================
// Anilibria
// ============================================================================

pub async fn anilibria_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> ListResponse {
    let query = validate_search_query(params.query.as_deref())?;
    let results = state.catalog().anilibria_search(query).await?;
    Ok(Json(ApiResponse::success(results)))
}

pub async fn anilibria_recommended(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReleaseQuery>,
) -> ListResponse {
    let limit = validate_release_limit(params.limit)?;
    let page = validate_page(params.page)?;
    let results = state.catalog().anilibria_recommended(limit, page).await?;
    Ok(Json(ApiResponse::success(results)))
}

pub async fn anilibria_latest(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReleaseQuery>,
) -> ListResponse {
    let limit = validate_release_limit(params.limit)?;
    let results = state.catalog().anilibria_latest(limit).await?;
    Ok(Json(ApiResponse::success(results)))
}

pub async fn anilibria_random(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReleaseQuery>,
) -> ListResponse {
    let limit = validate_release_limit(params.limit)?;
    let results = state.catalog().anilibria_random(limit).await?;
    Ok(Json(ApiResponse::success(results)))
}

pub async fn anilibria_genres(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Genre>>>, ApiError> {
    let genres = state.catalog().anilibria_genres().await?;
    Ok(Json(ApiResponse::success(genres)))
}

pub async fn anilibria_genre_releases(
    State(state): State<Arc<AppState>>,
    Path(genre_id): Path<i64>,
    Query(params): Query<ReleaseQuery>,
) -> ListResponse {
    if genre_id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid genre ID: {genre_id}. ID must be a positive integer"
        )));
    }
    let limit = validate_release_limit(params.limit)?;
    let page = validate_page(params.page)?;
    let results = state
        .catalog()
        .anilibria_genre_releases(genre_id, limit, page)
        .await?;
    Ok(Json(ApiResponse::success(results)))
}

pub async fn anilibria_info(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Anime>>, ApiError> {
    let id = validate_id("id", &id)?;
    let anime = state.catalog().anilibria_anime(id).await?;
    Ok(Json(ApiResponse::success(anime)))
}

pub async fn anilibria_episode(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Episode>>, ApiError> {
    let id = validate_id("episode id", &id)?;
    let episode = state.catalog().anilibria_episode(id).await?;
    Ok(Json(ApiResponse::success(episode)))
}

// ============================================================================
// Consumet
// ============================================================================

pub async fn consumet_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchPage>>, ApiError> {
    let query = validate_search_query(params.query.as_deref())?;
    let query = validate_path_segment("query", query)?;
    let page = validate_page(params.page)?;
    let found = state.catalog().consumet_search(query, page).await?;
    Ok(Json(ApiResponse::success(found)))
}

pub async fn consumet_recommended(State(state): State<Arc<AppState>>) -> ListResponse {
    let results = state.catalog().consumet_recommended().await?;
    Ok(Json(ApiResponse::success(results)))
}

pub async fn consumet_latest(State(state): State<Arc<AppState>>) -> ListResponse {
    let results = state.catalog().consumet_latest().await?;
    Ok(Json(ApiResponse::success(results)))
}

pub async fn consumet_genres(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Genre>>>, ApiError> {
    let genres = state.catalog().consumet_genres().await?;
    Ok(Json(ApiResponse::success(genres)))
}

pub async fn consumet_genre_releases(
    State(state): State<Arc<AppState>>,
    Path(genre): Path<String>,
) -> ListResponse {
    let genre = validate_id("genre", &genre)?;
    let results = state.catalog().consumet_genre_releases(genre).await?;
    Ok(Json(ApiResponse::success(results)))
}

pub async fn consumet_info(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Anime>>, ApiError> {
    let id = validate_id("id", &id)?;
    let anime = state.catalog().consumet_anime(id).await?;
    Ok(Json(ApiResponse::success(anime)))
}

/// GET /anime/consumet/episode/{id}?title=&ordinal=&dub=
///
/// `title` and `ordinal` replace the provider's values; an empty title or an
/// ordinal of `-1` means no override.
pub async fn consumet_episode(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<EpisodeQuery>,
) -> Result<Json<ApiResponse<Episode>>, ApiError> {
    let id = validate_id("episode id", &id)?;
    let overrides = EpisodeOverrides::from_query(params.title, params.ordinal);
    let episode = state
        .catalog()
        .consumet_episode(id, overrides, params.dub)
        .await?;
    Ok(Json(ApiResponse::success(episode)))
}
