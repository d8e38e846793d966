use axum::{
    Json,
    extract::{Query, Request, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, DeviceDto};
use crate::domain::DeviceId;

const SCHEME: &str = "Device";

#[derive(Debug, Default, Deserialize)]
pub struct DeviceQuery {
    pub device_id: Option<String>,
}

/// Resolves the caller's device identity and stores it in the request
/// extensions for the personalization handlers.
pub async fn require_device(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DeviceQuery>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let raw = extract_device_id(&headers).or_else(|| {
        state
            .config()
            .server
            .allow_device_id_in_query
            .then_some(query.device_id)
            .flatten()
    });

    let Some(raw) = raw else {
        return Err(ApiError::unauthorized("Device identity is required"));
    };

    let device = DeviceId::parse(&raw)?;
    tracing::Span::current().record("device_id", device.as_str());

    request.extensions_mut().insert(device);
    Ok(next.run(request).await)
}

/// Reads `Authorization: Device <id>`.
fn extract_device_id(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, id) = value.trim().split_once(' ')?;
    scheme
        .eq_ignore_ascii_case(SCHEME)
        .then(|| id.trim().to_string())
}

/// POST /users/device
pub async fn issue_device(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let device = state.shared.devices.issue().await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(DeviceDto {
            id: device.to_string(),
        })),
    ))
}
