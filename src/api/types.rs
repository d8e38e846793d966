use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReleaseQuery {
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub page: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EpisodeQuery {
    pub title: Option<String>,
    pub ordinal: Option<i32>,
    #[serde(default)]
    pub dub: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct CollectionQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CollectionTypeQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FavouriteRequest {
    pub anime_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CollectionRequest {
    pub anime_id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct FavouriteStatus {
    pub anime_id: String,
    pub is_favourite: bool,
}

#[derive(Debug, Serialize)]
pub struct DeviceDto {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
}
