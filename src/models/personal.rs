use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favourite {
    pub anime_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub anime_id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    pub anime_id: String,
    pub last_watched: i32,
    pub is_watched: bool,
    pub watched_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryInput {
    pub anime_id: String,
    pub last_watched: i32,
    #[serde(default)]
    pub is_watched: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timecode {
    pub episode_id: String,
    pub anime_id: String,
    pub time: i32,
    pub is_watched: bool,
}

/// Outcome of a favourite mutation, used to decide whether a counter moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Applied,
    Unchanged,
}

impl Change {
    #[must_use]
    pub const fn from_rows(rows_affected: u64) -> Self {
        if rows_affected > 0 {
            Self::Applied
        } else {
            Self::Unchanged
        }
    }
}
