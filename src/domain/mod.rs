//! Domain primitives shared by the catalog and personalization layers.
//!
//! Identifiers that cross the HTTP boundary are wrapped in newtypes so a
//! device id can never be passed where an anime id is expected.

pub mod pagination;

pub use pagination::{PageMeta, PageRequest, Paginated, PaginationError};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::constants::limits::MAX_DEVICE_ID_LEN;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceIdError {
    #[error("device id is empty")]
    Empty,

    #[error("device id exceeds {MAX_DEVICE_ID_LEN} characters")]
    TooLong,

    #[error("device id contains whitespace or control characters")]
    InvalidCharacters,
}

/// Opaque identifier that scopes all personalization data.
///
/// Whoever presents the identifier owns the data behind it; the only checks
/// are presence and syntactic well-formedness.
///
/// # Examples
///
/// ```rust
/// use anigate::domain::DeviceId;
///
/// let id = DeviceId::parse("3f1c9a7e-2b1d-4c55-9e0f-7a7d1f0c2b11").unwrap();
/// assert_eq!(id.as_str(), "3f1c9a7e-2b1d-4c55-9e0f-7a7d1f0c2b11");
/// assert!(DeviceId::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn parse(raw: &str) -> Result<Self, DeviceIdError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DeviceIdError::Empty);
        }
        if trimmed.chars().count() > MAX_DEVICE_ID_LEN {
            return Err(DeviceIdError::TooLong);
        }
        if trimmed
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(DeviceIdError::InvalidCharacters);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Issues a fresh random (v4) identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Upstream catalog a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    Anilibria,
    Consumet,
}

impl Provider {
    /// Lowercase slug used in cache keys, analytics rows and metric labels.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Anilibria => "anilibria",
            Self::Consumet => "consumet",
        }
    }

    /// Tag stored alongside persisted search results.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Anilibria => "Anilibria",
            Self::Consumet => "Consumet",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_id_parse() {
        assert_eq!(DeviceId::parse(" abc ").unwrap().as_str(), "abc");
        assert_eq!(DeviceId::parse(""), Err(DeviceIdError::Empty));
        assert_eq!(
            DeviceId::parse("a b"),
            Err(DeviceIdError::InvalidCharacters)
        );
        assert_eq!(
            DeviceId::parse(&"x".repeat(MAX_DEVICE_ID_LEN + 1)),
            Err(DeviceIdError::TooLong)
        );
    }

    #[test]
    fn test_generated_device_id_is_uuid() {
        let id = DeviceId::generate();
        assert!(uuid::Uuid::parse_str(id.as_str()).is_ok());
        assert_ne!(id, DeviceId::generate());
    }

    #[test]
    fn test_provider_tags() {
        assert_eq!(Provider::Anilibria.slug(), "anilibria");
        assert_eq!(Provider::Consumet.label(), "Consumet");
        assert_eq!(Provider::Consumet.to_string(), "Consumet");
    }
}
