//! Error types
//!
//! Every failure is raised where it is detected and surfaced unchanged.
//! A failed constructor never yields a partially built entity.

use std::path::PathBuf;
use thiserror::Error;

use crate::geo::EntityKind;

pub type Result<T, E = GeoError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum GeoError {
    /// Two mutually exclusive keys were supplied, or none at all.
    #[error("{entity}: provide exactly one of {options}")]
    InvalidArgumentCombination {
        entity: EntityKind,
        options: &'static str,
    },

    /// The key failed structural validation before any lookup.
    #[error("{entity} key `{key}` is malformed: {reason}")]
    InvalidFormat {
        entity: EntityKind,
        key: String,
        reason: &'static str,
    },

    #[error("{entity} `{key}` not found{hint}")]
    NotFound {
        entity: EntityKind,
        key: String,
        hint: String,
    },

    /// A name matched several rows; retry with the scope named in `scope`.
    #[error(
        "{entity} name `{name}` is ambiguous, pass `{scope}` to choose one of: {}",
        candidates.join(", ")
    )]
    AmbiguousName {
        entity: EntityKind,
        name: String,
        scope: &'static str,
        candidates: Vec<String>,
    },

    #[error("cannot compare a {left} with a {right}")]
    InvalidComparison { left: EntityKind, right: EntityKind },

    #[error("geographic store not available at {}", path.display())]
    StoreUnavailable { path: PathBuf },

    #[error("data store error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl GeoError {
    pub(crate) fn not_found(entity: EntityKind, key: impl ToString) -> Self {
        GeoError::NotFound {
            entity,
            key: key.to_string(),
            hint: String::new(),
        }
    }

    pub(crate) fn not_found_with_hint(
        entity: EntityKind,
        key: impl ToString,
        hint: impl Into<String>,
    ) -> Self {
        GeoError::NotFound {
            entity,
            key: key.to_string(),
            hint: format!(". {}", hint.into()),
        }
    }

    pub(crate) fn invalid_format(entity: EntityKind, key: impl ToString, reason: &'static str) -> Self {
        GeoError::InvalidFormat {
            entity,
            key: key.to_string(),
            reason,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GeoError::NotFound { .. })
    }

    /// Candidates carried by an `AmbiguousName` error, empty otherwise.
    pub fn candidates(&self) -> &[String] {
        match self {
            GeoError::AmbiguousName { candidates, .. } => candidates,
            _ => &[],
        }
    }
}
