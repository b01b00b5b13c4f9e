//! Error types for store editing and persistence.

use pagecraft_core::{SectionId, SettingsViolation};
use thiserror::Error;

/// Errors a persistence backend can report.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Database error from sqlx.
    #[cfg(feature = "postgres")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the backend is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Backend cannot be reached.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Errors from editing operations on a [`crate::SectionStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No section with the given ID exists in the store.
    #[error("section {0} not found")]
    SectionNotFound(SectionId),

    /// A positional argument pointed outside the collection.
    #[error("index {index} out of bounds for {len} sections")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Errors from saving a store.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Settings failed schema validation; nothing was persisted.
    #[error("settings failed validation ({} problems)", violations.len())]
    Validation { violations: Vec<SettingsViolation> },

    /// The persistence backend rejected the save.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
