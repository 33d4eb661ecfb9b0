//! Error types for netinv-inventory

use thiserror::Error;

use crate::extractor::ExtractionError;

/// Message returned when a named interface is not part of the snapshot
pub const NOT_FOUND_MESSAGE: &str = "there is no such interface";

/// Errors that abort an inventory query
#[derive(Error, Debug, Clone)]
pub enum InventoryError {
    /// The OS interface listing failed
    #[error("failed to enumerate network interfaces: {0}")]
    Enumeration(String),

    /// A mandatory attribute could not be read
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The requested interface is not present
    #[error("there is no such interface")]
    NotFound {
        /// Name that was looked up
        name: String,
    },
}

impl InventoryError {
    /// Check if the error is the caller's lookup miss rather than a host failure
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, InventoryError::NotFound { .. })
    }
}
