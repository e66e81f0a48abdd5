//! Error and Result types for metric store operations.

use crate::point::{SeriesId, Timestamp};
use thiserror::Error;

/// A convenience `Result` type for metric store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// The error type for metric store operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// A point was written to a store that has been sealed.
    ///
    /// The rejected sample is carried back so the caller can log it and
    /// route subsequent writes to a writable chunk.
    #[error(
        "Inserting a metric into a read only store for series {series_id} ts {timestamp} val {value}"
    )]
    ReadOnlyInsertion {
        /// Series the point was addressed to.
        series_id: SeriesId,
        /// Timestamp of the rejected point.
        timestamp: Timestamp,
        /// Value of the rejected point.
        value: f64,
    },
}

impl StoreError {
    /// Returns true if this error rejected a write to a sealed store.
    pub fn is_read_only(&self) -> bool {
        matches!(self, StoreError::ReadOnlyInsertion { .. })
    }
}
