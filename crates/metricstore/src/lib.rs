//! Alopex MetricStore - in-memory storage for one time series chunk.
//!
//! This crate provides the compressed series map that backs a single chunk
//! of a chunked metrics store.
//!
//! # Components
//!
//! - [`VarBitTimeSeries`]: per-series append log with delta-of-delta
//!   timestamps and XOR-compressed values
//! - [`VarBitMetricStore`]: concurrent series map with a one-way seal
//! - [`MetricStore`]: the contract the chunk manager programs against
//!
//! # Example
//!
//! ```rust
//! use alopex_metricstore::{MetricStore, Point, StoreError, VarBitMetricStore};
//!
//! let store = VarBitMetricStore::with_capacity(1024);
//! store.add_point(42, 100, 1.0)?;
//! store.add_point(42, 200, 1.0)?;
//! assert_eq!(store.get_series(42), vec![Point::new(100, 1.0), Point::new(200, 1.0)]);
//!
//! // Seal the chunk once it rotates out of the write path.
//! store.set_read_only(true);
//! assert!(matches!(
//!     store.add_point(42, 300, 2.0),
//!     Err(StoreError::ReadOnlyInsertion { series_id: 42, .. })
//! ));
//! # Ok::<(), StoreError>(())
//! ```

#![deny(missing_docs)]

pub mod error;
pub mod point;
pub mod store;
pub mod varbit;

pub use error::{Result, StoreError};
pub use point::{Point, SeriesId, Timestamp};
pub use store::{
    MetricStore, MetricStoreConfig, SeriesMap, SharedSeries, StoreStats, VarBitMetricStore,
};
pub use varbit::{SeriesStats, VarBitTimeSeries};
