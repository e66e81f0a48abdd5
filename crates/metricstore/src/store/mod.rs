//! Metric store contract and the VarBit implementation.
//!
//! The chunk manager drives a store through [`MetricStore`]: it writes to
//! the current store with [`MetricStore::add_point`], seals it with
//! [`MetricStore::set_read_only`] when the chunk rotates, and finally
//! releases it with [`MetricStore::close`].

mod stats;
mod varbit_store;

pub use stats::{
    SizeDistribution, StatValue, StoreStats, METRIC_COUNT, TIMESTAMP_BYTE_SIZE,
    TIMESTAMP_SIZE_DISTRIBUTION, VALUES_BYTE_SIZE, VALUE_SIZE_DISTRIBUTION,
};
pub use varbit_store::{MetricStoreConfig, VarBitMetricStore, DEFAULT_METRIC_STORE_SIZE};

use crate::error::Result;
use crate::point::{Point, SeriesId, Timestamp};
use crate::varbit::VarBitTimeSeries;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Handle to one series, shared between the store and its readers.
pub type SharedSeries = Arc<RwLock<VarBitTimeSeries>>;

/// Mapping from series id to series handle.
pub type SeriesMap<S = SharedSeries> = HashMap<SeriesId, S, ahash::RandomState>;

/// Capabilities every metric store implementation provides.
///
/// All methods take `&self`; implementations synchronize internally so a
/// store can be shared across writer and reader threads.
pub trait MetricStore: Send + Sync {
    /// Per-series handle returned by [`MetricStore::get_series_map`].
    type Series;

    /// Returns the points of a series in append order.
    ///
    /// An unknown id yields an empty vector.
    fn get_series(&self, series_id: SeriesId) -> Vec<Point>;

    /// Appends one point, creating the series if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ReadOnlyInsertion`](crate::StoreError::ReadOnlyInsertion)
    /// carrying the rejected point if the store is sealed.
    fn add_point(&self, series_id: SeriesId, timestamp: Timestamp, value: f64) -> Result<()>;

    /// Returns a diagnostic statistics snapshot.
    fn get_stats(&self) -> StoreStats;

    /// Returns the id-to-series mapping for bulk iteration.
    ///
    /// The mapping is not an atomic snapshot of series contents.
    fn get_series_map(&self) -> SeriesMap<Self::Series>;

    /// Returns the ids of all series currently in the store.
    fn series_ids(&self) -> Vec<SeriesId>;

    /// Returns the number of series currently in the store.
    fn series_count(&self) -> usize {
        self.series_ids().len()
    }

    /// Releases all series data. This is a terminal lifecycle event.
    fn close(&self);

    /// Returns true once the store has been sealed.
    fn is_read_only(&self) -> bool;

    /// Seals the store when `read_only` is true.
    ///
    /// Sealing is idempotent and cannot be undone; passing `false` to a
    /// sealed store has no effect.
    fn set_read_only(&self, read_only: bool);
}
