//! VarBitMetricStore - concurrent series map over compressed series.
//!
//! # Locking
//!
//! A single read/write lock guards the *shape* of the id-to-series map.
//! Each series sits behind its own lock, so appends to existing series
//! only pay for a shared map lookup:
//!
//! ```text
//! add_point → sealed? → shared lookup ─ hit ──────────────────→ series.write().append
//!                                     └ miss → exclusive lock → re-check / insert ┘
//! ```
//!
//! The re-check under the exclusive lock keeps concurrent first writes to
//! one id from creating two series.

use super::stats::StoreStats;
use super::{MetricStore, SeriesMap, SharedSeries};
use crate::error::{Result, StoreError};
use crate::point::{Point, SeriesId, Timestamp};
use crate::varbit::VarBitTimeSeries;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default capacity hint for a new store.
pub const DEFAULT_METRIC_STORE_SIZE: usize = 10_000;

/// Configuration for a [`VarBitMetricStore`].
#[derive(Debug, Clone)]
pub struct MetricStoreConfig {
    /// Number of series to pre-allocate map space for.
    ///
    /// Default: 10 000.
    pub initial_capacity: usize,
}

impl Default for MetricStoreConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_METRIC_STORE_SIZE,
        }
    }
}

impl MetricStoreConfig {
    /// Creates a new configuration with a custom capacity hint.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}

/// Metric store keeping every series as a [`VarBitTimeSeries`].
///
/// The store starts writable. Once [`set_read_only(true)`] is called it
/// rejects every further [`add_point`] with
/// [`StoreError::ReadOnlyInsertion`] and never becomes writable again.
///
/// The seal check is not a barrier: an append that passed the check
/// before the seal may still land afterwards.
///
/// [`set_read_only(true)`]: MetricStore::set_read_only
/// [`add_point`]: MetricStore::add_point
#[derive(Debug)]
pub struct VarBitMetricStore {
    series: RwLock<SeriesMap>,
    read_only: AtomicBool,
}

impl Default for VarBitMetricStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VarBitMetricStore {
    /// Creates an empty, writable store with the default capacity hint.
    pub fn new() -> Self {
        Self::with_config(MetricStoreConfig::default())
    }

    /// Creates an empty, writable store sized for `capacity` series.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(MetricStoreConfig::default().with_initial_capacity(capacity))
    }

    /// Creates an empty, writable store from a configuration.
    pub fn with_config(config: MetricStoreConfig) -> Self {
        let series =
            SeriesMap::with_capacity_and_hasher(config.initial_capacity, Default::default());
        info!(
            "Created a VarBitMetricStore with size {} and readOnly {}",
            config.initial_capacity, false
        );
        Self {
            series: RwLock::new(series),
            read_only: AtomicBool::new(false),
        }
    }

    /// Looks up a series handle under the shared lock.
    fn lookup(&self, series_id: SeriesId) -> Option<SharedSeries> {
        self.series.read().get(&series_id).cloned()
    }

    /// Returns the series for `series_id`, inserting an empty one if absent.
    fn get_or_create(&self, series_id: SeriesId) -> SharedSeries {
        if let Some(series) = self.lookup(series_id) {
            return series;
        }

        let mut map = self.series.write();
        // Another writer may have inserted it between the two locks.
        Arc::clone(map.entry(series_id).or_insert_with(|| {
            debug!("Created series {}", series_id);
            Arc::new(RwLock::new(VarBitTimeSeries::new()))
        }))
    }
}

impl MetricStore for VarBitMetricStore {
    type Series = SharedSeries;

    fn get_series(&self, series_id: SeriesId) -> Vec<Point> {
        match self.lookup(series_id) {
            Some(series) => series.read().points(),
            None => Vec::new(),
        }
    }

    fn add_point(&self, series_id: SeriesId, timestamp: Timestamp, value: f64) -> Result<()> {
        if self.read_only.load(Ordering::Relaxed) {
            debug!(
                "Rejected point for series {} at {} in read only store",
                series_id, timestamp
            );
            return Err(StoreError::ReadOnlyInsertion {
                series_id,
                timestamp,
                value,
            });
        }

        let series = self.get_or_create(series_id);
        series.write().append(timestamp, value);
        Ok(())
    }

    fn get_stats(&self) -> StoreStats {
        let handles: Vec<SharedSeries> = self.series.read().values().cloned().collect();
        StoreStats::from_series(handles.iter().map(|series| series.read().stats()))
    }

    fn get_series_map(&self) -> SeriesMap {
        self.series.read().clone()
    }

    fn series_ids(&self) -> Vec<SeriesId> {
        // Copy the keys so the shared lock is held only briefly.
        self.series.read().keys().copied().collect()
    }

    fn series_count(&self) -> usize {
        self.series.read().len()
    }

    fn close(&self) {
        self.read_only.store(true, Ordering::Release);
        let released = std::mem::take(&mut *self.series.write());
        debug!("Closed metric store, released {} series", released.len());
    }

    fn is_read_only(&self) -> bool {
        self.read_only.load(Ordering::Acquire)
    }

    fn set_read_only(&self, read_only: bool) {
        if read_only {
            if !self.read_only.swap(true, Ordering::AcqRel) {
                info!("Chunk readOnly status is {}", true);
            }
        } else if self.read_only.load(Ordering::Acquire) {
            warn!("Ignoring request to make a read only store writable");
        }
    }
}
