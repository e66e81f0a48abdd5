//! Diagnostic statistics snapshot for a metric store.

use crate::varbit::SeriesStats;
use serde::Serialize;
use std::collections::BTreeMap;

/// Stat name for the number of series.
pub const METRIC_COUNT: &str = "MetricCount";
/// Stat name for the distribution of encoded timestamp buffer sizes.
pub const TIMESTAMP_SIZE_DISTRIBUTION: &str = "TimeStampSizeDistribution";
/// Stat name for the distribution of encoded value buffer sizes.
pub const VALUE_SIZE_DISTRIBUTION: &str = "ValueSizeDistribution";
/// Stat name for the total encoded timestamp bytes.
pub const TIMESTAMP_BYTE_SIZE: &str = "TimeStampByteSize";
/// Stat name for the total encoded value bytes.
pub const VALUES_BYTE_SIZE: &str = "ValuesByteSize";

/// Frequency of each encoded buffer length, in bytes.
pub type SizeDistribution = BTreeMap<usize, u64>;

/// Statistics over every series in a store.
///
/// Built without holding the map lock for the whole pass, so the counts
/// may mix series observed at slightly different moments.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StoreStats {
    /// Number of series in the store.
    #[serde(rename = "MetricCount")]
    pub metric_count: usize,
    /// Number of series per encoded timestamp buffer length.
    #[serde(rename = "TimeStampSizeDistribution")]
    pub timestamp_size_distribution: SizeDistribution,
    /// Number of series per encoded value buffer length.
    #[serde(rename = "ValueSizeDistribution")]
    pub value_size_distribution: SizeDistribution,
    /// Sum of encoded timestamp bytes across series.
    #[serde(rename = "TimeStampByteSize")]
    pub timestamp_byte_size: u64,
    /// Sum of encoded value bytes across series.
    #[serde(rename = "ValuesByteSize")]
    pub values_byte_size: u64,
}

/// A single entry of [`StoreStats::to_map`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    /// A count or byte total.
    Scalar(u64),
    /// A size frequency distribution.
    Distribution(SizeDistribution),
}

impl StoreStats {
    /// Aggregates per-series statistics.
    pub fn from_series<I>(series: I) -> Self
    where
        I: IntoIterator<Item = SeriesStats>,
    {
        let mut stats = Self::default();
        for s in series {
            stats.metric_count += 1;
            *stats
                .timestamp_size_distribution
                .entry(s.timestamps.byte_len)
                .or_insert(0) += 1;
            *stats
                .value_size_distribution
                .entry(s.values.byte_len)
                .or_insert(0) += 1;
            stats.timestamp_byte_size += s.timestamps.byte_len as u64;
            stats.values_byte_size += s.values.byte_len as u64;
        }
        stats
    }

    /// Returns the stats keyed by their fixed names.
    pub fn to_map(&self) -> BTreeMap<&'static str, StatValue> {
        BTreeMap::from([
            (METRIC_COUNT, StatValue::Scalar(self.metric_count as u64)),
            (
                TIMESTAMP_SIZE_DISTRIBUTION,
                StatValue::Distribution(self.timestamp_size_distribution.clone()),
            ),
            (
                VALUE_SIZE_DISTRIBUTION,
                StatValue::Distribution(self.value_size_distribution.clone()),
            ),
            (TIMESTAMP_BYTE_SIZE, StatValue::Scalar(self.timestamp_byte_size)),
            (VALUES_BYTE_SIZE, StatValue::Scalar(self.values_byte_size)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::varbit::BufferStats;

    fn series_stats(ts_bytes: usize, val_bytes: usize) -> SeriesStats {
        SeriesStats {
            timestamps: BufferStats {
                byte_len: ts_bytes,
                bit_len: ts_bytes * 8,
                count: 1,
            },
            values: BufferStats {
                byte_len: val_bytes,
                bit_len: val_bytes * 8,
                count: 1,
            },
        }
    }

    #[test]
    fn test_from_series() {
        let stats = StoreStats::from_series(vec![
            series_stats(8, 8),
            series_stats(8, 10),
            series_stats(12, 10),
        ]);

        assert_eq!(stats.metric_count, 3);
        assert_eq!(stats.timestamp_size_distribution, BTreeMap::from([(8, 2), (12, 1)]));
        assert_eq!(stats.value_size_distribution, BTreeMap::from([(8, 1), (10, 2)]));
        assert_eq!(stats.timestamp_byte_size, 28);
        assert_eq!(stats.values_byte_size, 28);
    }

    #[test]
    fn test_empty() {
        let stats = StoreStats::from_series(Vec::new());
        assert_eq!(stats, StoreStats::default());
        assert_eq!(stats.to_map()[METRIC_COUNT], StatValue::Scalar(0));
    }

    #[test]
    fn test_map_keys_match_serialized_names() {
        let stats = StoreStats::from_series(vec![series_stats(9, 9)]);
        let json = serde_json::to_value(&stats).unwrap();
        let object = json.as_object().unwrap();

        let map = stats.to_map();
        assert_eq!(object.len(), map.len());
        for key in map.keys() {
            assert!(object.contains_key(*key), "missing {key}");
        }
        assert_eq!(object[METRIC_COUNT], serde_json::json!(1));
        assert_eq!(object[TIMESTAMP_SIZE_DISTRIBUTION], serde_json::json!({"9": 1}));
    }
}
