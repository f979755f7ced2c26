//! Per-call read options

use serde::{Deserialize, Serialize};

/// Options for Get and KeyMayExist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    pub readahead_size: u64,
    pub max_skippable_internal_keys: u64,
    pub verify_checksums: bool,
    pub fill_cache: bool,
    pub tailing: bool,
    pub total_order_seek: bool,
    pub auto_prefix_mode: bool,
    pub prefix_same_as_start: bool,
    pub pin_data: bool,
    pub background_purge_on_iterator_cleanup: bool,
    pub ignore_range_deletions: bool,
    pub value_size_soft_limit: u64,
    pub adaptive_readahead: bool,
    pub async_io: bool,
    pub optimize_multiget_for_io: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            readahead_size: 0,
            max_skippable_internal_keys: 0,
            verify_checksums: true,
            fill_cache: true,
            tailing: false,
            total_order_seek: false,
            auto_prefix_mode: false,
            prefix_same_as_start: false,
            pin_data: false,
            background_purge_on_iterator_cleanup: false,
            ignore_range_deletions: false,
            value_size_soft_limit: u64::MAX,
            adaptive_readahead: false,
            async_io: false,
            optimize_multiget_for_io: true,
        }
    }
}
