//! Per-call write options

use serde::{Deserialize, Serialize};

/// Options for Put, Merge and Del
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteOptions {
    /// fsync the log before acknowledging
    pub sync: bool,
    /// Skip the log entirely; the write is lost on crash
    #[serde(rename = "disableWAL")]
    pub disable_wal: bool,
    pub ignore_missing_column_families: bool,
    pub no_slowdown: bool,
    pub low_pri: bool,
    pub memtable_insert_hint_per_batch: bool,
    /// Per-key integrity protection; engines accept 0 or 8
    pub protection_bytes_per_key: usize,
}

impl WriteOptions {
    /// Durable write: fsync before acknowledgment
    pub fn synced() -> Self {
        Self {
            sync: true,
            ..Self::default()
        }
    }
}
