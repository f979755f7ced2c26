//! Engine-open options
//!
//! Defaults mirror the values an LSM engine ships with. The facade never
//! inspects these; they are handed to the engine on open and returned by
//! `get_options` as a snapshot.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::patch::{OptionScope, OptionsPatch};
use crate::status::Status;

/// Options used when opening an engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    // Column family (SetOptions-mutable subset lives in OptionScope)
    pub write_buffer_size: u64,
    pub level0_file_num_compaction_trigger: i32,
    pub max_bytes_for_level_base: u64,
    pub disable_auto_compactions: bool,
    /// Name of the built-in merge operator, if any
    pub merge_operator: Option<String>,

    // Database
    pub create_if_missing: bool,
    pub create_missing_column_families: bool,
    pub error_if_exists: bool,
    pub paranoid_checks: bool,
    pub flush_verify_memtable_count: bool,
    pub track_and_verify_wals_in_manifest: bool,
    pub verify_sst_unique_id_in_manifest: bool,
    pub max_open_files: i32,
    pub max_file_opening_threads: i32,
    pub max_total_wal_size: u64,
    pub use_fsync: bool,
    pub db_log_dir: String,
    pub wal_dir: String,
    pub delete_obsolete_files_period_micros: u64,
    pub max_background_jobs: i32,
    pub max_background_compactions: i32,
    pub max_subcompactions: u32,
    pub max_background_flushes: i32,
    pub max_log_file_size: u64,
    pub log_file_time_to_roll: u64,
    pub keep_log_file_num: u64,
    pub recycle_log_file_num: u64,
    pub max_manifest_file_size: u64,
    pub table_cache_numshardbits: i32,
    #[serde(rename = "WAL_ttl_seconds")]
    pub wal_ttl_seconds: u64,
    #[serde(rename = "WAL_size_limit_MB")]
    pub wal_size_limit_mb: u64,
    pub manifest_preallocation_size: u64,
    pub allow_mmap_reads: bool,
    pub allow_mmap_writes: bool,
    pub use_direct_reads: bool,
    pub use_direct_io_for_flush_and_compaction: bool,
    pub allow_fallocate: bool,
    pub is_fd_close_on_exec: bool,
    pub stats_dump_period_sec: u32,
    pub stats_persist_period_sec: u32,
    pub persist_stats_to_disk: bool,
    pub stats_history_buffer_size: u64,
    pub advise_random_on_open: bool,
    pub db_write_buffer_size: u64,
    pub compaction_readahead_size: u64,
    pub random_access_max_buffer_size: u64,
    pub writable_file_max_buffer_size: u64,
    pub use_adaptive_mutex: bool,
    pub bytes_per_sync: u64,
    pub wal_bytes_per_sync: u64,
    pub strict_bytes_per_sync: bool,
    pub enable_thread_tracking: bool,
    pub delayed_write_rate: u64,
    pub enable_pipelined_write: bool,
    pub unordered_write: bool,
    pub allow_concurrent_memtable_write: bool,
    pub enable_write_thread_adaptive_yield: bool,
    pub max_write_batch_group_size_bytes: u64,
    pub write_thread_max_yield_usec: u64,
    pub write_thread_slow_yield_usec: u64,
    pub skip_stats_update_on_db_open: bool,
    pub skip_checking_sst_file_sizes_on_db_open: bool,
    pub allow_2pc: bool,
    pub fail_if_options_file_error: bool,
    pub dump_malloc_stats: bool,
    pub avoid_flush_during_recovery: bool,
    pub avoid_flush_during_shutdown: bool,
    pub allow_ingest_behind: bool,
    pub two_write_queues: bool,
    pub manual_wal_flush: bool,
    pub atomic_flush: bool,
    pub avoid_unnecessary_blocking_io: bool,
    pub write_dbid_to_manifest: bool,
    pub log_readahead_size: u64,
    pub best_efforts_recovery: bool,
    pub max_bgerror_resume_count: i32,
    pub bgerror_resume_retry_interval: u64,
    pub allow_data_in_errors: bool,
    pub db_host_id: String,
    pub enforce_single_del_contracts: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            write_buffer_size: 64 << 20,
            level0_file_num_compaction_trigger: 4,
            max_bytes_for_level_base: 256 << 20,
            disable_auto_compactions: false,
            merge_operator: None,

            create_if_missing: false,
            create_missing_column_families: false,
            error_if_exists: false,
            paranoid_checks: true,
            flush_verify_memtable_count: true,
            track_and_verify_wals_in_manifest: false,
            verify_sst_unique_id_in_manifest: true,
            max_open_files: -1,
            max_file_opening_threads: 16,
            max_total_wal_size: 0,
            use_fsync: false,
            db_log_dir: String::new(),
            wal_dir: String::new(),
            delete_obsolete_files_period_micros: 6 * 60 * 60 * 1_000_000,
            max_background_jobs: 2,
            max_background_compactions: -1,
            max_subcompactions: 1,
            max_background_flushes: -1,
            max_log_file_size: 0,
            log_file_time_to_roll: 0,
            keep_log_file_num: 1000,
            recycle_log_file_num: 0,
            max_manifest_file_size: 1024 << 20,
            table_cache_numshardbits: 6,
            wal_ttl_seconds: 0,
            wal_size_limit_mb: 0,
            manifest_preallocation_size: 4 << 20,
            allow_mmap_reads: false,
            allow_mmap_writes: false,
            use_direct_reads: false,
            use_direct_io_for_flush_and_compaction: false,
            allow_fallocate: true,
            is_fd_close_on_exec: true,
            stats_dump_period_sec: 600,
            stats_persist_period_sec: 600,
            persist_stats_to_disk: false,
            stats_history_buffer_size: 1 << 20,
            advise_random_on_open: true,
            db_write_buffer_size: 0,
            compaction_readahead_size: 2 << 20,
            random_access_max_buffer_size: 1 << 20,
            writable_file_max_buffer_size: 1 << 20,
            use_adaptive_mutex: false,
            bytes_per_sync: 0,
            wal_bytes_per_sync: 0,
            strict_bytes_per_sync: false,
            enable_thread_tracking: false,
            delayed_write_rate: 0,
            enable_pipelined_write: false,
            unordered_write: false,
            allow_concurrent_memtable_write: true,
            enable_write_thread_adaptive_yield: true,
            max_write_batch_group_size_bytes: 1 << 20,
            write_thread_max_yield_usec: 100,
            write_thread_slow_yield_usec: 3,
            skip_stats_update_on_db_open: false,
            skip_checking_sst_file_sizes_on_db_open: false,
            allow_2pc: false,
            fail_if_options_file_error: false,
            dump_malloc_stats: false,
            avoid_flush_during_recovery: false,
            avoid_flush_during_shutdown: false,
            allow_ingest_behind: false,
            two_write_queues: false,
            manual_wal_flush: false,
            atomic_flush: false,
            avoid_unnecessary_blocking_io: false,
            write_dbid_to_manifest: false,
            log_readahead_size: 0,
            best_efforts_recovery: false,
            max_bgerror_resume_count: i32::MAX,
            bgerror_resume_retry_interval: 1_000_000,
            allow_data_in_errors: false,
            db_host_id: "__hostname__".to_string(),
            enforce_single_del_contracts: true,
        }
    }
}

impl EngineOptions {
    /// Default options with `create_if_missing` set
    pub fn create_if_missing() -> Self {
        Self {
            create_if_missing: true,
            ..Self::default()
        }
    }

    /// Export every option as `name -> value`
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(fields)) => fields.into_iter().collect(),
            _ => BTreeMap::new(),
        }
    }

    /// Rebuild options from a `name -> value` mapping.
    ///
    /// Missing names keep their defaults; unknown names are ignored.
    pub fn from_map(map: BTreeMap<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(map.into_iter().collect()))
    }

    /// Load options from a JSON file
    pub fn from_json_file(path: &Path) -> std::io::Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Apply a string-encoded patch, returning the updated options.
    ///
    /// The patch is all-or-nothing: on any rejected entry the receiver is
    /// left untouched and the first failure is reported.
    pub fn apply_patch(&self, patch: &OptionsPatch, scope: OptionScope) -> Result<Self, Status> {
        let mut fields = self.to_map();
        let mut updated = self.clone();

        for (name, raw) in patch.iter() {
            let current = match fields.get(name) {
                Some(value) => value,
                None => {
                    return Err(Status::invalid_argument(format!(
                        "Unrecognized option: {}",
                        name
                    )))
                }
            };
            if !scope.is_mutable(name) {
                return Err(Status::invalid_argument(format!(
                    "Option not changeable: {}",
                    name
                )));
            }

            let parse_error =
                || Status::invalid_argument(format!("Error parsing {}: {}", name, raw));

            let parsed = parse_like(current, raw).ok_or_else(parse_error)?;
            fields.insert(name.to_string(), parsed);

            // Deserialize per entry so range errors name the offending option
            updated = Self::from_map(fields.clone()).map_err(|_| parse_error())?;
        }

        Ok(updated)
    }
}

/// Parse `raw` into a JSON value of the same shape as `current`
fn parse_like(current: &Value, raw: &str) -> Option<Value> {
    let raw = raw.trim();
    match current {
        Value::Bool(_) => match raw {
            "true" | "1" => Some(Value::Bool(true)),
            "false" | "0" => Some(Value::Bool(false)),
            _ => None,
        },
        Value::Number(_) => {
            if let Ok(n) = raw.parse::<i64>() {
                Some(Value::from(n))
            } else {
                raw.parse::<u64>().ok().map(Value::from)
            }
        }
        Value::String(_) => Some(Value::String(raw.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = EngineOptions::default();
        assert_eq!(options.write_buffer_size, 67_108_864);
        assert_eq!(options.max_open_files, -1);
        assert!(options.paranoid_checks);
        assert!(!options.create_if_missing);
        assert!(options.merge_operator.is_none());
    }

    #[test]
    fn test_map_round_trip() {
        let mut options = EngineOptions::create_if_missing();
        options.wal_ttl_seconds = 30;
        options.db_host_id = "node-a".to_string();

        let map = options.to_map();
        assert_eq!(map["WAL_ttl_seconds"], Value::from(30u64));
        assert_eq!(map["create_if_missing"], Value::Bool(true));

        let restored = EngineOptions::from_map(map).unwrap();
        assert_eq!(restored, options);
    }

    #[test]
    fn test_from_partial_map_keeps_defaults() {
        let mut map = BTreeMap::new();
        map.insert("use_fsync".to_string(), Value::Bool(true));
        let options = EngineOptions::from_map(map).unwrap();
        assert!(options.use_fsync);
        assert_eq!(options.keep_log_file_num, 1000);
    }

    #[test]
    fn test_apply_patch_column_family() {
        let options = EngineOptions::default();
        let patch = OptionsPatch::from_iter([
            ("write_buffer_size", "1024"),
            ("disable_auto_compactions", "true"),
        ]);
        let updated = options.apply_patch(&patch, OptionScope::ColumnFamily).unwrap();
        assert_eq!(updated.write_buffer_size, 1024);
        assert!(updated.disable_auto_compactions);
    }

    #[test]
    fn test_apply_patch_rejects_unknown() {
        let patch = OptionsPatch::from_iter([("no_such_option", "1")]);
        let err = EngineOptions::default()
            .apply_patch(&patch, OptionScope::ColumnFamily)
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.message().contains("no_such_option"));
    }

    #[test]
    fn test_apply_patch_rejects_wrong_scope() {
        let patch = OptionsPatch::from_iter([("max_background_jobs", "4")]);
        let err = EngineOptions::default()
            .apply_patch(&patch, OptionScope::ColumnFamily)
            .unwrap_err();
        assert!(err.message().starts_with("Option not changeable"));

        let updated = EngineOptions::default()
            .apply_patch(&patch, OptionScope::Database)
            .unwrap();
        assert_eq!(updated.max_background_jobs, 4);
    }

    #[test]
    fn test_apply_patch_rejects_bad_value() {
        let patch = OptionsPatch::from_iter([("write_buffer_size", "-5")]);
        let err = EngineOptions::default()
            .apply_patch(&patch, OptionScope::ColumnFamily)
            .unwrap_err();
        assert_eq!(err.message(), "Error parsing write_buffer_size: -5");

        let patch = OptionsPatch::from_iter([("disable_auto_compactions", "maybe")]);
        assert!(EngineOptions::default()
            .apply_patch(&patch, OptionScope::ColumnFamily)
            .is_err());
    }
}
