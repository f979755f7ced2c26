//! Log-structured reference engine
//!
//! On-disk layout under the database path:
//!
//! ```text
//! <path>/IDENTITY        UUID v4, written once at creation
//! <path>/OPTIONS         JSON snapshot of the live options
//! <path>/TABLE           flushed table {sequence, entries}
//! <path>/wal/wal.log     append-only records since the last flush
//! <secondary>/SECONDARY  marker naming the primary this replica tails
//! ```
//!
//! Writes go to the log first, then to the memtable. A flush folds the
//! memtable into `TABLE` and empties the log. Open replays log records
//! newer than the table's sequence.
//!
//! A secondary never writes under the primary's path. It rebuilds its view
//! from `TABLE` plus the log on open and on every catch-up.

mod checksum;
mod errors;
mod memtable;
mod merge;
pub mod properties;
mod reader;
mod record;
mod table;
mod writer;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::observability::{Event, Logger, Severity};
use crate::options::{
    EngineOptions, FlushOptions, OptionScope, OptionsPatch, ReadOptions, WriteOptions,
};
use crate::status::Status;

use super::{Engine, EngineResult};

pub use errors::{LogError, LogErrorCode};
pub use merge::MergeOperator;

use memtable::{Lookup, MemTable};
use reader::{LogReader, Replay};
use record::{LogRecord, RecordKind};
use table::{read_json, write_atomic, write_json_atomic, TableFile};
use writer::{LogWriter, WAL_FILE_NAME};

pub const ENGINE_NAME: &str = "StrataLog";
pub const WAL_FORMAT_VERSION: u32 = 1;

const IDENTITY_FILE_NAME: &str = "IDENTITY";
const OPTIONS_FILE_NAME: &str = "OPTIONS";
const SECONDARY_MARKER_NAME: &str = "SECONDARY";

/// Catch-up retries when the primary flushes mid-read
const CATCH_UP_ATTEMPTS: usize = 3;

const SECONDARY_WRITE: &str = "Not supported operation in secondary mode.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SecondaryMarker {
    primary_path: String,
    instance_id: Uuid,
}

struct State {
    options: EngineOptions,
    merge_operator: Option<MergeOperator>,
    table: BTreeMap<String, String>,
    table_sequence: u64,
    memtable: MemTable,
    last_sequence: u64,
    /// `None` on a secondary
    writer: Option<LogWriter>,
    /// Bytes written since the last flush
    pending_bytes: u64,
    /// Writes that skipped the log since the last flush
    unlogged_writes: bool,
    /// Readable log prefix seen by the last secondary replay
    wal_len_seen: u64,
}

impl State {
    fn new(options: EngineOptions, merge_operator: Option<MergeOperator>, table: TableFile) -> Self {
        Self {
            options,
            merge_operator,
            table_sequence: table.sequence,
            last_sequence: table.sequence,
            table: table.entries,
            memtable: MemTable::new(),
            writer: None,
            pending_bytes: 0,
            unlogged_writes: false,
            wal_len_seen: 0,
        }
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        match self.memtable.lookup(key) {
            Lookup::Value(value) => Some(value),
            Lookup::Deleted => None,
            Lookup::Unknown => self.table.get(key).map(String::as_str),
        }
    }

    fn apply(&mut self, record: &LogRecord) -> EngineResult<()> {
        match record.kind {
            RecordKind::Put => self.memtable.put(&record.key, record.value.clone()),
            RecordKind::Delete => self.memtable.delete(&record.key),
            RecordKind::Merge => {
                let operator = self.merge_operator.ok_or_else(|| {
                    Status::not_supported("Provide a merge_operator when opening DB")
                })?;
                let merged = operator.merge(self.lookup(&record.key), &record.value);
                self.memtable.put(&record.key, merged);
            }
        }
        self.last_sequence = self.last_sequence.max(record.sequence);
        Ok(())
    }

    /// Apply log records newer than everything already applied
    fn apply_replay(&mut self, replay: &Replay) -> EngineResult<usize> {
        let mut applied = 0;
        for record in &replay.records {
            if record.sequence > self.last_sequence {
                self.apply(record)?;
                applied += 1;
            }
        }
        Ok(applied)
    }

    /// Drop everything in memory and restart from `table`
    fn reset_to(&mut self, table: TableFile) {
        self.table_sequence = table.sequence;
        self.last_sequence = table.sequence;
        self.table = table.entries;
        self.memtable.clear();
    }

    fn wal_len(&self) -> u64 {
        match &self.writer {
            Some(writer) => writer.len(),
            None => self.wal_len_seen,
        }
    }
}

/// Log + memtable + flushed table engine
pub struct LogEngine {
    path: PathBuf,
    wal_dir: PathBuf,
    secondary_path: Option<PathBuf>,
    identity: String,
    state: RwLock<State>,
}

impl LogEngine {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_secondary(&self) -> bool {
        self.secondary_path.is_some()
    }

    fn wal_path(&self) -> PathBuf {
        self.wal_dir.join(WAL_FILE_NAME)
    }

    fn read_state(&self) -> EngineResult<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| Status::io_error("engine state lock poisoned"))
    }

    fn write_state(&self) -> EngineResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| Status::io_error("engine state lock poisoned"))
    }

    fn write(&self, options: &WriteOptions, kind: RecordKind, key: &str, value: &str) -> EngineResult<()> {
        validate_write_options(options)?;

        let mut state = self.write_state()?;
        if state.writer.is_none() {
            return Err(Status::not_supported(SECONDARY_WRITE));
        }
        if kind == RecordKind::Merge && state.merge_operator.is_none() {
            return Err(Status::not_supported("Provide a merge_operator when opening DB"));
        }

        if !LogRecord::fits(key.len(), value.len()) {
            return Err(Status::invalid_argument(format!(
                "Key and value too large for one log record: {} + {} bytes",
                key.len(),
                value.len()
            )));
        }

        let sequence = state.last_sequence + 1;
        let record = match kind {
            RecordKind::Put => LogRecord::put(sequence, key, value),
            RecordKind::Merge => LogRecord::merge(sequence, key, value),
            RecordKind::Delete => LogRecord::delete(sequence, key),
        };

        if options.disable_wal {
            state.unlogged_writes = true;
        } else {
            let sync = options.sync || state.options.use_fsync;
            if let Some(writer) = state.writer.as_mut() {
                writer.append(&record, sync).map_err(Status::from)?;
            }
        }

        state.apply(&record)?;
        state.pending_bytes += record.encoded_len() as u64;

        if state.pending_bytes >= state.options.write_buffer_size {
            let path = self.path.display().to_string();
            let pending = state.pending_bytes.to_string();
            match flush_state(&self.path, &mut state) {
                Ok(()) => Logger::event(
                    Event::AutoFlush,
                    &[("path", path.as_str()), ("pending_bytes", pending.as_str())],
                ),
                Err(status) => {
                    let status = status.to_string();
                    Logger::event_at(
                        Severity::Warn,
                        Event::AutoFlush,
                        &[("path", path.as_str()), ("status", status.as_str())],
                    )
                }
            }
        }
        Ok(())
    }

    fn persist_options(&self, options: &EngineOptions) -> EngineResult<()> {
        if self.is_secondary() {
            return Ok(());
        }
        write_json_atomic(&self.path.join(OPTIONS_FILE_NAME), options).map_err(Status::from)
    }

    fn change_options(&self, patch: &OptionsPatch, scope: OptionScope) -> EngineResult<()> {
        let mut state = self.write_state()?;
        let updated = state.options.apply_patch(patch, scope)?;
        self.persist_options(&updated)?;
        state.options = updated;
        Ok(())
    }

    /// One catch-up pass; `Ok(false)` when the primary flushed mid-read
    fn catch_up_once(&self, state: &mut State) -> EngineResult<bool> {
        let table = TableFile::load(&self.path).map_err(Status::from)?;
        let replay = LogReader::open(&self.wal_path()).map_err(Status::from)?.scan();
        let table_after = TableFile::load(&self.path).map_err(Status::from)?;
        if table_after.sequence != table.sequence {
            return Ok(false);
        }

        if table.sequence != state.table_sequence || replay.total_len < state.wal_len_seen {
            state.reset_to(table);
        }
        let paranoid = state.options.paranoid_checks;
        replay_into(state, replay, paranoid)?;
        Ok(true)
    }
}

/// Fold the memtable into `<path>/TABLE` and empty the log
fn flush_state(path: &Path, state: &mut State) -> EngineResult<()> {
    if state.memtable.is_empty() && state.wal_len() == 0 {
        return Ok(());
    }

    let mut entries = state.table.clone();
    state.memtable.apply_to(&mut entries);
    let table = TableFile {
        sequence: state.last_sequence,
        entries,
    };
    table.store(path).map_err(Status::from)?;

    if let Some(writer) = state.writer.as_mut() {
        writer.reset().map_err(Status::from)?;
    }

    state.table = table.entries;
    state.table_sequence = table.sequence;
    state.memtable.clear();
    state.pending_bytes = 0;
    state.unlogged_writes = false;
    Ok(())
}

fn validate_write_options(options: &WriteOptions) -> EngineResult<()> {
    if options.sync && options.disable_wal {
        return Err(Status::invalid_argument("Sync writes has to enable WAL."));
    }
    if options.protection_bytes_per_key != 0 && options.protection_bytes_per_key != 8 {
        return Err(Status::invalid_argument(
            "WriteOptions::protection_bytes_per_key other than 0 or 8 not supported",
        ));
    }
    Ok(())
}

fn resolve_merge_operator(options: &EngineOptions) -> EngineResult<Option<MergeOperator>> {
    match options.merge_operator.as_deref() {
        None | Some("") => Ok(None),
        Some(name) => MergeOperator::from_name(name)
            .map(Some)
            .ok_or_else(|| Status::invalid_argument(format!("Unknown merge operator: {}", name))),
    }
}

fn resolve_wal_dir(path: &Path, options: &EngineOptions) -> PathBuf {
    if options.wal_dir.is_empty() {
        path.join("wal")
    } else {
        PathBuf::from(&options.wal_dir)
    }
}

/// Apply a scanned log to `state`; returns the number of records applied
fn replay_into(state: &mut State, replay: Replay, paranoid: bool) -> EngineResult<usize> {
    if let Some(corruption) = &replay.corruption {
        if paranoid {
            return Err(corruption.to_status());
        }
    }
    let applied = state.apply_replay(&replay)?;
    state.wal_len_seen = replay.valid_len;
    Ok(applied)
}

fn io_status(context: &str, path: &Path, err: &std::io::Error) -> Status {
    Status::from_io(format!("{}: {}", context, path.display()), err)
}

fn load_or_create_identity(path: &Path) -> EngineResult<String> {
    let identity_path = path.join(IDENTITY_FILE_NAME);
    match fs::read_to_string(&identity_path) {
        Ok(identity) => Ok(identity.trim().to_string()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let identity = Uuid::new_v4().to_string();
            write_atomic(&identity_path, identity.as_bytes()).map_err(Status::from)?;
            Ok(identity)
        }
        Err(e) => Err(io_status("failed to read identity", &identity_path, &e)),
    }
}

impl Engine for LogEngine {
    fn name() -> &'static str {
        ENGINE_NAME
    }

    fn open(path: &Path, options: &EngineOptions) -> EngineResult<Self> {
        let exists = path.join(IDENTITY_FILE_NAME).exists();
        if !exists && !options.create_if_missing {
            return Err(Status::invalid_argument(format!(
                "{}: does not exist (create_if_missing is false)",
                path.join(IDENTITY_FILE_NAME).display()
            )));
        }
        if exists && options.error_if_exists {
            return Err(Status::invalid_argument(format!(
                "{}: exists (error_if_exists is true)",
                path.display()
            )));
        }
        let merge_operator = resolve_merge_operator(options)?;

        fs::create_dir_all(path).map_err(|e| io_status("failed to create db dir", path, &e))?;
        let identity = load_or_create_identity(path)?;
        let wal_dir = resolve_wal_dir(path, options);

        let table = TableFile::load(path).map_err(Status::from)?;
        let mut writer = LogWriter::open(&wal_dir, options.use_fsync).map_err(Status::from)?;
        let replay = LogReader::open(writer.path()).map_err(Status::from)?.scan();

        if let Some(corruption) = &replay.corruption {
            if options.paranoid_checks {
                return Err(corruption.to_status());
            }
        }
        if replay.has_unreadable_tail() {
            let dropped = (replay.total_len - replay.valid_len).to_string();
            let offset = replay.valid_len.to_string();
            let reason = if replay.has_torn_tail() {
                "torn_tail"
            } else {
                "corruption"
            };
            let wal = writer.path().display().to_string();
            Logger::event(
                Event::WalTailTruncated,
                &[
                    ("dropped_bytes", dropped.as_str()),
                    ("offset", offset.as_str()),
                    ("path", wal.as_str()),
                    ("reason", reason),
                ],
            );
            writer.truncate_to(replay.valid_len).map_err(Status::from)?;
        }

        let mut state = State::new(options.clone(), merge_operator, table);
        let applied = replay_into(&mut state, replay, false)?;
        state.pending_bytes = writer.len();
        state.writer = Some(writer);

        let applied = applied.to_string();
        let db_path = path.display().to_string();
        let sequence = state.last_sequence.to_string();
        Logger::event(
            Event::WalReplayComplete,
            &[
                ("applied", applied.as_str()),
                ("path", db_path.as_str()),
                ("sequence", sequence.as_str()),
            ],
        );

        let engine = Self {
            path: path.to_path_buf(),
            wal_dir,
            secondary_path: None,
            identity,
            state: RwLock::new(state),
        };
        engine.persist_options(options)?;
        Ok(engine)
    }

    fn open_as_secondary(
        path: &Path,
        secondary_path: &Path,
        options: &EngineOptions,
    ) -> EngineResult<Self> {
        let identity_path = path.join(IDENTITY_FILE_NAME);
        let identity = fs::read_to_string(&identity_path)
            .map_err(|e| io_status("primary database not found", path, &e))?
            .trim()
            .to_string();
        let merge_operator = resolve_merge_operator(options)?;

        fs::create_dir_all(secondary_path)
            .map_err(|e| io_status("failed to create secondary dir", secondary_path, &e))?;
        let marker_path = secondary_path.join(SECONDARY_MARKER_NAME);
        let marker = match read_json::<SecondaryMarker>(&marker_path).map_err(Status::from)? {
            Some(marker) if marker.primary_path == path.display().to_string() => marker,
            _ => SecondaryMarker {
                primary_path: path.display().to_string(),
                instance_id: Uuid::new_v4(),
            },
        };
        write_json_atomic(&marker_path, &marker).map_err(Status::from)?;

        let wal_dir = resolve_wal_dir(path, options);
        let table = TableFile::load(path).map_err(Status::from)?;
        let replay = LogReader::open(&wal_dir.join(WAL_FILE_NAME))
            .map_err(Status::from)?
            .scan();

        let mut state = State::new(options.clone(), merge_operator, table);
        let applied = replay_into(&mut state, replay, options.paranoid_checks)?;

        let applied = applied.to_string();
        let instance_id = marker.instance_id.to_string();
        let db_path = path.display().to_string();
        let sequence = state.last_sequence.to_string();
        Logger::event(
            Event::WalReplayComplete,
            &[
                ("applied", applied.as_str()),
                ("instance_id", instance_id.as_str()),
                ("path", db_path.as_str()),
                ("sequence", sequence.as_str()),
            ],
        );

        Ok(Self {
            path: path.to_path_buf(),
            wal_dir,
            secondary_path: Some(secondary_path.to_path_buf()),
            identity,
            state: RwLock::new(state),
        })
    }

    fn get(&self, _options: &ReadOptions, key: &str) -> EngineResult<Option<String>> {
        let state = self.read_state()?;
        Ok(state.lookup(key).map(str::to_string))
    }

    fn put(&self, options: &WriteOptions, key: &str, value: &str) -> EngineResult<()> {
        self.write(options, RecordKind::Put, key, value)
    }

    fn merge(&self, options: &WriteOptions, key: &str, value: &str) -> EngineResult<()> {
        self.write(options, RecordKind::Merge, key, value)
    }

    fn delete(&self, options: &WriteOptions, key: &str) -> EngineResult<()> {
        self.write(options, RecordKind::Delete, key, "")
    }

    fn key_may_exist(&self, _options: &ReadOptions, key: &str) -> (bool, String) {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        match state.memtable.lookup(key) {
            Lookup::Value(value) => (true, value.to_string()),
            Lookup::Deleted => (false, String::new()),
            Lookup::Unknown => (state.table.contains_key(key), String::new()),
        }
    }

    fn property(&self, name: &str) -> Option<String> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        properties::resolve(self, &state, name)
    }

    fn options(&self) -> EngineOptions {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .options
            .clone()
    }

    fn set_options(&self, patch: &OptionsPatch) -> EngineResult<()> {
        if patch.is_empty() {
            return Err(Status::invalid_argument("empty input"));
        }
        self.change_options(patch, OptionScope::ColumnFamily)
    }

    fn set_db_options(&self, patch: &OptionsPatch) -> EngineResult<()> {
        if patch.is_empty() {
            return Ok(());
        }
        self.change_options(patch, OptionScope::Database)
    }

    fn flush(&self, _options: &FlushOptions) -> EngineResult<()> {
        let mut state = self.write_state()?;
        if state.writer.is_none() {
            return Err(Status::not_supported(SECONDARY_WRITE));
        }
        flush_state(&self.path, &mut state)
    }

    fn try_catch_up_with_primary(&self) -> EngineResult<()> {
        if !self.is_secondary() {
            return Err(Status::not_supported(
                "TryCatchUpWithPrimary is not supported for non-secondary instance",
            ));
        }
        let mut state = self.write_state()?;
        for _ in 0..CATCH_UP_ATTEMPTS {
            if self.catch_up_once(&mut state)? {
                return Ok(());
            }
        }
        Err(Status::try_again("primary flushed during catch-up"))
    }

    fn close(self) -> Status {
        let mut state = self.state.into_inner().unwrap_or_else(PoisonError::into_inner);
        let Some(writer) = state.writer.as_ref() else {
            return Status::ok();
        };
        if let Err(e) = writer.sync() {
            return e.to_status();
        }
        if state.unlogged_writes && !state.options.avoid_flush_during_shutdown {
            if let Err(status) = flush_state(&self.path, &mut state) {
                return status;
            }
        }
        Status::ok()
    }

    fn build_properties() -> BTreeMap<String, String> {
        let mut properties = BTreeMap::new();
        properties.insert("engine".to_string(), ENGINE_NAME.to_string());
        properties.insert("version".to_string(), Self::version());
        properties.insert("wal_format_version".to_string(), WAL_FORMAT_VERSION.to_string());
        properties.insert("target_os".to_string(), std::env::consts::OS.to_string());
        properties.insert("target_arch".to_string(), std::env::consts::ARCH.to_string());
        let profile = if cfg!(debug_assertions) { "debug" } else { "release" };
        properties.insert("profile".to_string(), profile.to_string());
        properties
    }

    fn version() -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_new(dir: &Path) -> LogEngine {
        LogEngine::open(dir, &EngineOptions::create_if_missing()).unwrap()
    }

    #[test]
    fn test_open_missing_without_create_fails() {
        let temp_dir = TempDir::new().unwrap();
        let err = LogEngine::open(&temp_dir.path().join("db"), &EngineOptions::default())
            .err()
            .unwrap();
        assert!(err.is_invalid_argument());
        assert!(err.message().contains("create_if_missing is false"));
    }

    #[test]
    fn test_error_if_exists() {
        let temp_dir = TempDir::new().unwrap();
        open_new(temp_dir.path()).close();
        let options = EngineOptions {
            error_if_exists: true,
            ..EngineOptions::create_if_missing()
        };
        let err = LogEngine::open(temp_dir.path(), &options).err().unwrap();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_identity_is_stable_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let engine = open_new(temp_dir.path());
        let identity = engine.property(properties::DB_IDENTITY).unwrap();
        assert!(Uuid::parse_str(&identity).is_ok());
        assert!(engine.close().is_ok());

        let engine = open_new(temp_dir.path());
        assert_eq!(engine.property(properties::DB_IDENTITY).unwrap(), identity);
    }

    #[test]
    fn test_unknown_merge_operator_fails_open() {
        let temp_dir = TempDir::new().unwrap();
        let options = EngineOptions {
            merge_operator: Some("uint64add".to_string()),
            ..EngineOptions::create_if_missing()
        };
        let err = LogEngine::open(temp_dir.path(), &options).err().unwrap();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_write_option_validation() {
        let temp_dir = TempDir::new().unwrap();
        let engine = open_new(temp_dir.path());

        let options = WriteOptions {
            sync: true,
            disable_wal: true,
            ..WriteOptions::default()
        };
        let err = engine.put(&options, "k", "v").unwrap_err();
        assert_eq!(err.message(), "Sync writes has to enable WAL.");

        let options = WriteOptions {
            protection_bytes_per_key: 4,
            ..WriteOptions::default()
        };
        assert!(engine.put(&options, "k", "v").unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_sequence_advances_per_write() {
        let temp_dir = TempDir::new().unwrap();
        let engine = open_new(temp_dir.path());
        let write = WriteOptions::default();
        engine.put(&write, "a", "1").unwrap();
        engine.delete(&write, "a").unwrap();
        assert_eq!(
            engine.property(properties::LATEST_SEQUENCE_NUMBER).as_deref(),
            Some("2")
        );
    }

    #[test]
    fn test_key_may_exist_after_flush_is_not_definite_miss() {
        let temp_dir = TempDir::new().unwrap();
        let engine = open_new(temp_dir.path());
        engine.put(&WriteOptions::default(), "k", "v").unwrap();
        assert_eq!(
            engine.key_may_exist(&ReadOptions::default(), "k"),
            (true, "v".to_string())
        );

        engine.flush(&FlushOptions::default()).unwrap();
        assert_eq!(
            engine.key_may_exist(&ReadOptions::default(), "k"),
            (true, String::new())
        );
        assert_eq!(
            engine.key_may_exist(&ReadOptions::default(), "missing"),
            (false, String::new())
        );
    }

    #[test]
    fn test_estimate_num_keys_counts_table_and_memtable() {
        let temp_dir = TempDir::new().unwrap();
        let engine = open_new(temp_dir.path());
        let write = WriteOptions::default();
        engine.put(&write, "a", "1").unwrap();
        engine.put(&write, "b", "2").unwrap();
        engine.flush(&FlushOptions::default()).unwrap();
        engine.delete(&write, "a").unwrap();
        engine.put(&write, "c", "3").unwrap();
        assert_eq!(
            engine.property(properties::ESTIMATE_NUM_KEYS).as_deref(),
            Some("2")
        );
    }

    #[test]
    fn test_unlogged_writes_flushed_on_close() {
        let temp_dir = TempDir::new().unwrap();
        let engine = open_new(temp_dir.path());
        let options = WriteOptions {
            disable_wal: true,
            ..WriteOptions::default()
        };
        engine.put(&options, "k", "v").unwrap();
        assert!(engine.close().is_ok());

        let engine = open_new(temp_dir.path());
        assert_eq!(
            engine.get(&ReadOptions::default(), "k").unwrap().as_deref(),
            Some("v")
        );
    }

    #[test]
    fn test_options_file_written_on_open() {
        let temp_dir = TempDir::new().unwrap();
        let _engine = open_new(temp_dir.path());
        let stored: EngineOptions =
            EngineOptions::from_json_file(&temp_dir.path().join(OPTIONS_FILE_NAME)).unwrap();
        assert!(stored.create_if_missing);
    }
}
