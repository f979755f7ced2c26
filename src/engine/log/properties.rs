//! Property names answered by `LogEngine::property`

use super::{LogEngine, State};

pub const ESTIMATE_NUM_KEYS: &str = "strata.estimate-num-keys";
pub const NUM_ENTRIES_ACTIVE_MEM_TABLE: &str = "strata.num-entries-active-mem-table";
pub const NUM_DELETES_ACTIVE_MEM_TABLE: &str = "strata.num-deletes-active-mem-table";
pub const CUR_SIZE_ACTIVE_MEM_TABLE: &str = "strata.cur-size-active-mem-table";
pub const LATEST_SEQUENCE_NUMBER: &str = "strata.latest-sequence-number";
pub const WAL_SIZE_BYTES: &str = "strata.wal-size-bytes";
pub const DB_IDENTITY: &str = "strata.db-identity";
pub const IS_SECONDARY: &str = "strata.is-secondary";
pub const OPTIONS: &str = "strata.options";

pub const ALL: &[&str] = &[
    ESTIMATE_NUM_KEYS,
    NUM_ENTRIES_ACTIVE_MEM_TABLE,
    NUM_DELETES_ACTIVE_MEM_TABLE,
    CUR_SIZE_ACTIVE_MEM_TABLE,
    LATEST_SEQUENCE_NUMBER,
    WAL_SIZE_BYTES,
    DB_IDENTITY,
    IS_SECONDARY,
    OPTIONS,
];

pub(super) fn resolve(engine: &LogEngine, state: &State, name: &str) -> Option<String> {
    let value = match name {
        ESTIMATE_NUM_KEYS => estimate_num_keys(state).to_string(),
        NUM_ENTRIES_ACTIVE_MEM_TABLE => state.memtable.num_entries().to_string(),
        NUM_DELETES_ACTIVE_MEM_TABLE => state.memtable.num_deletes().to_string(),
        CUR_SIZE_ACTIVE_MEM_TABLE => state.memtable.approximate_size().to_string(),
        LATEST_SEQUENCE_NUMBER => state.last_sequence.to_string(),
        WAL_SIZE_BYTES => state.wal_len().to_string(),
        DB_IDENTITY => engine.identity.clone(),
        IS_SECONDARY => if engine.is_secondary() { "1" } else { "0" }.to_string(),
        OPTIONS => serde_json::to_string(&state.options.to_map()).ok()?,
        _ => return None,
    };
    Some(value)
}

fn estimate_num_keys(state: &State) -> usize {
    let added = state
        .memtable
        .live_keys()
        .filter(|k| !state.table.contains_key(*k))
        .count();
    let removed = state
        .memtable
        .deleted_keys()
        .filter(|k| state.table.contains_key(*k))
        .count();
    state.table.len() + added - removed
}
