//! String-keyed option patches for SetOptions / SetDBOptions
//!
//! A patch is a schemaless `name -> string value` mapping. Keys are unique
//! by construction; everything else is validated by the engine.

use std::collections::{BTreeMap, HashMap};

/// Which mutable option set a patch targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionScope {
    /// SetOptions
    ColumnFamily,
    /// SetDBOptions
    Database,
}

const MUTABLE_COLUMN_FAMILY: &[&str] = &[
    "write_buffer_size",
    "level0_file_num_compaction_trigger",
    "max_bytes_for_level_base",
    "disable_auto_compactions",
];

const MUTABLE_DATABASE: &[&str] = &[
    "max_background_jobs",
    "max_background_compactions",
    "max_subcompactions",
    "max_background_flushes",
    "avoid_flush_during_shutdown",
    "writable_file_max_buffer_size",
    "delayed_write_rate",
    "max_total_wal_size",
    "delete_obsolete_files_period_micros",
    "stats_dump_period_sec",
    "stats_persist_period_sec",
    "stats_history_buffer_size",
    "max_open_files",
    "bytes_per_sync",
    "wal_bytes_per_sync",
    "strict_bytes_per_sync",
    "compaction_readahead_size",
];

impl OptionScope {
    /// Names that may be changed on a running engine in this scope
    pub fn mutable_names(&self) -> &'static [&'static str] {
        match self {
            OptionScope::ColumnFamily => MUTABLE_COLUMN_FAMILY,
            OptionScope::Database => MUTABLE_DATABASE,
        }
    }

    pub fn is_mutable(&self, name: &str) -> bool {
        self.mutable_names().contains(&name)
    }
}

/// Option name to string-encoded value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsPatch {
    entries: BTreeMap<String, String>,
}

impl OptionsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one entry
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for OptionsPatch
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<HashMap<String, String>> for OptionsPatch {
    fn from(map: HashMap<String, String>) -> Self {
        Self {
            entries: map.into_iter().collect(),
        }
    }
}

impl From<BTreeMap<String, String>> for OptionsPatch {
    fn from(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_names_collapse() {
        let patch = OptionsPatch::from_iter([("a", "1"), ("a", "2")]);
        assert_eq!(patch.len(), 1);
        assert_eq!(patch.get("a"), Some("2"));
    }

    #[test]
    fn test_iter_is_name_ordered() {
        let patch = OptionsPatch::new().set("zeta", "1").set("alpha", "2");
        let names: Vec<_> = patch.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_scopes_are_disjoint() {
        for name in OptionScope::ColumnFamily.mutable_names() {
            assert!(!OptionScope::Database.is_mutable(name));
        }
    }
}
