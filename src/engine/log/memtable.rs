//! In-memory write buffer
//!
//! Holds every change since the last flush. Deletes are kept as tombstones
//! so they shadow keys in the flushed table.

use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct MemTable {
    entries: BTreeMap<String, Option<String>>,
    num_entries: u64,
    num_deletes: u64,
    approximate_size: u64,
}

/// What the memtable knows about a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Value(&'a str),
    Deleted,
    Unknown,
}

impl MemTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: &str, value: String) {
        self.approximate_size += (key.len() + value.len()) as u64;
        self.num_entries += 1;
        self.entries.insert(key.to_string(), Some(value));
    }

    pub fn delete(&mut self, key: &str) {
        self.approximate_size += key.len() as u64;
        self.num_deletes += 1;
        self.entries.insert(key.to_string(), None);
    }

    pub fn lookup(&self, key: &str) -> Lookup<'_> {
        match self.entries.get(key) {
            Some(Some(value)) => Lookup::Value(value),
            Some(None) => Lookup::Deleted,
            None => Lookup::Unknown,
        }
    }

    /// Fold the buffered changes into `table`
    pub fn apply_to(&self, table: &mut BTreeMap<String, String>) {
        for (key, value) in &self.entries {
            match value {
                Some(value) => {
                    table.insert(key.clone(), value.clone());
                }
                None => {
                    table.remove(key);
                }
            }
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct keys touched since the last flush
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn live_keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, v)| v.is_some())
            .map(|(k, _)| k.as_str())
    }

    pub fn deleted_keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(k, _)| k.as_str())
    }

    /// Puts and merges applied since the last flush
    pub fn num_entries(&self) -> u64 {
        self.num_entries
    }

    pub fn num_deletes(&self) -> u64 {
        self.num_deletes
    }

    /// Key and value bytes written since the last flush
    pub fn approximate_size(&self) -> u64 {
        self.approximate_size
    }
}
