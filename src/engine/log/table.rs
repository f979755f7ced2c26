//! Flushed table and small metadata files
//!
//! `TABLE` holds every live key at the sequence it was flushed at. It is
//! rewritten whole using the atomic write pattern:
//! 1. Write to a temp file
//! 2. fsync the temp file
//! 3. Rename temp to final
//! 4. fsync the directory

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::errors::{LogError, LogResult};

pub const TABLE_FILE_NAME: &str = "TABLE";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFile {
    /// Last sequence number folded into `entries`
    pub sequence: u64,
    pub entries: BTreeMap<String, String>,
}

impl TableFile {
    /// Read `<dir>/TABLE`; a missing table is empty at sequence 0
    pub fn load(dir: &Path) -> LogResult<Self> {
        Ok(read_json(&dir.join(TABLE_FILE_NAME))?.unwrap_or_default())
    }

    pub fn store(&self, dir: &Path) -> LogResult<()> {
        write_json_atomic(&dir.join(TABLE_FILE_NAME), self)
    }
}

/// Read and parse a JSON file, `None` when it does not exist
pub fn read_json<T: DeserializeOwned>(path: &Path) -> LogResult<Option<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(LogError::table_io(
                format!("failed to read {}", path.display()),
                e,
            ))
        }
    };
    let value = serde_json::from_str(&content).map_err(|e| {
        LogError::corruption(format!("failed to parse {}: {}", path.display(), e))
    })?;
    Ok(Some(value))
}

pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> LogResult<()> {
    let content = serde_json::to_string_pretty(value).map_err(|e| {
        LogError::table_io(
            format!("failed to serialize {}", path.display()),
            io::Error::new(io::ErrorKind::InvalidData, e),
        )
    })?;
    write_atomic(path, content.as_bytes())
}

pub fn write_atomic(path: &Path, content: &[u8]) -> LogResult<()> {
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = Path::new(&temp_name);

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| {
            LogError::table_io(format!("failed to create {}", temp_path.display()), e)
        })?;

    file.write_all(content)
        .map_err(|e| LogError::table_io(format!("failed to write {}", temp_path.display()), e))?;
    file.sync_all()
        .map_err(|e| LogError::fsync_failed(format!("failed to fsync {}", temp_path.display()), e))?;

    fs::rename(temp_path, path).map_err(|e| {
        LogError::table_io(format!("failed to commit {}", path.display()), e)
    })?;

    if let Some(parent) = path.parent() {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }
    Ok(())
}
