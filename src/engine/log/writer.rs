//! Append-only log writer
//!
//! - One log file per database (`<wal dir>/wal.log`)
//! - Records are written whole, in sequence order
//! - fsync is issued per append only when the caller asks for it
//! - After a flush the log is reset to empty; sequence numbers keep counting

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::errors::{LogError, LogResult};
use super::record::LogRecord;

pub const WAL_FILE_NAME: &str = "wal.log";

pub struct LogWriter {
    path: PathBuf,
    file: File,
    len: u64,
    /// `sync_all` instead of `sync_data`
    use_fsync: bool,
}

impl LogWriter {
    /// Open or create `<wal_dir>/wal.log` for appending
    pub fn open(wal_dir: &Path, use_fsync: bool) -> LogResult<Self> {
        fs::create_dir_all(wal_dir).map_err(|e| {
            LogError::append_failed(
                format!("Failed to create WAL directory: {}", wal_dir.display()),
                e,
            )
        })?;

        let path = wal_dir.join(WAL_FILE_NAME);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LogError::append_failed(format!("Failed to open WAL file: {}", path.display()), e)
            })?;
        let len = file
            .metadata()
            .map_err(|e| LogError::append_failed("Failed to read WAL metadata", e))?
            .len();

        Ok(Self {
            path,
            file,
            len,
            use_fsync,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current file length in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append one record; returns the number of bytes written
    pub fn append(&mut self, record: &LogRecord, sync: bool) -> LogResult<u64> {
        let bytes = record.serialize();
        self.file.write_all(&bytes).map_err(|e| {
            LogError::append_failed(
                format!("Failed to write WAL record at sequence {}", record.sequence),
                e,
            )
        })?;
        self.len += bytes.len() as u64;

        if sync {
            self.sync()?;
        }
        Ok(bytes.len() as u64)
    }

    pub fn sync(&self) -> LogResult<()> {
        let result = if self.use_fsync {
            self.file.sync_all()
        } else {
            self.file.sync_data()
        };
        result.map_err(|e| LogError::fsync_failed("WAL fsync failed", e))
    }

    /// Cut a torn or corrupt tail off the log
    pub fn truncate_to(&mut self, len: u64) -> LogResult<()> {
        self.file.set_len(len).map_err(|e| {
            LogError::append_failed(
                format!("Failed to truncate WAL file: {}", self.path.display()),
                e,
            )
        })?;
        self.file
            .sync_all()
            .map_err(|e| LogError::fsync_failed("WAL fsync after truncation failed", e))?;
        self.len = len;
        Ok(())
    }

    /// Empty the log after its contents reached the table
    pub fn reset(&mut self) -> LogResult<()> {
        self.truncate_to(0)?;
        if let Some(dir) = self.path.parent() {
            if let Ok(handle) = File::open(dir) {
                let _ = handle.sync_all();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::log::reader::LogReader;
    use tempfile::TempDir;

    #[test]
    fn test_writer_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let wal_dir = temp_dir.path().join("nested").join("wal");
        let writer = LogWriter::open(&wal_dir, false).unwrap();
        assert!(writer.path().exists());
        assert!(writer.is_empty());
    }

    #[test]
    fn test_append_tracks_length() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = LogWriter::open(temp_dir.path(), false).unwrap();
        let record = LogRecord::put(1, "k", "v");
        let written = writer.append(&record, true).unwrap();
        assert_eq!(written, record.encoded_len() as u64);
        assert_eq!(writer.len(), written);
        assert_eq!(fs::metadata(writer.path()).unwrap().len(), written);
    }

    #[test]
    fn test_reopen_appends() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut writer = LogWriter::open(temp_dir.path(), false).unwrap();
            writer.append(&LogRecord::put(1, "a", "1"), false).unwrap();
        }
        let mut writer = LogWriter::open(temp_dir.path(), false).unwrap();
        writer.append(&LogRecord::put(2, "b", "2"), true).unwrap();

        let replay = LogReader::open(writer.path()).unwrap().scan();
        assert_eq!(replay.records.len(), 2);
    }

    #[test]
    fn test_reset_empties_log() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = LogWriter::open(temp_dir.path(), true).unwrap();
        writer.append(&LogRecord::put(1, "a", "1"), true).unwrap();
        writer.reset().unwrap();
        assert!(writer.is_empty());
        writer.append(&LogRecord::put(2, "b", "2"), true).unwrap();

        let replay = LogReader::open(writer.path()).unwrap().scan();
        assert_eq!(replay.records.len(), 1);
        assert_eq!(replay.records[0].sequence, 2);
    }
}
