//! Log reader for replay and secondary catch-up
//!
//! Replay rules:
//! - Records are read strictly in file order
//! - Sequence numbers must strictly increase within one log file
//! - A record that reaches the end of the file without decoding is a torn
//!   tail, not corruption, provided no complete record follows it
//! - Any other framing or checksum failure is corruption at that offset
//! - Replay stops at the first unreadable record; its offset is the length
//!   of the readable prefix

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::errors::{LogError, LogResult};
use super::record::{DecodeError, LogRecord, MIN_RECORD_SIZE};

/// Result of one `read_next` step
#[derive(Debug)]
pub enum ReadOutcome {
    Record(LogRecord),
    /// Clean end of file
    End,
    /// Unreadable bytes from `offset` to the end of the file
    TornTail { offset: u64, dropped: u64 },
}

/// Everything a full scan learned about a log file
#[derive(Debug, Default)]
pub struct Replay {
    pub records: Vec<LogRecord>,
    /// Length of the readable prefix
    pub valid_len: u64,
    pub total_len: u64,
    /// Set when a record before the tail failed to decode
    pub corruption: Option<LogError>,
}

impl Replay {
    pub fn has_torn_tail(&self) -> bool {
        self.corruption.is_none() && self.valid_len < self.total_len
    }

    /// Bytes past the readable prefix, torn or corrupt
    pub fn has_unreadable_tail(&self) -> bool {
        self.valid_len < self.total_len
    }
}

pub struct LogReader {
    path: PathBuf,
    data: Vec<u8>,
    offset: usize,
    last_sequence: u64,
}

impl LogReader {
    /// Load a log file. A missing file reads as empty.
    pub fn open(path: &Path) -> LogResult<Self> {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(LogError::table_io(
                    format!("Failed to read log file: {}", path.display()),
                    e,
                ))
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            data,
            offset: 0,
            last_sequence: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current_offset(&self) -> u64 {
        self.offset as u64
    }

    pub fn file_len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn read_next(&mut self) -> LogResult<ReadOutcome> {
        if self.offset >= self.data.len() {
            return Ok(ReadOutcome::End);
        }

        let remaining = &self.data[self.offset..];
        match LogRecord::deserialize(remaining) {
            Ok((record, consumed)) => {
                if self.last_sequence > 0 && record.sequence <= self.last_sequence {
                    return Err(LogError::corruption_at_sequence(
                        record.sequence,
                        format!(
                            "Non-increasing sequence number: after {}, got {}",
                            self.last_sequence, record.sequence
                        ),
                    ));
                }
                self.offset += consumed;
                self.last_sequence = record.sequence;
                Ok(ReadOutcome::Record(record))
            }
            Err(DecodeError::Incomplete { needed, available }) => self.tail_or_corruption(
                format!(
                    "Record needs {} bytes, only {} left in log",
                    needed, available
                ),
            ),
            Err(DecodeError::Invalid(reason)) => self.tail_or_corruption(reason),
        }
    }

    /// A record reaching past EOF is a torn write only when nothing
    /// decodable follows it; otherwise its framing was damaged mid-log.
    fn tail_or_corruption(&self, reason: String) -> LogResult<ReadOutcome> {
        let remaining = &self.data[self.offset..];
        if self.claimed_end(remaining) >= remaining.len() && !contains_record(&remaining[1..]) {
            return Ok(self.torn_tail());
        }
        Err(LogError::corruption_at_offset(self.offset as u64, reason))
    }

    /// Read every record up to the first unreadable byte.
    pub fn scan(mut self) -> Replay {
        let mut replay = Replay {
            total_len: self.file_len(),
            ..Replay::default()
        };
        loop {
            match self.read_next() {
                Ok(ReadOutcome::Record(record)) => replay.records.push(record),
                Ok(ReadOutcome::End) | Ok(ReadOutcome::TornTail { .. }) => break,
                Err(e) => {
                    replay.corruption = Some(e);
                    break;
                }
            }
        }
        replay.valid_len = self.current_offset();
        replay
    }

    fn claimed_end(&self, remaining: &[u8]) -> usize {
        if remaining.len() < 4 {
            return remaining.len();
        }
        let mut len_buf = [0u8; 4];
        len_buf.copy_from_slice(&remaining[..4]);
        (u32::from_le_bytes(len_buf) as usize).max(MIN_RECORD_SIZE)
    }

    /// The offset stays at the start of the unreadable record so that
    /// `current_offset` is the length of the readable prefix.
    fn torn_tail(&self) -> ReadOutcome {
        let offset = self.offset as u64;
        ReadOutcome::TornTail {
            offset,
            dropped: self.file_len() - offset,
        }
    }
}

/// True when a complete, checksummed record starts anywhere in `data`
fn contains_record(data: &[u8]) -> bool {
    (0..data.len().saturating_sub(MIN_RECORD_SIZE - 1))
        .any(|start| LogRecord::deserialize(&data[start..]).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::OpenOptions;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_records(path: &Path, records: &[LogRecord]) -> Vec<usize> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .unwrap();
        let mut ends = Vec::new();
        let mut total = 0;
        for record in records {
            let bytes = record.serialize();
            total += bytes.len();
            ends.push(total);
            file.write_all(&bytes).unwrap();
        }
        ends
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let mut reader = LogReader::open(&temp_dir.path().join("wal.log")).unwrap();
        assert!(matches!(reader.read_next().unwrap(), ReadOutcome::End));
    }

    #[test]
    fn test_first_sequence_may_be_any_value() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wal.log");
        write_records(
            &path,
            &[LogRecord::put(41, "a", "1"), LogRecord::put(42, "b", "2")],
        );
        let replay = LogReader::open(&path).unwrap().scan();
        assert_eq!(replay.records.len(), 2);
        assert_eq!(replay.records.last().map(|r| r.sequence), Some(42));
        assert!(!replay.has_torn_tail());
    }

    #[test]
    fn test_sequence_gap_is_allowed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wal.log");
        write_records(&path, &[LogRecord::put(1, "a", "1"), LogRecord::put(3, "b", "2")]);
        let replay = LogReader::open(&path).unwrap().scan();
        assert_eq!(replay.records.len(), 2);
        assert!(replay.corruption.is_none());
    }

    #[test]
    fn test_repeated_sequence_is_corruption() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wal.log");
        write_records(
            &path,
            &[
                LogRecord::put(5, "a", "1"),
                LogRecord::put(5, "b", "2"),
                LogRecord::put(6, "c", "3"),
            ],
        );
        let replay = LogReader::open(&path).unwrap().scan();
        assert_eq!(replay.records.len(), 1);
        let err = replay.corruption.unwrap();
        assert_eq!(err.details(), Some("sequence_number: 5"));
    }

    #[test]
    fn test_torn_tail_is_reported_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wal.log");
        let ends = write_records(&path, &[LogRecord::put(1, "a", "1"), LogRecord::put(2, "b", "2")]);
        let file = OpenOptions::new().write(true).open(&path).unwrap();
        file.set_len((ends[1] - 5) as u64).unwrap();

        let replay = LogReader::open(&path).unwrap().scan();
        assert_eq!(replay.records.len(), 1);
        assert!(replay.has_torn_tail());
        assert_eq!(replay.valid_len, ends[0] as u64);
    }

    #[test]
    fn test_mid_file_bit_flip_is_corruption() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wal.log");
        write_records(
            &path,
            &[
                LogRecord::put(1, "a", "1"),
                LogRecord::put(2, "b", "2"),
                LogRecord::put(3, "c", "3"),
            ],
        );
        let mut data = fs::read(&path).unwrap();
        data[15] ^= 0xFF;
        fs::write(&path, &data).unwrap();

        let replay = LogReader::open(&path).unwrap().scan();
        assert!(replay.records.is_empty());
        let err = replay.corruption.unwrap();
        assert!(err.is_fatal());
        assert_eq!(err.details(), Some("byte_offset: 0"));
    }

    #[test]
    fn test_damaged_final_record_is_torn_tail() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wal.log");
        write_records(&path, &[LogRecord::put(1, "a", "1"), LogRecord::put(2, "b", "2")]);
        let mut data = fs::read(&path).unwrap();
        let last = data.len() - 1;
        data[last] ^= 0xFF;
        fs::write(&path, &data).unwrap();

        let replay = LogReader::open(&path).unwrap().scan();
        assert_eq!(replay.records.len(), 1);
        assert!(replay.has_torn_tail());
    }

    #[test]
    fn test_torn_tail_offset_is_readable_prefix() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wal.log");
        let ends = write_records(&path, &[LogRecord::put(1, "a", "1")]);
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(&[0x40, 0x00, 0x00, 0x00, 0x00, 0x03]).unwrap();

        let mut reader = LogReader::open(&path).unwrap();
        assert!(matches!(reader.read_next().unwrap(), ReadOutcome::Record(_)));
        match reader.read_next().unwrap() {
            ReadOutcome::TornTail { offset, dropped } => {
                assert_eq!(offset, ends[0] as u64);
                assert_eq!(dropped, 6);
            }
            other => panic!("expected torn tail, got {:?}", other),
        }
        assert_eq!(reader.current_offset(), ends[0] as u64);

        let replay = LogReader::open(&path).unwrap().scan();
        assert!(replay.has_torn_tail());
        assert!(replay.has_unreadable_tail());
        assert_eq!(replay.valid_len, ends[0] as u64);
        assert_eq!(replay.total_len, ends[0] as u64 + 6);
    }

    #[test]
    fn test_oversized_length_before_valid_records_is_corruption() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wal.log");
        write_records(
            &path,
            &[
                LogRecord::put(1, "a", "1"),
                LogRecord::put(2, "b", "2"),
                LogRecord::put(3, "c", "3"),
            ],
        );
        let mut data = fs::read(&path).unwrap();
        data[2] = 0x7f;
        fs::write(&path, &data).unwrap();

        let replay = LogReader::open(&path).unwrap().scan();
        assert!(replay.records.is_empty());
        assert!(!replay.has_torn_tail());
        assert!(replay.has_unreadable_tail());
        assert_eq!(replay.valid_len, 0);
        let err = replay.corruption.unwrap();
        assert_eq!(err.details(), Some("byte_offset: 0"));
    }

    #[test]
    fn test_oversized_length_on_last_record_is_torn_tail() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wal.log");
        let ends = write_records(&path, &[LogRecord::put(1, "a", "1"), LogRecord::put(2, "b", "2")]);
        let mut data = fs::read(&path).unwrap();
        data[ends[0] + 2] = 0x7f;
        fs::write(&path, &data).unwrap();

        let replay = LogReader::open(&path).unwrap().scan();
        assert_eq!(replay.records.len(), 1);
        assert!(replay.has_torn_tail());
        assert_eq!(replay.valid_len, ends[0] as u64);
    }
}
