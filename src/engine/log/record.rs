//! Log record framing
//!
//! Each record is laid out as:
//! - Record Length (u32 LE), total length including this field
//! - Record Kind (u8): PUT / MERGE / DELETE
//! - Sequence Number (u64 LE)
//! - Key Length (u32 LE) + key bytes (UTF-8)
//! - Value Length (u32 LE) + value bytes (UTF-8, empty for DELETE)
//! - Checksum (u32 LE) over every preceding byte of the record

use std::fmt;

use super::checksum::compute_checksum;

/// Length + kind + sequence + key length + value length + checksum
pub const MIN_RECORD_SIZE: usize = 4 + 1 + 8 + 4 + 4 + 4;

/// Largest record the u32 length prefix can describe
pub const MAX_RECORD_SIZE: usize = u32::MAX as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordKind {
    Put = 0,
    /// Value holds the merge operand, not the merged result
    Merge = 1,
    /// Tombstone
    Delete = 2,
}

impl RecordKind {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(RecordKind::Put),
            1 => Some(RecordKind::Merge),
            2 => Some(RecordKind::Delete),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub kind: RecordKind,
    pub sequence: u64,
    pub key: String,
    pub value: String,
}

/// Why a byte range did not decode into a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer ends before the record does
    Incomplete { needed: usize, available: usize },
    /// Framing, checksum or encoding failure
    Invalid(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Incomplete { needed, available } => write!(
                f,
                "Record truncated: expected {} bytes, got {}",
                needed, available
            ),
            DecodeError::Invalid(reason) => write!(f, "{}", reason),
        }
    }
}

impl LogRecord {
    pub fn put(sequence: u64, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: RecordKind::Put,
            sequence,
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn merge(sequence: u64, key: impl Into<String>, operand: impl Into<String>) -> Self {
        Self {
            kind: RecordKind::Merge,
            sequence,
            key: key.into(),
            value: operand.into(),
        }
    }

    pub fn delete(sequence: u64, key: impl Into<String>) -> Self {
        Self {
            kind: RecordKind::Delete,
            sequence,
            key: key.into(),
            value: String::new(),
        }
    }

    /// Whether a record with these field sizes can be framed
    pub fn fits(key_len: usize, value_len: usize) -> bool {
        MIN_RECORD_SIZE
            .checked_add(key_len)
            .and_then(|n| n.checked_add(value_len))
            .map_or(false, |n| n <= MAX_RECORD_SIZE)
    }

    /// Size of the encoded record in bytes
    pub fn encoded_len(&self) -> usize {
        MIN_RECORD_SIZE + self.key.len() + self.value.len()
    }

    /// Callers must check `fits` first; lengths are framed as u32.
    pub fn serialize(&self) -> Vec<u8> {
        let record_length = self.encoded_len() as u32;

        let mut buf = Vec::with_capacity(record_length as usize);
        buf.extend_from_slice(&record_length.to_le_bytes());
        buf.push(self.kind.as_u8());
        buf.extend_from_slice(&self.sequence.to_le_bytes());
        buf.extend_from_slice(&(self.key.len() as u32).to_le_bytes());
        buf.extend_from_slice(self.key.as_bytes());
        buf.extend_from_slice(&(self.value.len() as u32).to_le_bytes());
        buf.extend_from_slice(self.value.as_bytes());

        let checksum = compute_checksum(&buf);
        buf.extend_from_slice(&checksum.to_le_bytes());
        buf
    }

    /// Decode one record from the front of `data`, verifying its checksum.
    ///
    /// Returns the record and the number of bytes consumed.
    pub fn deserialize(data: &[u8]) -> Result<(Self, usize), DecodeError> {
        if data.len() < 4 {
            return Err(DecodeError::Incomplete {
                needed: MIN_RECORD_SIZE,
                available: data.len(),
            });
        }

        let record_length = read_u32(data, 0) as usize;
        if record_length < MIN_RECORD_SIZE {
            return Err(DecodeError::Invalid(format!(
                "Invalid record length: {}",
                record_length
            )));
        }
        if data.len() < record_length {
            return Err(DecodeError::Incomplete {
                needed: record_length,
                available: data.len(),
            });
        }

        let checksum_offset = record_length - 4;
        let stored = read_u32(data, checksum_offset);
        let computed = compute_checksum(&data[..checksum_offset]);
        if computed != stored {
            return Err(DecodeError::Invalid(format!(
                "Checksum mismatch: computed {:08x}, stored {:08x}",
                computed, stored
            )));
        }

        let kind_byte = data[4];
        let kind = RecordKind::from_u8(kind_byte)
            .ok_or_else(|| DecodeError::Invalid(format!("Invalid record kind: {}", kind_byte)))?;
        let sequence = read_u64(data, 5);

        let mut offset = 13;
        let key = read_string(data, &mut offset, checksum_offset)?;
        let value = read_string(data, &mut offset, checksum_offset)?;
        if offset != checksum_offset {
            return Err(DecodeError::Invalid(format!(
                "Record length {} does not match its fields",
                record_length
            )));
        }

        Ok((
            LogRecord {
                kind,
                sequence,
                key,
                value,
            },
            record_length,
        ))
    }
}

fn read_u32(data: &[u8], at: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&data[at..at + 4]);
    u32::from_le_bytes(buf)
}

fn read_u64(data: &[u8], at: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&data[at..at + 8]);
    u64::from_le_bytes(buf)
}

fn read_string(data: &[u8], offset: &mut usize, end: usize) -> Result<String, DecodeError> {
    if *offset + 4 > end {
        return Err(DecodeError::Invalid("Field length overruns record".to_string()));
    }
    let len = read_u32(data, *offset) as usize;
    *offset += 4;
    if *offset + len > end {
        return Err(DecodeError::Invalid("Field overruns record".to_string()));
    }
    let bytes = data[*offset..*offset + len].to_vec();
    *offset += len;
    String::from_utf8(bytes).map_err(|e| DecodeError::Invalid(format!("Invalid UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_kind_conversion() {
        assert_eq!(RecordKind::from_u8(0), Some(RecordKind::Put));
        assert_eq!(RecordKind::from_u8(1), Some(RecordKind::Merge));
        assert_eq!(RecordKind::from_u8(2), Some(RecordKind::Delete));
        assert_eq!(RecordKind::from_u8(3), None);
    }

    #[test]
    fn test_layout_and_decode() {
        let record = LogRecord::put(7, "user:1", "alice");
        let bytes = record.serialize();
        assert_eq!(bytes.len(), record.encoded_len());
        assert_eq!(read_u32(&bytes, 0) as usize, bytes.len());
        assert_eq!(bytes[4], RecordKind::Put.as_u8());
        assert_eq!(read_u64(&bytes, 5), 7);

        let (decoded, consumed) = LogRecord::deserialize(&bytes).unwrap();
        assert_eq!(decoded, record);
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn test_delete_has_empty_value() {
        let bytes = LogRecord::delete(3, "gone").serialize();
        let (decoded, _) = LogRecord::deserialize(&bytes).unwrap();
        assert_eq!(decoded.kind, RecordKind::Delete);
        assert!(decoded.value.is_empty());
    }

    #[test]
    fn test_truncated_record_is_incomplete() {
        let bytes = LogRecord::merge(1, "k", "operand").serialize();
        let err = LogRecord::deserialize(&bytes[..bytes.len() - 3]).unwrap_err();
        assert!(matches!(err, DecodeError::Incomplete { .. }));

        let err = LogRecord::deserialize(&bytes[..2]).unwrap_err();
        assert!(matches!(err, DecodeError::Incomplete { .. }));
    }

    #[test]
    fn test_bit_flip_is_invalid() {
        let mut bytes = LogRecord::put(1, "k", "v").serialize();
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0x40;
        let err = LogRecord::deserialize(&bytes).unwrap_err();
        assert!(matches!(err, DecodeError::Invalid(_)));
    }

    #[test]
    fn test_trailing_bytes_are_not_consumed() {
        let mut bytes = LogRecord::put(1, "a", "1").serialize();
        let first_len = bytes.len();
        bytes.extend_from_slice(&LogRecord::put(2, "b", "2").serialize());
        let (_, consumed) = LogRecord::deserialize(&bytes).unwrap();
        assert_eq!(consumed, first_len);
    }

    #[test]
    fn test_fits_rejects_lengths_past_u32() {
        assert!(LogRecord::fits(3, 5));
        assert!(LogRecord::fits(0, MAX_RECORD_SIZE - MIN_RECORD_SIZE));
        assert!(!LogRecord::fits(0, MAX_RECORD_SIZE - MIN_RECORD_SIZE + 1));
        assert!(!LogRecord::fits(MAX_RECORD_SIZE, 0));
        assert!(!LogRecord::fits(usize::MAX, usize::MAX));
    }
}
