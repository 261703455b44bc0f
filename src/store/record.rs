//! User log record format
//!
//! ```text
//! +------------------+
//! | Record Length    | (u32 LE, whole record including this field)
//! +------------------+
//! | Key              | (u32 LE length + UTF-8 bytes)
//! +------------------+
//! | Tombstone Flag   | (u8: 0 = live, 1 = removed)
//! +------------------+
//! | Body             | (u32 LE length + user JSON; empty for tombstones)
//! +------------------+
//! | Checksum         | (u32 LE, CRC32 of every preceding byte)
//! +------------------+
//! ```

use std::io::{self, Cursor, Read};

use super::checksum::{compute_checksum, verify_checksum};
use crate::model::User;

/// Length + key length + tombstone + body length + checksum
pub const MIN_RECORD_SIZE: usize = 4 + 4 + 1 + 4 + 4;

/// One entry in the user log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub key: String,
    pub is_tombstone: bool,
    pub body: Vec<u8>,
}

impl UserRecord {
    /// Live record holding the full user
    pub fn put(user: &User) -> serde_json::Result<Self> {
        Ok(Self {
            key: user.sub.clone(),
            is_tombstone: false,
            body: serde_json::to_vec(user)?,
        })
    }

    /// Removal marker for `key`
    pub fn tombstone(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            is_tombstone: true,
            body: Vec::new(),
        }
    }

    /// Decode the body of a live record
    pub fn to_user(&self) -> serde_json::Result<User> {
        serde_json::from_slice(&self.body)
    }

    fn serialize_body(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(4 + self.key.len() + 1 + 4 + self.body.len());

        buf.extend_from_slice(&(self.key.len() as u32).to_le_bytes());
        buf.extend_from_slice(self.key.as_bytes());

        buf.push(u8::from(self.is_tombstone));

        buf.extend_from_slice(&(self.body.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.body);

        buf
    }

    /// Encode the complete record
    pub fn serialize(&self) -> Vec<u8> {
        let body = self.serialize_body();
        let record_length = (4 + body.len() + 4) as u32;

        let mut record = Vec::with_capacity(record_length as usize);
        record.extend_from_slice(&record_length.to_le_bytes());
        record.extend_from_slice(&body);

        let checksum = compute_checksum(&record);
        record.extend_from_slice(&checksum.to_le_bytes());

        record
    }

    /// Decode one record from the front of `data`, verifying its checksum.
    ///
    /// Returns the record and the number of bytes consumed.
    pub fn deserialize(data: &[u8]) -> io::Result<(Self, usize)> {
        if data.len() < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Record too short: {} bytes, minimum is {}",
                    data.len(),
                    MIN_RECORD_SIZE
                ),
            ));
        }

        let record_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

        if record_length < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid record length: {}", record_length),
            ));
        }

        if data.len() < record_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Record truncated: expected {} bytes, got {}",
                    record_length,
                    data.len()
                ),
            ));
        }

        let checksum_offset = record_length - 4;
        let stored_checksum = u32::from_le_bytes([
            data[checksum_offset],
            data[checksum_offset + 1],
            data[checksum_offset + 2],
            data[checksum_offset + 3],
        ]);
        if !verify_checksum(&data[..checksum_offset], stored_checksum) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Checksum mismatch: computed {:08x}, stored {:08x}",
                    compute_checksum(&data[..checksum_offset]),
                    stored_checksum
                ),
            ));
        }

        let mut cursor = Cursor::new(&data[4..checksum_offset]);

        let key = String::from_utf8(read_prefixed(&mut cursor)?).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8 key: {}", e))
        })?;

        let mut flag = [0u8; 1];
        cursor.read_exact(&mut flag)?;

        let body = read_prefixed(&mut cursor)?;

        Ok((
            Self {
                key,
                is_tombstone: flag[0] != 0,
                body,
            },
            record_length,
        ))
    }
}

/// Read a u32-length-prefixed field. The prefix is checked against the bytes
/// left in the record before anything is allocated.
fn read_prefixed(cursor: &mut Cursor<&[u8]>) -> io::Result<Vec<u8>> {
    let mut len_buf = [0u8; 4];
    cursor.read_exact(&mut len_buf)?;
    let len = u32::from_le_bytes(len_buf) as usize;

    let remaining = cursor.get_ref().len() as u64 - cursor.position();
    if len as u64 > remaining {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Field length {} exceeds {} remaining bytes", len, remaining),
        ));
    }

    let mut buf = vec![0u8; len];
    cursor.read_exact(&mut buf)?;
    Ok(buf)
}
