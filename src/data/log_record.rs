use bytes::{Buf, BufMut, BytesMut};
use prost::{
  decode_length_delimiter, encode_length_delimiter,
  encoding::{decode_varint, encode_varint},
  length_delimiter_len,
};

use crate::errors::{Errors, Result};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LogRecordType {
  Normal = 1,

  Deleted = 2,

  TxnFinished = 3,
}

#[derive(Debug, Clone)]
pub struct LogRecord {
  pub(crate) key: Vec<u8>,
  pub(crate) value: Vec<u8>,
  pub(crate) rec_type: LogRecordType,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct LogRecordPos {
  pub(crate) file_id: u32,
  pub(crate) offset: u64,
  pub(crate) size: u32,
}

#[derive(Debug)]
pub struct ReadLogRecord {
  pub(crate) record: LogRecord,
  pub(crate) size: usize,
}

pub struct TransactionRecord {
  pub(crate) record: LogRecord,
  pub(crate) pos: LogRecordPos,
}

/// Decoded fixed-width header fields, read ahead of the variable-length
/// key/value payload.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct LogRecordHeader {
  pub(crate) crc: u32,
  pub(crate) rec_type: u8,
  pub(crate) key_size: usize,
  pub(crate) value_size: usize,
}

impl LogRecord {
  // Encode a log record, returning the bytes on disk.
  //
  // +---------+----------+----------------+------------------+---------+-----------+
  // |   Crc   |   Type   |   Key Length   |   Value Length   |   Key   |   Value   |
  // +---------+----------+----------------+------------------+---------+-----------+
  //  4 bytes    1 byte       n(n<=5) bytes     m(m<=5) bytes       x          y
  //
  // The CRC covers every byte that follows it.
  pub fn encode(&self) -> Vec<u8> {
    let mut buf = BytesMut::new();
    buf.reserve(self.encoded_length());

    buf.put_u8(self.rec_type as u8);
    encode_length_delimiter(self.key.len(), &mut buf).unwrap();
    encode_length_delimiter(self.value.len(), &mut buf).unwrap();
    buf.extend_from_slice(&self.key);
    buf.extend_from_slice(&self.value);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&buf);
    let crc = hasher.finalize();

    let mut out = BytesMut::with_capacity(4 + buf.len());
    out.put_u32(crc);
    out.extend_from_slice(&buf);
    out.to_vec()
  }

  pub fn get_crc(&self) -> u32 {
    let mut buf = BytesMut::new();
    buf.put_u8(self.rec_type as u8);
    encode_length_delimiter(self.key.len(), &mut buf).unwrap();
    encode_length_delimiter(self.value.len(), &mut buf).unwrap();
    buf.extend_from_slice(&self.key);
    buf.extend_from_slice(&self.value);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&buf);
    hasher.finalize()
  }

  fn encoded_length(&self) -> usize {
    std::mem::size_of::<u8>()
      + length_delimiter_len(self.key.len())
      + length_delimiter_len(self.value.len())
      + self.key.len()
      + self.value.len()
      + 4
  }
}

impl LogRecordPos {
  pub fn encode(&self) -> Vec<u8> {
    let mut buf = BytesMut::new();
    encode_varint(self.file_id as u64, &mut buf);
    encode_varint(self.offset, &mut buf);
    encode_varint(self.size as u64, &mut buf);
    buf.to_vec()
  }
}

impl LogRecordType {
  pub fn from_u8(value: u8) -> Self {
    match value {
      1 => LogRecordType::Normal,
      2 => LogRecordType::Deleted,
      3 => LogRecordType::TxnFinished,
      _ => LogRecordType::Normal,
    }
  }
}

/// Upper bound on the fixed-width prefix of an encoded record: crc(4) +
/// type(1) + two max-length varints.
pub fn max_log_record_header_size() -> usize {
  4 + std::mem::size_of::<u8>() + length_delimiter_len(u32::MAX as usize) * 2
}

/// Decodes the fixed-width header from the front of `buf`. Returns a
/// null (all-zero) header when `buf` is too short to hold even the
/// smallest possible header, or when the varint fields fail to decode —
/// the caller treats that identically to a clean end-of-file.
pub(crate) fn decode_header(buf: &[u8]) -> LogRecordHeader {
  if buf.len() < 4 + 1 {
    return LogRecordHeader::default();
  }

  let mut cursor = BytesMut::from(buf);
  let crc = cursor.get_u32();
  let rec_type = cursor.get_u8();

  let key_size = match decode_length_delimiter(&mut cursor) {
    Ok(v) => v,
    Err(_) => return LogRecordHeader::default(),
  };
  let value_size = match decode_length_delimiter(&mut cursor) {
    Ok(v) => v,
    Err(_) => return LogRecordHeader::default(),
  };

  LogRecordHeader {
    crc,
    rec_type,
    key_size,
    value_size,
  }
}

pub fn decode_log_record_pos(pos: Vec<u8>) -> Result<LogRecordPos> {
  let mut buf = BytesMut::new();
  buf.put_slice(&pos);

  let fid = decode_varint(&mut buf).map_err(|_| Errors::CorruptedRecord)?;
  let offset = decode_varint(&mut buf).map_err(|_| Errors::CorruptedRecord)?;
  let size = decode_varint(&mut buf).map_err(|_| Errors::CorruptedRecord)?;
  Ok(LogRecordPos {
    file_id: fid as u32,
    offset,
    size: size as u32,
  })
}
