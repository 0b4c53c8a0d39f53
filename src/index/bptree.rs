use std::path::Path;

use bytes::Bytes;
use jammdb::{Data, DB};

use super::{IndexIterator, Indexer};
use crate::{
  data::log_record::{decode_log_record_pos, LogRecordPos},
  errors::{Errors, Result},
  option::IteratorOptions,
};

const BPTREE_INDEX_FILE_NAME: &str = "bptree-index";
const INDEX_BUCKET_NAME: &[u8] = b"ember-kv-index";

/// Durable, disk-backed index built on `jammdb`'s single-file B+tree.
/// Every write is its own transaction, committed before the call returns,
/// so the index survives a crash without needing its own recovery pass.
pub struct BPlusTree {
  tree: DB,
}

impl BPlusTree {
  pub fn new<P: AsRef<Path>>(dir_path: P) -> Result<Self> {
    let tree = DB::open(dir_path.as_ref().join(BPTREE_INDEX_FILE_NAME))
      .map_err(|_| Errors::FailedToOpenDataFile)?;

    let mut tx = tree.tx(true).map_err(|_| Errors::FailedToOpenDataFile)?;
    tx.get_or_create_bucket(INDEX_BUCKET_NAME)
      .map_err(|_| Errors::FailedToOpenDataFile)?;
    tx.commit().map_err(|_| Errors::FailedToOpenDataFile)?;

    Ok(Self { tree })
  }
}

impl Indexer for BPlusTree {
  fn put(&self, key: Vec<u8>, pos: LogRecordPos) -> Option<LogRecordPos> {
    let mut tx = self.tree.tx(true).ok()?;
    let bucket = tx.get_or_create_bucket(INDEX_BUCKET_NAME).ok()?;
    let old = bucket
      .get(key.as_slice())
      .and_then(|data| decode_log_record_pos(data.kv().value().to_vec()).ok());
    bucket.put(key, pos.encode()).ok()?;
    tx.commit().ok()?;
    old
  }

  fn get(&self, key: Vec<u8>) -> Option<LogRecordPos> {
    let tx = self.tree.tx(false).ok()?;
    let bucket = tx.get_bucket(INDEX_BUCKET_NAME).ok()?;
    bucket
      .get(key.as_slice())
      .and_then(|data| decode_log_record_pos(data.kv().value().to_vec()).ok())
  }

  fn delete(&self, key: Vec<u8>) -> Option<LogRecordPos> {
    let mut tx = self.tree.tx(true).ok()?;
    let bucket = tx.get_or_create_bucket(INDEX_BUCKET_NAME).ok()?;
    let old = bucket
      .get(key.as_slice())
      .and_then(|data| decode_log_record_pos(data.kv().value().to_vec()).ok());
    if old.is_some() {
      bucket.delete(key.as_slice()).ok()?;
      tx.commit().ok()?;
    }
    old
  }

  fn list_keys(&self) -> Result<Vec<Bytes>> {
    let tx = self
      .tree
      .tx(false)
      .map_err(|_| Errors::FailedToOpenDataFile)?;
    let bucket = tx
      .get_bucket(INDEX_BUCKET_NAME)
      .map_err(|_| Errors::FailedToOpenDataFile)?;
    Ok(
      bucket
        .cursor()
        .filter_map(|data| match data {
          Data::KeyValue(kv) => Some(Bytes::copy_from_slice(kv.key())),
          Data::Bucket(_) => None,
        })
        .collect(),
    )
  }

  fn iterator(&self, options: IteratorOptions) -> Box<dyn IndexIterator> {
    let mut items: Vec<(Vec<u8>, LogRecordPos)> = Vec::new();
    if let Ok(tx) = self.tree.tx(false) {
      if let Ok(bucket) = tx.get_bucket(INDEX_BUCKET_NAME) {
        for data in bucket.cursor() {
          if let Data::KeyValue(kv) = data {
            if let Ok(pos) = decode_log_record_pos(kv.value().to_vec()) {
              items.push((kv.key().to_vec(), pos));
            }
          }
        }
      }
    }
    items.sort_by(|a, b| a.0.cmp(&b.0));
    if options.reverse {
      items.reverse();
    }
    Box::new(BPlusTreeIterator {
      items,
      curr_index: 0,
      options,
    })
  }
}

pub struct BPlusTreeIterator {
  items: Vec<(Vec<u8>, LogRecordPos)>,
  curr_index: usize,
  options: IteratorOptions,
}

impl IndexIterator for BPlusTreeIterator {
  fn rewind(&mut self) {
    self.curr_index = 0;
  }

  fn seek(&mut self, key: Vec<u8>) {
    self.curr_index = match self.options.reverse {
      true => self
        .items
        .partition_point(|(k, _)| k.as_slice() > key.as_slice()),
      false => self
        .items
        .partition_point(|(k, _)| k.as_slice() < key.as_slice()),
    };
  }

  fn next(&mut self) -> Option<(&Vec<u8>, &LogRecordPos)> {
    if self.curr_index >= self.items.len() {
      return None;
    }
    let (key, pos) = &self.items[self.curr_index];
    self.curr_index += 1;
    Some((key, pos))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::index::conformance::{assert_iterator_order_and_seek, assert_put_get_delete};
  use tempfile::tempdir;

  #[test]
  fn test_bptree_put_get_delete() {
    let dir = tempdir().unwrap();
    assert_put_get_delete(&BPlusTree::new(dir.path()).unwrap());
  }

  #[test]
  fn test_bptree_iterator_order_and_seek() {
    let dir = tempdir().unwrap();
    assert_iterator_order_and_seek(&BPlusTree::new(dir.path()).unwrap());
  }

  #[test]
  fn test_bptree_reopen_is_durable() {
    let dir = tempdir().unwrap();
    {
      let bpt = BPlusTree::new(dir.path()).unwrap();
      bpt.put(
        b"persisted".to_vec(),
        LogRecordPos {
          file_id: 7,
          offset: 1,
          size: 1,
        },
      );
    }
    let bpt2 = BPlusTree::new(dir.path()).unwrap();
    assert_eq!(bpt2.get(b"persisted".to_vec()).unwrap().file_id, 7);
  }
}
