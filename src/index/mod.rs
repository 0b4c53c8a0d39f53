pub mod bptree;
pub mod btree;
pub mod skiplist;

use std::path::PathBuf;

use bytes::Bytes;

use crate::{
  data::log_record::LogRecordPos,
  errors::Result,
  option::{IndexType, IteratorOptions},
};

pub trait Indexer: Sync + Send {
  fn put(&self, key: Vec<u8>, pos: LogRecordPos) -> Option<LogRecordPos>;

  /// Retrieves a key's position from the index.
  fn get(&self, key: Vec<u8>) -> Option<LogRecordPos>;

  /// Deletes a key's position from the index.
  fn delete(&self, key: Vec<u8>) -> Option<LogRecordPos>;

  fn list_keys(&self) -> Result<Vec<Bytes>>;

  /// Creates an iterator for the index with the specified options.
  /// * `options` - Configuration options for the iterator
  fn iterator(&self, options: IteratorOptions) -> Box<dyn IndexIterator>;
}

/// Creates a new indexer based on the specified index type and directory path.
pub fn new_indexer(index_type: &IndexType, dir_path: &PathBuf) -> Result<Box<dyn Indexer>> {
  Ok(match *index_type {
    IndexType::BTree => Box::new(btree::BTree::new()),
    IndexType::SkipList => Box::new(skiplist::SkipList::new()),
    IndexType::BPlusTree => Box::new(bptree::BPlusTree::new(dir_path)?),
  })
}

/// Provides methods for iterating over key-value pairs in the index.
pub trait IndexIterator: Sync + Send {
  fn rewind(&mut self);

  fn seek(&mut self, key: Vec<u8>);

  fn next(&mut self) -> Option<(&Vec<u8>, &LogRecordPos)>;
}

/// Shared assertions run against every `Indexer` implementation, so the
/// put/get/delete and iterator contract is checked once instead of once
/// per backing data structure.
#[cfg(test)]
pub(crate) mod conformance {
  use super::*;

  pub(crate) fn pos(file_id: u32, offset: u64, size: u32) -> LogRecordPos {
    LogRecordPos {
      file_id,
      offset,
      size,
    }
  }

  pub(crate) fn assert_put_get_delete(indexer: &dyn Indexer) {
    assert!(indexer.put(b"key".to_vec(), pos(1, 10, 5)).is_none());

    let old = indexer.put(b"key".to_vec(), pos(2, 20, 5));
    assert_eq!(old.unwrap().file_id, 1);
    assert_eq!(indexer.get(b"key".to_vec()).unwrap().file_id, 2);
    assert!(indexer.get(b"missing".to_vec()).is_none());

    let deleted = indexer.delete(b"key".to_vec());
    assert!(deleted.is_some());
    assert!(indexer.get(b"key".to_vec()).is_none());
    assert!(indexer.delete(b"key".to_vec()).is_none());
  }

  pub(crate) fn assert_iterator_order_and_seek(indexer: &dyn Indexer) {
    for k in ["b", "a", "c"] {
      indexer.put(k.as_bytes().to_vec(), pos(0, 0, 0));
    }

    let mut it = indexer.iterator(IteratorOptions::default());
    let mut seen = Vec::new();
    it.rewind();
    while let Some((k, _)) = it.next() {
      seen.push(String::from_utf8(k.clone()).unwrap());
    }
    assert_eq!(seen, vec!["a", "b", "c"]);

    let mut rev = indexer.iterator(IteratorOptions {
      prefix: vec![],
      reverse: true,
    });
    let mut seen_rev = Vec::new();
    rev.rewind();
    while let Some((k, _)) = rev.next() {
      seen_rev.push(String::from_utf8(k.clone()).unwrap());
    }
    assert_eq!(seen_rev, vec!["c", "b", "a"]);

    let mut seeker = indexer.iterator(IteratorOptions::default());
    seeker.seek(b"b".to_vec());
    let (k, _) = seeker.next().unwrap();
    assert_eq!(k, b"b");
  }
}
