use std::collections::BTreeMap;

use bytes::Bytes;
use parking_lot::RwLock;

use super::{IndexIterator, Indexer};
use crate::{data::log_record::LogRecordPos, errors::Result, option::IteratorOptions};

/// Ordered in-memory index backed by a `BTreeMap`, guarded by a single
/// reader/writer lock (mirrors the teacher's `google/btree`-backed Go
/// counterpart, swapped for the std balanced tree already keyed by
/// lexicographic `Vec<u8>` ordering).
pub struct BTree {
  tree: RwLock<BTreeMap<Vec<u8>, LogRecordPos>>,
}

impl BTree {
  pub fn new() -> Self {
    Self {
      tree: RwLock::new(BTreeMap::new()),
    }
  }
}

impl Default for BTree {
  fn default() -> Self {
    Self::new()
  }
}

impl Indexer for BTree {
  fn put(&self, key: Vec<u8>, pos: LogRecordPos) -> Option<LogRecordPos> {
    let mut write_guard = self.tree.write();
    write_guard.insert(key, pos)
  }

  fn get(&self, key: Vec<u8>) -> Option<LogRecordPos> {
    let read_guard = self.tree.read();
    read_guard.get(&key).copied()
  }

  fn delete(&self, key: Vec<u8>) -> Option<LogRecordPos> {
    let mut write_guard = self.tree.write();
    write_guard.remove(&key)
  }

  fn list_keys(&self) -> Result<Vec<Bytes>> {
    let read_guard = self.tree.read();
    Ok(
      read_guard
        .keys()
        .map(|k| Bytes::copy_from_slice(k))
        .collect(),
    )
  }

  fn iterator(&self, options: IteratorOptions) -> Box<dyn IndexIterator> {
    let read_guard = self.tree.read();
    let mut items: Vec<(Vec<u8>, LogRecordPos)> = read_guard
      .iter()
      .map(|(k, v)| (k.clone(), *v))
      .collect();
    if options.reverse {
      items.reverse();
    }
    Box::new(BTreeIterator {
      items,
      curr_index: 0,
      options,
    })
  }
}

pub struct BTreeIterator {
  items: Vec<(Vec<u8>, LogRecordPos)>,
  curr_index: usize,
  options: IteratorOptions,
}

impl IndexIterator for BTreeIterator {
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
