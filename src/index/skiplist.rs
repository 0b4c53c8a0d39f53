use bytes::Bytes;
use crossbeam_skiplist::SkipMap;

use super::{IndexIterator, Indexer};
use crate::{data::log_record::LogRecordPos, errors::Result, option::IteratorOptions};

/// Lock-free ordered index backed by `crossbeam-skiplist`. Stands in for
/// the adaptive radix tree of the upstream design: no maintained Rust
/// ART crate sits in this project's dependency stack, and a
/// concurrent skip list gives the same ordered, lock-free put/get/delete
/// contract.
pub struct SkipList {
  skl: SkipMap<Vec<u8>, LogRecordPos>,
}

impl SkipList {
  pub fn new() -> Self {
    Self {
      skl: SkipMap::new(),
    }
  }
}

impl Default for SkipList {
  fn default() -> Self {
    Self::new()
  }
}

impl Indexer for SkipList {
  fn put(&self, key: Vec<u8>, pos: LogRecordPos) -> Option<LogRecordPos> {
    let old = self.skl.get(&key).map(|e| *e.value());
    self.skl.insert(key, pos);
    old
  }

  fn get(&self, key: Vec<u8>) -> Option<LogRecordPos> {
    self.skl.get(&key).map(|e| *e.value())
  }

  fn delete(&self, key: Vec<u8>) -> Option<LogRecordPos> {
    self.skl.remove(&key).map(|e| *e.value())
  }

  fn list_keys(&self) -> Result<Vec<Bytes>> {
    Ok(
      self
        .skl
        .iter()
        .map(|e| Bytes::copy_from_slice(e.key()))
        .collect(),
    )
  }

  fn iterator(&self, options: IteratorOptions) -> Box<dyn IndexIterator> {
    let mut items: Vec<(Vec<u8>, LogRecordPos)> = self
      .skl
      .iter()
      .map(|e| (e.key().clone(), *e.value()))
      .collect();
    if options.reverse {
      items.reverse();
    }
    Box::new(SkipListIterator {
      items,
      curr_index: 0,
      options,
    })
  }
}

pub struct SkipListIterator {
  items: Vec<(Vec<u8>, LogRecordPos)>,
  curr_index: usize,
  options: IteratorOptions,
}

impl IndexIterator for SkipListIterator {
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
