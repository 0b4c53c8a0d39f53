use bytes::Bytes;
use parking_lot::RwLock;

use crate::{
  data::log_record::LogRecordPos, db::Engine, errors::Result, index::IndexIterator,
  option::IteratorOptions,
};

/// User-facing cursor over the keyspace, optionally scoped to a prefix.
///
/// Wraps an [`IndexIterator`] from the underlying index and resolves each
/// position to its value lazily, through [`Engine::get_value_by_position`],
/// so iteration never holds more than one record's bytes in memory. The
/// index cursor is consume-on-read, so a matched-but-not-yet-returned item
/// is held in `peeked` until the caller asks for it via [`Iterator::next`].
pub struct Iterator<'a> {
  index_iter: RwLock<Box<dyn IndexIterator>>,
  peeked: RwLock<Option<Option<(Vec<u8>, LogRecordPos)>>>,
  engine: &'a Engine,
  options: IteratorOptions,
}

impl Engine {
  /// Creates an iterator over the engine's keyspace, already rewound to
  /// its first (prefix-matching) entry.
  pub fn new_iterator(&self, options: IteratorOptions) -> Iterator {
    let index_iter = self.index.iterator(IteratorOptions {
      prefix: options.prefix.clone(),
      reverse: options.reverse,
    });
    let it = Iterator {
      index_iter: RwLock::new(index_iter),
      peeked: RwLock::new(None),
      engine: self,
      options,
    };
    it.rewind();
    it
  }
}

impl<'a> Iterator<'a> {
  /// Resets the iterator to its first key, honoring the prefix filter.
  pub fn rewind(&self) {
    let mut index_iter = self.index_iter.write();
    index_iter.rewind();
    let matched = self.find_next_match(&mut index_iter);
    *self.peeked.write() = Some(matched);
  }

  /// Positions the iterator at the first key greater than or equal to `key`.
  pub fn seek(&self, key: Vec<u8>) {
    let mut index_iter = self.index_iter.write();
    index_iter.seek(key);
    let matched = self.find_next_match(&mut index_iter);
    *self.peeked.write() = Some(matched);
  }

  /// Returns the current entry and advances, or `None` once exhausted.
  pub fn next(&self) -> Option<(Bytes, Result<Bytes>)> {
    let mut peeked = self.peeked.write();
    let item = match peeked.take() {
      Some(item) => item,
      None => {
        let mut index_iter = self.index_iter.write();
        self.find_next_match(&mut index_iter)
      }
    };
    drop(peeked);
    let (key, pos) = item?;
    let value = self.engine.get_value_by_position(&pos);
    Some((Bytes::from(key), value))
  }

  fn find_next_match(
    &self,
    index_iter: &mut Box<dyn IndexIterator>,
  ) -> Option<(Vec<u8>, LogRecordPos)> {
    let prefix = &self.options.prefix;
    loop {
      let item = index_iter.next().map(|(k, v)| (k.clone(), *v))?;
      let (key, pos) = item;
      if prefix.is_empty() || (key.len() >= prefix.len() && &key[..prefix.len()] == prefix.as_slice())
      {
        return Some((key, pos));
      }
    }
  }
}
