use std::fs;

use bytes::Bytes;
use tempfile::tempdir;

use crate::{
  db::Engine,
  errors::Errors,
  option::{Options, WriteBatchOptions},
  util::rand_kv::{get_test_key, get_test_value},
};

fn open_engine(dir: &std::path::Path) -> Engine {
  let mut opts = Options::default();
  opts.dir_path = dir.to_path_buf();
  Engine::open(opts).expect("failed to open engine")
}

#[test]
fn test_engine_put_get_delete_roundtrip() {
  let dir = tempdir().expect("failed to create temp dir");
  let engine = open_engine(dir.path());

  engine.put(Bytes::from("k1"), Bytes::from("v1")).unwrap();
  assert_eq!(engine.get(Bytes::from("k1")).unwrap(), Bytes::from("v1"));

  engine.put(Bytes::from("k1"), Bytes::from("v2")).unwrap();
  assert_eq!(engine.get(Bytes::from("k1")).unwrap(), Bytes::from("v2"));

  engine.delete(Bytes::from("k1")).unwrap();
  assert_eq!(Errors::KeyNotFound, engine.get(Bytes::from("k1")).err().unwrap());

  assert_eq!(
    Errors::KeyIsEmpty,
    engine.put(Bytes::new(), Bytes::from("x")).err().unwrap()
  );
  assert_eq!(Errors::KeyIsEmpty, engine.get(Bytes::new()).err().unwrap());
}

#[test]
fn test_engine_reopen_recovers_all_keys() {
  let dir = tempdir().expect("failed to create temp dir");
  let mut opts = Options::default();
  opts.dir_path = dir.path().to_path_buf();
  let engine = Engine::open(opts.clone()).unwrap();

  for i in 0..100 {
    engine.put(get_test_key(i), get_test_value(i)).unwrap();
  }
  engine.close().unwrap();

  let engine2 = Engine::open(opts).unwrap();
  for i in 0..100 {
    assert!(engine2.get(get_test_key(i)).is_ok());
  }
  assert_eq!(engine2.list_keys().unwrap().len(), 100);
}

#[test]
fn test_engine_reopen_after_uncommitted_batch_drops_pending_writes() {
  let dir = tempdir().expect("failed to create temp dir");
  let mut opts = Options::default();
  opts.dir_path = dir.path().to_path_buf();
  let engine = Engine::open(opts.clone()).unwrap();

  let wb = engine
    .new_write_batch(WriteBatchOptions::default())
    .unwrap();
  wb.put(Bytes::from("a"), Bytes::from("1")).unwrap();
  wb.put(Bytes::from("b"), Bytes::from("2")).unwrap();
  // deliberately never committed

  engine.close().unwrap();
  let engine2 = Engine::open(opts).unwrap();
  assert!(engine2.get(Bytes::from("a")).is_err());
  assert_eq!(engine2.list_keys().unwrap().len(), 0);
}

#[test]
fn test_engine_reopen_after_merge_uses_hint_file() {
  let dir = tempdir().expect("failed to create temp dir");
  let mut opts = Options::default();
  opts.dir_path = dir.path().to_path_buf();
  opts.data_file_size = 1024 * 1024;
  opts.file_merge_threshold = 0_f32;
  let engine = Engine::open(opts.clone()).unwrap();

  for i in 0..2000 {
    engine.put(get_test_key(i), get_test_value(i)).unwrap();
  }
  engine.merge().unwrap();
  std::mem::drop(engine);

  let engine2 = Engine::open(opts).unwrap();
  assert!(dir.path().join("hint-index").is_file());
  assert_eq!(engine2.list_keys().unwrap().len(), 2000);
}

#[test]
fn test_engine_open_discards_incomplete_merge_directory() {
  let dir = tempdir().expect("failed to create temp dir");
  let mut opts = Options::default();
  opts.dir_path = dir.path().to_path_buf();
  let engine = Engine::open(opts.clone()).unwrap();
  engine.put(Bytes::from("k"), Bytes::from("v")).unwrap();
  std::mem::drop(engine);

  // simulate a crash mid-merge: a scratch merge directory with no
  // merge-finished marker must be treated as stale and discarded.
  let merge_dir = dir
    .path()
    .parent()
    .unwrap()
    .join(format!("{}-merge", dir.path().file_name().unwrap().to_str().unwrap()));
  fs::create_dir_all(&merge_dir).unwrap();
  fs::write(merge_dir.join("000000000.data"), b"partial").unwrap();
  assert!(merge_dir.is_dir());

  let engine2 = Engine::open(opts).unwrap();
  assert!(!merge_dir.is_dir());
  assert_eq!(engine2.get(Bytes::from("k")).unwrap(), Bytes::from("v"));
}

#[test]
fn test_engine_second_open_on_live_directory_fails() {
  let dir = tempdir().expect("failed to create temp dir");
  let mut opts = Options::default();
  opts.dir_path = dir.path().to_path_buf();
  let _engine = Engine::open(opts.clone()).unwrap();

  let res = Engine::open(opts);
  assert_eq!(Errors::DatabaseIsUsing, res.err().unwrap());
}

#[test]
fn test_engine_detects_corrupted_value_on_get() {
  let dir = tempdir().expect("failed to create temp dir");
  let mut opts = Options::default();
  opts.dir_path = dir.path().to_path_buf();
  opts.mmap_at_startup = false;
  let engine = Engine::open(opts).unwrap();

  engine.put(Bytes::from("intact"), Bytes::from("fine")).unwrap();
  engine
    .put(Bytes::from("broken"), Bytes::from("will-be-corrupted"))
    .unwrap();
  engine.sync().unwrap();

  let data_file_path = dir.path().join("000000000.data");
  let mut bytes = fs::read(&data_file_path).unwrap();
  let last = bytes.len() - 1;
  bytes[last] ^= 0xFF;
  fs::write(&data_file_path, bytes).unwrap();

  let res = engine.get(Bytes::from("broken"));
  assert_eq!(Errors::CorruptedRecord, res.err().unwrap());

  assert_eq!(Bytes::from("fine"), engine.get(Bytes::from("intact")).unwrap());
}

#[test]
fn test_engine_backup_excludes_lock_file() {
  let dir = tempdir().expect("failed to create temp dir");
  let engine = open_engine(dir.path());
  engine.put(Bytes::from("k"), Bytes::from("v")).unwrap();

  let backup_dir = tempdir().expect("failed to create backup dir");
  let backup_path = backup_dir.path().join("snapshot");
  engine.backup(&backup_path).unwrap();

  assert!(!backup_path.join("flock").exists());
  assert!(backup_path.join("000000000.data").is_file());
}

#[test]
fn test_engine_stat_reports_key_count() {
  let dir = tempdir().expect("failed to create temp dir");
  let engine = open_engine(dir.path());
  for i in 0..10 {
    engine.put(get_test_key(i), get_test_value(i)).unwrap();
  }

  let stat = engine.get_engine_stat().unwrap();
  assert_eq!(stat.key_num, 10);
  assert_eq!(stat.data_file_num, 1);
  assert!(stat.disk_size > 0);
}
