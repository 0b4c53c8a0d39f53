use std::{
  fs,
  path::{Path, PathBuf},
};

use crate::errors::{Errors, Result};

/// Total size, in bytes, of every regular file under `dir_path`.
///
/// Used to compute the reclaimable-space ratio that gates a merge.
pub fn dir_disk_size<P: AsRef<Path>>(dir_path: P) -> u64 {
  fs_extra::dir::get_size(dir_path).unwrap_or(0)
}

/// Free space, in bytes, on the filesystem backing the current working
/// directory. A merge bails out rather than start if this is too small.
pub fn available_disk_space() -> u64 {
  let wd = match std::env::current_dir() {
    Ok(wd) => wd,
    Err(_) => return 0,
  };
  fs2::available_space(&wd).unwrap_or(0)
}

/// Recursively copies `src` into `des`, skipping any entry whose file
/// name appears in `exclude`. Used to snapshot the database directory
/// for [`crate::db::Engine::backup`] without carrying over the process
/// file lock.
pub fn copy_dir<P: AsRef<Path>>(src: P, des: P, exclude: &[&str]) -> Result<()> {
  let src = src.as_ref();
  let des = des.as_ref();

  if !des.is_dir() {
    fs::create_dir_all(des)?;
  }

  copy_dir_inner(src, des, exclude)
}

fn copy_dir_inner(src: &Path, des: &Path, exclude: &[&str]) -> Result<()> {
  let entries = fs::read_dir(src).map_err(|_| Errors::FailedToReadDatabaseDir)?;
  for entry in entries {
    let entry = entry?;
    let file_name = entry.file_name();
    let name = file_name.to_string_lossy();

    if exclude.iter().any(|e| *e == name) {
      continue;
    }

    let src_path: PathBuf = entry.path();
    let des_path = des.join(&file_name);

    let file_type = entry.file_type()?;
    if file_type.is_dir() {
      fs::create_dir_all(&des_path)?;
      copy_dir_inner(&src_path, &des_path, exclude)?;
    } else {
      fs::copy(&src_path, &des_path)?;
    }
  }
  Ok(())
}
