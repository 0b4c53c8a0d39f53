use std::{
  fs::{File, OpenOptions},
  io::{Read, Seek, SeekFrom, Write},
  path::Path,
  sync::Arc,
};

use log::error;
use parking_lot::RwLock;

use crate::errors::{Errors, Result};

use super::IOManager;

/// Standard read/write/append file handle backed by `std::fs::File`.
pub struct FileIO {
  fd: Arc<RwLock<File>>,
}

impl FileIO {
  pub fn new<P>(file_name: P) -> Result<Self>
  where
    P: AsRef<Path>,
  {
    match OpenOptions::new()
      .create(true)
      .read(true)
      .write(true)
      .append(true)
      .open(file_name)
    {
      Ok(file) => Ok(FileIO {
        fd: Arc::new(RwLock::new(file)),
      }),
      Err(e) => {
        error!("failed to open data file error: {e}");
        Err(Errors::FailedToOpenDataFile)
      }
    }
  }
}

impl IOManager for FileIO {
  fn read(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
    let mut fd = self.fd.write();
    fd.seek(SeekFrom::Start(offset))?;
    let mut read_total = 0;
    while read_total < buf.len() {
      match fd.read(&mut buf[read_total..]) {
        Ok(0) => break,
        Ok(n) => read_total += n,
        Err(e) => return Err(Errors::Io(e)),
      }
    }
    Ok(read_total)
  }

  fn write(&self, buf: &[u8]) -> Result<usize> {
    let mut fd = self.fd.write();
    Ok(fd.write(buf)?)
  }

  fn sync(&self) -> Result<()> {
    let fd = self.fd.read();
    fd.sync_all()?;
    Ok(())
  }

  fn size(&self) -> u64 {
    let fd = self.fd.read();
    fd.metadata().map(|m| m.len()).unwrap_or(0)
  }
}
