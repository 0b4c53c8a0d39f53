use thiserror::Error;

pub type Result<T> = std::result::Result<T, Errors>;

/// All error kinds surfaced by the storage engine.
#[derive(Error, Debug)]
pub enum Errors {
  #[error("the key is empty")]
  KeyIsEmpty,

  #[error("can't find the key in database")]
  KeyNotFound,

  #[error("failed to update index")]
  IndexUpdateFailed,

  #[error("data file is not found")]
  DataFileNotFound,

  #[error("database data file size must be greater than 0")]
  DataFileSizeTooSmall,

  #[error("database directory path is empty")]
  DirPathIsEmpty,

  #[error("merge threshold must be between 0 and 1")]
  InvalidMergeThreshold,

  #[error("the crc value is invalid, log record may be corrupted")]
  CorruptedRecord,

  #[error("read data file EOF")]
  ReadDataFileEOF,

  #[error("the database directory may be corrupted")]
  DatabaseDirectoryCorrupted,

  #[error("the database directory is being used by another process")]
  DatabaseIsUsing,

  #[error("failed to create the database directory")]
  FailedToCreateDatabaseDir,

  #[error("failed to read the database directory")]
  FailedToReadDatabaseDir,

  #[error("failed to open data file")]
  FailedToOpenDataFile,

  #[error("failed to copy the data directory")]
  FailedToCopyDirectory,

  #[error("exceeded the max batch num")]
  ExceedMaxBatchNum,

  #[error("a merge is already in progress, try again later")]
  MergeInProgress,

  #[error("the reclaimable ratio does not reach the merge threshold")]
  MergeThresholdUnreached,

  #[error("the disk does not have enough space for a merge")]
  MergeNoEnoughSpace,

  #[error("the write batch can not be used, log records not in hint file"
  )]
  UnableToUseWriteBatch,

  #[error(transparent)]
  Io(#[from] std::io::Error),
}

// `std::io::Error` has no `PartialEq` impl, so the derive is hand-rolled:
// two `Io` variants compare equal when their `ErrorKind`s match, every
// other variant compares by discriminant only (none of them carry data).
impl PartialEq for Errors {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Errors::Io(a), Errors::Io(b)) => a.kind() == b.kind(),
      _ => std::mem::discriminant(self) == std::mem::discriminant(other),
    }
  }
}

impl Eq for Errors {}
