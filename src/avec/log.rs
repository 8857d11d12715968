//! Append-only dataset logs.
//!
//! _Requires Cargo feature `std`._
//!
//! A log is either unprepared or prepared; only a prepared log accepts rows.
//! A missing or empty file is unprepared. Preparing it writes the header row
//! without disturbing rows another writer may have added in the meantime.
//! Resetting truncates the file to just the header, and preparing an already
//! prepared log does the same.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    string::String,
    vec::Vec,
};

use either::Either::{self, Left, Right};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{sans::Value, schema::Dataset};

use super::text::{self, render_header, render_row};

/// Errors occurring while writing to a dataset log.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the underlying file.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The record could not be decoded; nothing was written.
    #[error("Failed to decode record: {0}")]
    Decode(#[from] text::Error),
}

/// A dataset log whose file has not been prepared.
#[derive(Debug)]
pub struct UnpreparedLog {
    path: PathBuf,
    header: String,
}

impl UnpreparedLog {
    /// Describe a log at a path with a header row.
    pub fn new(path: impl Into<PathBuf>, header: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            header: header.into(),
        }
    }

    /// Describe the log of a dataset within a directory.
    pub fn for_dataset(dir: impl AsRef<Path>, dataset: Dataset) -> Self {
        Self::new(
            dir.as_ref().join(dataset.file_name()),
            render_header(dataset.columns()),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Transition to the prepared state, writing the header row if the file
    /// is new or empty.
    ///
    /// The file is created exclusively, so rows another writer appended after
    /// this log was opened are kept rather than truncated away.
    pub fn prepare(self) -> io::Result<PreparedLog> {
        let created = OpenOptions::new()
            .write(true)
            .append(true)
            .create_new(true)
            .open(&self.path);

        let (file, empty) = match created {
            Ok(file) => (file, true),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                let file = OpenOptions::new().write(true).append(true).open(&self.path)?;
                let empty = file.metadata()?.len() == 0;
                (file, empty)
            }
            Err(err) => Err(err)?,
        };

        let mut log = PreparedLog {
            path: self.path,
            header: self.header,
            file,
        };

        if empty {
            log.file.write_all(log.header.as_bytes())?;
            info!(path = %log.path.display(), "dataset log created");
        }

        Ok(log)
    }

    /// Transition to the prepared state by truncating the file and writing the
    /// header row, creating the file if needed.
    pub fn reset(self) -> io::Result<PreparedLog> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(true)
            .open(&self.path)?;

        let mut log = PreparedLog {
            path: self.path,
            header: self.header,
            file,
        };
        log.prepare()?;

        Ok(log)
    }

    /// Open the log without modifying it.
    ///
    /// A missing or empty file is unprepared; any other file is taken to be
    /// prepared. Returns the log in the state matching its file.
    pub fn open(self) -> io::Result<Either<UnpreparedLog, PreparedLog>> {
        let file = match OpenOptions::new().write(true).append(true).open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Left(self)),
            Err(err) => Err(err)?,
        };

        if file.metadata()?.len() == 0 {
            return Ok(Left(self));
        }

        Ok(Right(PreparedLog {
            path: self.path,
            header: self.header,
            file,
        }))
    }
}

/// A dataset log accepting rows.
#[derive(Debug)]
pub struct PreparedLog {
    path: PathBuf,
    header: String,
    file: File,
}

impl PreparedLog {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Discard every row, leaving only the header.
    pub fn prepare(&mut self) -> io::Result<()> {
        self.file.set_len(0)?;
        self.file.write_all(self.header.as_bytes())?;

        info!(path = %self.path.display(), "dataset log prepared");
        Ok(())
    }

    /// Append a rendered row.
    ///
    /// The row is written in a single call on a file opened for appending, so
    /// rows from concurrent writers are never interleaved.
    pub fn append(&mut self, row: &str) -> io::Result<()> {
        self.file.write_all(row.as_bytes())?;

        debug!(path = %self.path.display(), row = row.trim_end(), "row appended");
        Ok(())
    }
}

/// A directory holding the log of each dataset.
#[derive(Debug, Clone)]
pub struct Sink {
    dir: PathBuf,
}

impl Sink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The log of a dataset, in its unprepared state.
    pub fn log(&self, dataset: Dataset) -> UnpreparedLog {
        UnpreparedLog::for_dataset(&self.dir, dataset)
    }

    /// Prepare the log of a dataset, discarding any rows it held.
    pub fn prepare(&self, dataset: Dataset) -> Result<PreparedLog, Error> {
        fs::create_dir_all(&self.dir)?;
        Ok(self.log(dataset).reset()?)
    }

    /// Prepare the log of every registered dataset.
    pub fn prepare_all(&self) -> Result<Vec<PreparedLog>, Error> {
        Dataset::ALL.into_iter().map(|d| self.prepare(d)).collect()
    }

    /// Decode a hex-encoded record of a dataset and append it to the
    /// dataset's log, preparing the log first if its file is missing or empty.
    ///
    /// The record is decoded in full before the log is touched; on failure
    /// nothing is written.
    ///
    /// Returns the decoded values.
    pub fn append(&self, dataset: Dataset, hex: &str) -> Result<Vec<Value>, Error> {
        let values = text::decode_hex(hex, dataset.schema())?;
        let row = render_row(&values);

        let mut log = match self.log(dataset).open()? {
            Left(log) => {
                warn!(%dataset, "appending to an unprepared log, preparing it first");
                // Another writer may create the file first; its rows survive.
                fs::create_dir_all(&self.dir)?;
                log.prepare()?
            }
            Right(log) => log,
        };

        log.append(&row)?;
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use std::format;

    use super::*;

    #[test]
    fn prepare_writes_only_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let log = UnpreparedLog::new(dir.path().join("a.csv"), "x,y\n");

        let mut log = log.prepare().unwrap();
        log.append("1,2\n").unwrap();
        log.append("3,4\n").unwrap();
        assert_eq!(fs::read_to_string(log.path()).unwrap(), "x,y\n1,2\n3,4\n");

        log.prepare().unwrap();
        log.prepare().unwrap();
        assert_eq!(fs::read_to_string(log.path()).unwrap(), "x,y\n");

        log.append("5,6\n").unwrap();
        assert_eq!(fs::read_to_string(log.path()).unwrap(), "x,y\n5,6\n");
    }

    #[test]
    fn preparing_replaces_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.csv");
        fs::write(&path, "stale contents\nfrom before\n").unwrap();

        UnpreparedLog::new(&path, "x\n").reset().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "x\n");
    }

    #[test]
    fn first_preparation_keeps_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.csv");
        fs::write(&path, "x\n1\n").unwrap();

        let mut log = UnpreparedLog::new(&path, "x\n").prepare().unwrap();
        log.append("2\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "x\n1\n2\n");
    }

    #[test]
    fn empty_files_are_unprepared() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Sink::new(dir.path());
        let path = sink.log(Dataset::Rebalance).path().to_path_buf();
        fs::write(&path, "").unwrap();

        assert!(sink.log(Dataset::Rebalance).open().unwrap().is_left());

        let record = format!("{:06x}{:064x}", 1u8, 7u8);
        sink.append(Dataset::Rebalance, &record).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "tick,blockNumber\n1,7\n");
    }

    #[test]
    fn racing_first_appends_keep_both_rows() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Sink::new(dir.path());
        let record = format!("{:06x}{:064x}", 1u8, 7u8);

        // One writer finds no log, then another completes its first append.
        let unprepared = sink.log(Dataset::Rebalance).open().unwrap().left().unwrap();
        sink.append(Dataset::Rebalance, &record).unwrap();

        let mut log = unprepared.prepare().unwrap();
        log.append("1,7\n").unwrap();

        assert_eq!(
            fs::read_to_string(log.path()).unwrap(),
            "tick,blockNumber\n1,7\n1,7\n"
        );
    }

    #[test]
    fn open_reflects_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.csv");

        assert!(UnpreparedLog::new(&path, "x\n").open().unwrap().is_left());

        fs::write(&path, "x\n").unwrap();
        let mut log = UnpreparedLog::new(&path, "x\n").open().unwrap().right().unwrap();
        log.append("1\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "x\n1\n");
    }

    #[test]
    fn sink_prepares_on_first_append() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Sink::new(dir.path().join("out"));

        let record = format!("{:06x}{:064x}", 0xFFFFFEu32, 12u8);
        sink.append(Dataset::Rebalance, &record).unwrap();
        sink.append(Dataset::Rebalance, &record).unwrap();

        let path = sink.log(Dataset::Rebalance).path().to_path_buf();
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "tick,blockNumber\n-2,12\n-2,12\n"
        );
    }

    #[test]
    fn sink_writes_nothing_for_bad_records() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Sink::new(dir.path());
        sink.prepare(Dataset::RandomRequest).unwrap();

        let err = sink.append(Dataset::RandomRequest, "0x00ff").unwrap_err();
        assert!(matches!(err, Error::Decode(text::Error::OutOfBounds { .. })));

        let err = sink.append(Dataset::RandomRequest, "0xzz").unwrap_err();
        assert!(matches!(err, Error::Decode(text::Error::MalformedInput(_))));

        let path = sink.log(Dataset::RandomRequest).path().to_path_buf();
        assert_eq!(fs::read_to_string(path).unwrap(), "randomCap\n");
    }

    #[test]
    fn prepare_all_creates_every_log() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Sink::new(dir.path());

        let logs = sink.prepare_all().unwrap();
        assert_eq!(logs.len(), Dataset::ALL.len());

        for dataset in Dataset::ALL {
            let contents = fs::read_to_string(dir.path().join(dataset.file_name())).unwrap();
            assert_eq!(contents, render_header(dataset.columns()));
        }
    }
}
