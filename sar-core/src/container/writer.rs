use super::record::ArchiveRecord;
use crate::error::Result;
use crate::storage::Storage;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

pub const SUCCESS_MARKER: &str = "_SUCCESS";

pub fn part_name(index: usize) -> String {
    format!("part-{index:05}")
}

/// A build destination: a directory of container parts, one per worker.
pub struct Container {
    storage: Arc<dyn Storage>,
    dir: PathBuf,
}

impl Container {
    /// Open a destination for a build. Anything already at `dir` is deleted
    /// first, unconditionally; there is no append mode.
    pub fn create(storage: Arc<dyn Storage>, dir: &Path) -> Result<Self> {
        if storage.delete_recursive(dir)? {
            info!(path = %dir.display(), "deleted existing archive destination");
        }
        storage.create_dir_all(dir)?;
        Ok(Self {
            storage,
            dir: dir.to_path_buf(),
        })
    }

    /// Writer for one worker's part. Each index must be used by one worker only.
    pub fn part_writer(&self, index: usize) -> Result<ArchiveWriter> {
        ArchiveWriter::create(self.storage.as_ref(), &self.dir.join(part_name(index)))
    }

    /// Mark the build as complete.
    pub fn commit(&self) -> Result<()> {
        let mut w = self.storage.create(&self.dir.join(SUCCESS_MARKER))?;
        w.flush()?;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub records: u64,
    pub bytes: u64,
}

/// Appends encoded records to one container file.
pub struct ArchiveWriter {
    w: Box<dyn Write + Send>,
    path: PathBuf,
    summary: WriteSummary,
}

impl ArchiveWriter {
    pub fn create(storage: &dyn Storage, path: &Path) -> Result<Self> {
        Ok(Self {
            w: storage.create(path)?,
            path: path.to_path_buf(),
            summary: WriteSummary::default(),
        })
    }

    pub fn write_record(&mut self, rec: &ArchiveRecord) -> Result<()> {
        // Encode first so a record that cannot be represented leaves no partial bytes.
        let bytes = rec.encode()?;
        self.w.write_all(&bytes)?;
        self.summary.records += 1;
        self.summary.bytes += bytes.len() as u64;
        debug!(filename = %rec.filename, len = bytes.len(), "record written");
        Ok(())
    }

    pub fn finish(mut self) -> Result<WriteSummary> {
        self.w.flush()?;
        debug!(
            path = %self.path.display(),
            records = self.summary.records,
            "container part closed"
        );
        Ok(self.summary)
    }
}
