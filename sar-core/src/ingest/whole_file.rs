use crate::container::record::ArchiveRecord;
use crate::error::{Result, SarError};
use crate::storage::Storage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// A slice of one input file handed to a worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkUnit {
    pub path: PathBuf,
    pub offset: u64,
    pub len: u64,
}

impl WorkUnit {
    pub fn whole(path: PathBuf, len: u64) -> Self {
        Self {
            path,
            offset: 0,
            len,
        }
    }
}

/// How the scheduler may cut an input file and how a worker turns a unit into a record.
pub trait InputFormat: Send + Sync {
    /// Whether a file may be divided across workers.
    fn is_splittable(&self, path: &Path) -> bool;

    fn read(&self, unit: &WorkUnit) -> Result<ArchiveRecord>;
}

/// Reads each input file as one indivisible record. Compression and
/// encryption need the complete plaintext, so files are never split.
pub struct WholeFileInput {
    storage: Arc<dyn Storage>,
}

impl WholeFileInput {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Read `path` into an untransformed record named after its final component.
    pub fn read_whole_file(&self, path: &Path) -> Result<ArchiveRecord> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| SarError::Argument(format!("not a file path: {}", path.display())))?;
        let contents = self.storage.read_all(path)?;
        info!(filename = %filename, len = contents.len(), "read input file");
        Ok(ArchiveRecord::plain(filename, contents))
    }
}

impl InputFormat for WholeFileInput {
    fn is_splittable(&self, _path: &Path) -> bool {
        false
    }

    fn read(&self, unit: &WorkUnit) -> Result<ArchiveRecord> {
        let len = self.storage.len(&unit.path)?;
        if unit.offset != 0 || unit.len != len {
            return Err(SarError::Argument(format!(
                "{}: whole-file input got a partial split ({}+{} of {len})",
                unit.path.display(),
                unit.offset,
                unit.len
            )));
        }
        self.read_whole_file(&unit.path)
    }
}
