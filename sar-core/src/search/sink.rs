use crate::error::Result;
use crate::storage::{Storage, safe_join};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Destination for extracted search results.
pub trait OutputSink: Send + Sync {
    /// Store `contents` under `filename`, returning where it went.
    fn emit(&self, filename: &str, contents: &[u8]) -> Result<PathBuf>;
}

/// Writes each result as `<dir>/<filename>`. The directory is created when
/// needed and an existing file of the same name is replaced; with duplicate
/// names across partitions the last writer wins.
pub struct DirectorySink {
    storage: Arc<dyn Storage>,
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(storage: Arc<dyn Storage>, dir: &Path) -> Self {
        Self {
            storage,
            dir: dir.to_path_buf(),
        }
    }
}

impl OutputSink for DirectorySink {
    fn emit(&self, filename: &str, contents: &[u8]) -> Result<PathBuf> {
        let target = safe_join(&self.dir, filename)?;
        self.storage.create_dir_all(&self.dir)?;
        if self.storage.delete_recursive(&target)? {
            info!(path = %target.display(), "replacing existing output file");
        }
        let mut w = self.storage.create(&target)?;
        w.write_all(contents)?;
        w.flush()?;
        Ok(target)
    }
}
