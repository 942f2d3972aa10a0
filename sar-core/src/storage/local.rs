use super::Storage;
use crate::error::Result;
use std::path::{Path, PathBuf};

pub struct LocalFs;

impl Storage for LocalFs {
    fn resolve(&self, path: &Path) -> Result<PathBuf> {
        Ok(path.to_path_buf())
    }

    fn logical(&self, physical: &Path) -> PathBuf {
        physical.to_path_buf()
    }
}
