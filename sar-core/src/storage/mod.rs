//! Filesystem seam. Jobs address paths on one of two namespaces: the host
//! filesystem as-is, or the job's default filesystem rooted at a directory.

use crate::error::{Result, SarError};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod local;
pub mod rooted;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Host paths, selected by the `*_local` flags.
    Local,
    /// Paths under the configured storage root.
    Default,
}

pub trait Storage: Send + Sync {
    /// Map a job path onto the host filesystem.
    fn resolve(&self, path: &Path) -> Result<PathBuf>;

    /// Inverse of [`Storage::resolve`] for host paths found while listing.
    fn logical(&self, physical: &Path) -> PathBuf;

    fn exists(&self, path: &Path) -> Result<bool> {
        Ok(self.resolve(path)?.exists())
    }

    fn len(&self, path: &Path) -> Result<u64> {
        Ok(fs::metadata(self.resolve(path)?)?.len())
    }

    /// Remove a file or a whole tree. Returns whether anything was there.
    fn delete_recursive(&self, path: &Path) -> Result<bool> {
        let p = self.resolve(path)?;
        let md = match fs::symlink_metadata(&p) {
            Ok(md) => md,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        if md.is_dir() {
            fs::remove_dir_all(&p)?;
        } else {
            fs::remove_file(&p)?;
        }
        Ok(true)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(self.resolve(path)?)?;
        Ok(())
    }

    /// Create (or truncate) a file for writing.
    fn create(&self, path: &Path) -> Result<Box<dyn Write + Send>> {
        let f = File::create(self.resolve(path)?)?;
        Ok(Box::new(BufWriter::new(f)))
    }

    fn open(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let f = File::open(self.resolve(path)?)?;
        Ok(Box::new(BufReader::new(f)))
    }

    /// Read a file in one go, failing if it changes length underneath us.
    fn read_all(&self, path: &Path) -> Result<Vec<u8>> {
        let expected = self.len(path)?;
        let mut buf = Vec::with_capacity(expected as usize);
        self.open(path)?.read_to_end(&mut buf)?;
        if buf.len() as u64 != expected {
            return Err(std::io::Error::new(
                ErrorKind::UnexpectedEof,
                format!(
                    "{}: read {} of {expected} bytes",
                    path.display(),
                    buf.len()
                ),
            )
            .into());
        }
        Ok(buf)
    }
}

pub fn open_storage(backend: Backend, fs_root: &Path) -> Arc<dyn Storage> {
    match backend {
        Backend::Local => Arc::new(local::LocalFs),
        Backend::Default => Arc::new(rooted::RootedFs::new(fs_root)),
    }
}

/// Join an archive-supplied file name under `dir`, refusing escapes.
pub fn safe_join(dir: &Path, name: &str) -> Result<PathBuf> {
    let p = Path::new(name);
    if name.is_empty()
        || p.is_absolute()
        || p.components().any(|c| {
            !matches!(c, std::path::Component::Normal(_) | std::path::Component::CurDir)
        })
    {
        return Err(SarError::Argument(format!("unsafe output name: {name:?}")));
    }
    Ok(dir.join(p))
}
