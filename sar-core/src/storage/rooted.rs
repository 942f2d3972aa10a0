use super::Storage;
use crate::error::{Result, SarError};
use std::path::{Component, Path, PathBuf};

/// Default job filesystem: every path, absolute or relative, lives under `root`.
pub struct RootedFs {
    root: PathBuf,
}

impl RootedFs {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl Storage for RootedFs {
    fn resolve(&self, path: &Path) -> Result<PathBuf> {
        let mut out = self.root.clone();
        for c in path.components() {
            match c {
                Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
                Component::Normal(part) => out.push(part),
                Component::ParentDir => {
                    return Err(SarError::Argument(format!(
                        "path escapes storage root: {}",
                        path.display()
                    )));
                }
            }
        }
        Ok(out)
    }

    fn logical(&self, physical: &Path) -> PathBuf {
        match physical.strip_prefix(&self.root) {
            Ok(rel) => Path::new("/").join(rel),
            Err(_) => physical.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_and_relative_paths_are_rerooted() {
        let fs = RootedFs::new(Path::new("/srv/sar"));
        assert_eq!(
            fs.resolve(Path::new("/data/in")).unwrap(),
            PathBuf::from("/srv/sar/data/in")
        );
        assert_eq!(
            fs.resolve(Path::new("data/./in")).unwrap(),
            PathBuf::from("/srv/sar/data/in")
        );
        assert!(fs.resolve(Path::new("data/../../etc")).is_err());
    }

    #[test]
    fn logical_inverts_resolve() {
        let fs = RootedFs::new(Path::new("/srv/sar"));
        let p = fs.resolve(Path::new("/a/b.txt")).unwrap();
        assert_eq!(fs.logical(&p), PathBuf::from("/a/b.txt"));
    }
}
