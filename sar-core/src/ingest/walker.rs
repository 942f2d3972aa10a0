use crate::error::Result;
use crate::storage::Storage;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    pub len: u64,
}

/// Names starting with `_` or `.` are bookkeeping (e.g. `_SUCCESS`), never inputs.
pub fn is_hidden(name: &OsStr) -> bool {
    let s = name.to_string_lossy();
    s.starts_with('_') || s.starts_with('.')
}

/// List the files a job should consume from `root`.
///
/// A file root is returned as-is. For a directory, its files are listed and
/// each child directory is expanded one level. Output is sorted by path.
pub fn enumerate_inputs(storage: &dyn Storage, root: &Path) -> Result<Vec<InputFile>> {
    let phys = storage.resolve(root)?;
    let md = std::fs::metadata(&phys)?;
    if md.is_file() {
        return Ok(vec![InputFile {
            path: root.to_path_buf(),
            len: md.len(),
        }]);
    }

    let mut out = Vec::new();
    let walker = WalkDir::new(&phys)
        .min_depth(1)
        .max_depth(2)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e.file_name()));
    for e in walker {
        let e = e.map_err(|e| std::io::Error::other(e.to_string()))?;
        if !e.file_type().is_file() {
            continue;
        }
        let len = e
            .metadata()
            .map_err(|e| std::io::Error::other(e.to_string()))?
            .len();
        out.push(InputFile {
            path: storage.logical(e.path()),
            len,
        });
    }
    out.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(out)
}
