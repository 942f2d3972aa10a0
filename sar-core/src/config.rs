//! Immutable job configuration, built once and shared read-only by every worker.

use crate::pipeline::SealOptions;
use crate::search::query::SearchQuery;
use crate::storage::{Backend, Storage, open_storage};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Password used when none is given.
pub const DEFAULT_KEY: &str = "KEY";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub path: PathBuf,
    pub backend: Backend,
}

impl Location {
    pub fn new(path: impl Into<PathBuf>, local: bool) -> Self {
        Self {
            path: path.into(),
            backend: if local {
                Backend::Local
            } else {
                Backend::Default
            },
        }
    }

    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::new(path, true)
    }

    pub fn storage(&self, fs_root: &Path) -> Arc<dyn Storage> {
        open_storage(self.backend, fs_root)
    }
}

#[derive(Clone, Debug)]
pub struct BuildConfig {
    pub input: Location,
    pub output: Location,
    pub seal: SealOptions,
    /// Worker threads; 0 means one per available core.
    pub workers: usize,
    /// Root of the default (non-local) filesystem.
    pub fs_root: PathBuf,
}

impl BuildConfig {
    pub fn new(input: Location, output: Location) -> Self {
        Self {
            input,
            output,
            seal: SealOptions::default(),
            workers: 0,
            fs_root: PathBuf::from("."),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SearchConfig {
    pub input: Location,
    pub output: Location,
    pub password: String,
    pub query: SearchQuery,
    pub workers: usize,
    pub fs_root: PathBuf,
}

impl SearchConfig {
    pub fn new(input: Location, output: Location, query: SearchQuery) -> Self {
        Self {
            input,
            output,
            password: DEFAULT_KEY.to_string(),
            query,
            workers: 0,
            fs_root: PathBuf::from("."),
        }
    }
}
