#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod pipeline;

pub mod codec;

pub mod crypto {
    pub mod fingerprint;
    pub mod hex;
    pub mod legacy;
}

pub mod container {
    pub mod record;
    pub mod stream;
    pub mod writer;
}

pub mod storage;

pub mod ingest {
    pub mod plan;
    pub mod walker;
    pub mod whole_file;
}

pub mod search {
    pub mod engine;
    pub mod query;
    pub mod sink;
}

pub mod job {
    pub mod build;
    pub mod pool;
    pub mod report;
    pub mod search;
}

pub mod list;

// Re-exports: stable API surface
pub use config::{BuildConfig, DEFAULT_KEY, Location, SearchConfig};
pub use container::record::ArchiveRecord;
pub use error::{Result, SarError};
pub use job::build::run_build;
pub use job::report::JobReport;
pub use job::search::run_search;
pub use list::list;
pub use pipeline::{SealOptions, open_record, seal_record};
pub use search::query::SearchQuery;
