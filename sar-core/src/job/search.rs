use super::pool::worker_pool;
use super::report::JobReport;
use crate::config::SearchConfig;
use crate::container::stream::open_stream;
use crate::error::Result;
use crate::ingest::walker::{InputFile, enumerate_inputs};
use crate::search::engine::SearchEngine;
use crate::search::sink::DirectorySink;
use crate::storage::Storage;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{error, info};

/// Scan every container part under the input location, one part per
/// partition, extracting matches into the output location.
pub fn run_search(cfg: &SearchConfig) -> Result<JobReport> {
    let in_fs = cfg.input.storage(&cfg.fs_root);
    let parts = enumerate_inputs(in_fs.as_ref(), &cfg.input.path)?;
    search_parts(cfg, in_fs.as_ref(), &parts)
}

fn search_parts(
    cfg: &SearchConfig,
    in_fs: &dyn Storage,
    parts: &[InputFile],
) -> Result<JobReport> {
    let t0 = Instant::now();
    let mut report = JobReport::start("search");

    let out_fs = cfg.output.storage(&cfg.fs_root);
    let sink = DirectorySink::new(out_fs, &cfg.output.path);
    let engine = SearchEngine::new(&cfg.query, &cfg.password, &sink);
    let pool = worker_pool(cfg.workers)?;
    info!(
        partitions = parts.len(),
        file = cfg.query.filename().unwrap_or(""),
        keyword = cfg.query.keyword().unwrap_or(""),
        "starting search"
    );

    let outcomes: Vec<JobReport> = pool.install(|| {
        parts
            .par_iter()
            .map(|p| search_partition(&engine, in_fs, p))
            .collect()
    });
    for o in &outcomes {
        report.absorb(o);
    }

    report.success = report.failed_partitions == 0;
    report.elapsed_ms = t0.elapsed().as_millis() as u64;
    info!(
        scanned = report.scan.scanned,
        emitted = report.scan.emitted,
        rejected = report.scan.rejected,
        "search finished"
    );
    Ok(report)
}

fn search_partition(
    engine: &SearchEngine<'_>,
    storage: &dyn Storage,
    part: &InputFile,
) -> JobReport {
    let name = part.path.display().to_string();
    match open_stream(storage, &part.path) {
        Ok(stream) => JobReport::from_outcome(&engine.scan(&name, stream)),
        Err(e) => {
            error!(partition = %name, error = %e, "cannot open container");
            JobReport {
                partitions: 1,
                failed_partitions: 1,
                ..Default::default()
            }
        }
    }
}
