use super::pool::{effective_workers, worker_pool};
use super::report::JobReport;
use crate::config::BuildConfig;
use crate::container::writer::Container;
use crate::error::{Result, SarError};
use crate::ingest::plan::{partition, plan_units};
use crate::ingest::walker::enumerate_inputs;
use crate::ingest::whole_file::{InputFormat, WholeFileInput, WorkUnit};
use crate::pipeline::{SealOptions, seal_record};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{error, info};

/// Split size handed to the planner; irrelevant for whole-file input.
const SPLIT_SIZE: u64 = 128 * 1024 * 1024;

/// Archive every file under the input location into a fresh container.
///
/// The destination is wiped before anything else happens. Records that fail
/// to transform are dropped; unreadable inputs are skipped but fail the job.
pub fn run_build(cfg: &BuildConfig) -> Result<JobReport> {
    let t0 = Instant::now();
    let mut report = JobReport::start("build");

    let in_fs = cfg.input.storage(&cfg.fs_root);
    let out_fs = cfg.output.storage(&cfg.fs_root);

    let container = Container::create(out_fs, &cfg.output.path)?;

    let files = enumerate_inputs(in_fs.as_ref(), &cfg.input.path)?;
    let format = WholeFileInput::new(in_fs);
    let units = plan_units(&format, &files, SPLIT_SIZE);

    let pool = worker_pool(cfg.workers)?;
    let partitions = partition(units, effective_workers(&pool));
    info!(
        inputs = files.len(),
        partitions = partitions.len(),
        compress = cfg.seal.compress,
        encrypt = cfg.seal.encrypt,
        "starting build"
    );

    let outcomes: Vec<JobReport> = pool.install(|| {
        partitions
            .par_iter()
            .enumerate()
            .map(|(i, units)| build_partition(i, units, &format, &container, &cfg.seal))
            .collect()
    });
    for o in &outcomes {
        report.absorb(o);
    }

    report.success = report.read_failures == 0 && report.failed_partitions == 0;
    if report.success {
        container.commit()?;
    }
    report.elapsed_ms = t0.elapsed().as_millis() as u64;
    info!(
        written = report.records_written,
        dropped = report.dropped,
        read_failures = report.read_failures,
        "build finished"
    );
    Ok(report)
}

fn build_partition(
    index: usize,
    units: &[WorkUnit],
    format: &dyn InputFormat,
    container: &Container,
    seal: &SealOptions,
) -> JobReport {
    let mut rep = JobReport {
        partitions: 1,
        ..Default::default()
    };
    let mut w = match container.part_writer(index) {
        Ok(w) => w,
        Err(e) => {
            error!(partition = index, error = %e, "cannot open container part");
            rep.failed_partitions = 1;
            return rep;
        }
    };

    for unit in units {
        rep.inputs += 1;
        let raw = match format.read(unit) {
            Ok(r) => r,
            Err(e) => {
                error!(path = %unit.path.display(), error = %e, "failed to read input");
                rep.read_failures += 1;
                continue;
            }
        };
        let filename = raw.filename;
        let rec = match seal_record(raw.payload, &filename, seal) {
            Ok(r) => r,
            Err(e) => {
                error!(filename = %filename, error = %e, "failed to archive");
                rep.dropped += 1;
                continue;
            }
        };
        match w.write_record(&rec) {
            Ok(()) => {}
            Err(SarError::Transform(e)) => {
                error!(filename = %filename, error = %e, "failed to archive");
                rep.dropped += 1;
            }
            Err(e) => {
                error!(partition = index, error = %e, "container write failed");
                rep.failed_partitions = 1;
                return rep;
            }
        }
    }

    match w.finish() {
        Ok(sum) => {
            rep.records_written = sum.records;
            rep.bytes_written = sum.bytes;
        }
        Err(e) => {
            error!(partition = index, error = %e, "cannot close container part");
            rep.failed_partitions = 1;
        }
    }
    rep
}
