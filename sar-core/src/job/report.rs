use crate::error::Result;
use crate::search::engine::{PartitionOutcome, ScanStats};
use serde::Serialize;
use std::path::Path;
use time::OffsetDateTime;

#[derive(Clone, Debug, Default, Serialize)]
pub struct JobReport {
    pub job: String,
    pub started_at: i64,
    pub elapsed_ms: u64,
    pub partitions: u64,
    /// Partitions that could not open or close their container.
    pub failed_partitions: u64,

    // build
    pub inputs: u64,
    pub read_failures: u64,
    pub dropped: u64,
    pub records_written: u64,
    pub bytes_written: u64,

    // search
    #[serde(flatten)]
    pub scan: ScanStats,
    pub stopped_partitions: u64,
    pub corrupt_partitions: u64,

    pub success: bool,
}

impl JobReport {
    pub fn start(job: &str) -> Self {
        Self {
            job: job.to_string(),
            started_at: OffsetDateTime::now_utc().unix_timestamp(),
            ..Default::default()
        }
    }

    /// Fold one partition's counters into the job total.
    pub fn absorb(&mut self, part: &JobReport) {
        self.partitions += part.partitions;
        self.failed_partitions += part.failed_partitions;
        self.inputs += part.inputs;
        self.read_failures += part.read_failures;
        self.dropped += part.dropped;
        self.records_written += part.records_written;
        self.bytes_written += part.bytes_written;
        self.scan.scanned += part.scan.scanned;
        self.scan.filtered_out += part.scan.filtered_out;
        self.scan.rejected += part.scan.rejected;
        self.scan.emitted += part.scan.emitted;
        self.scan.missed += part.scan.missed;
        self.scan.failed += part.scan.failed;
        self.stopped_partitions += part.stopped_partitions;
        self.corrupt_partitions += part.corrupt_partitions;
    }

    pub fn from_outcome(o: &PartitionOutcome) -> Self {
        Self {
            partitions: 1,
            scan: o.stats.clone(),
            stopped_partitions: o.stopped as u64,
            corrupt_partitions: o.corrupt as u64,
            ..Default::default()
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let body = serde_json::to_vec_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, body)?;
        Ok(())
    }
}
