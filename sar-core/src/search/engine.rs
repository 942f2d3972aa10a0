//! Per-partition search state machine.
//!
//! Each record moves from scanning to one of the dispositions below and back
//! to scanning. A name-only search stops its partition after the first
//! emitted record (names are assumed unique); a keyword search never stops
//! early since any number of records may match. Stopping is local to the
//! partition being scanned: other workers keep going.

use super::query::SearchQuery;
use super::sink::OutputSink;
use crate::container::record::ArchiveRecord;
use crate::error::{Result, SarError};
use crate::pipeline::open_record;
use serde::Serialize;
use tracing::{debug, error, info, warn};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Name filter did not match; nothing was decoded.
    FilteredOut,
    /// Stored fingerprint does not match the password.
    FingerprintRejected,
    Emitted,
    /// Decoded, keyword absent.
    Missed,
    /// Decode or output failure for this record only.
    Failed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub scanned: u64,
    pub filtered_out: u64,
    pub rejected: u64,
    pub emitted: u64,
    pub missed: u64,
    pub failed: u64,
}

impl ScanStats {
    fn record(&mut self, d: Disposition) {
        self.scanned += 1;
        match d {
            Disposition::FilteredOut => self.filtered_out += 1,
            Disposition::FingerprintRejected => self.rejected += 1,
            Disposition::Emitted => self.emitted += 1,
            Disposition::Missed => self.missed += 1,
            Disposition::Failed => self.failed += 1,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartitionOutcome {
    pub stats: ScanStats,
    /// The partition was abandoned early after a name match.
    pub stopped: bool,
    /// The partition was abandoned on an unreadable record.
    pub corrupt: bool,
}

pub struct SearchEngine<'a> {
    query: &'a SearchQuery,
    password: &'a str,
    sink: &'a dyn OutputSink,
}

impl<'a> SearchEngine<'a> {
    pub fn new(query: &'a SearchQuery, password: &'a str, sink: &'a dyn OutputSink) -> Self {
        Self {
            query,
            password,
            sink,
        }
    }

    /// Decide the fate of one record and whether the partition goes on.
    pub fn process(&self, rec: &ArchiveRecord) -> (Disposition, Flow) {
        let name = rec.filename.as_str();
        if !self.query.admits_name(name) {
            return (Disposition::FilteredOut, Flow::Continue);
        }

        let plain = match open_record(rec, self.password) {
            Ok(p) => p,
            Err(SarError::PasswordMismatch { .. }) => {
                error!(filename = name, "incorrect password");
                return (Disposition::FingerprintRejected, Flow::Continue);
            }
            Err(e) => {
                warn!(filename = name, error = %e, "failed to decode record");
                return (Disposition::Failed, Flow::Continue);
            }
        };
        debug!(filename = name, len = plain.len(), "record decoded");

        match self.query.keyword() {
            Some(kw) => {
                if self.query.admits_contents(&plain) {
                    info!(filename = name, keyword = kw, "search hit");
                    (self.emit(name, &plain), Flow::Continue)
                } else {
                    debug!(filename = name, keyword = kw, "search miss");
                    (Disposition::Missed, Flow::Continue)
                }
            }
            None => match self.emit(name, &plain) {
                Disposition::Emitted => (Disposition::Emitted, Flow::Stop),
                d => (d, Flow::Continue),
            },
        }
    }

    fn emit(&self, name: &str, plain: &[u8]) -> Disposition {
        match self.sink.emit(name, plain) {
            Ok(path) => {
                info!(filename = name, path = %path.display(), "wrote search result");
                Disposition::Emitted
            }
            Err(e) => {
                error!(filename = name, error = %e, "failed to write search result");
                Disposition::Failed
            }
        }
    }

    /// Scan one partition. After a stop no further record is pulled from
    /// `records`; after a read error the rest of the partition is skipped.
    pub fn scan<I>(&self, partition: &str, records: I) -> PartitionOutcome
    where
        I: IntoIterator<Item = Result<ArchiveRecord>>,
    {
        let mut out = PartitionOutcome::default();
        let mut it = records.into_iter();
        let mut finished = false;
        while !finished {
            let rec = match it.next() {
                None => break,
                Some(Ok(rec)) => rec,
                Some(Err(e)) => {
                    error!(partition, error = %e, "unreadable container, abandoning partition");
                    out.corrupt = true;
                    break;
                }
            };
            let (d, flow) = self.process(&rec);
            out.stats.record(d);
            if flow == Flow::Stop {
                info!(partition, filename = %rec.filename, "file found, stopping partition");
                out.stopped = true;
                finished = true;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{SealOptions, seal_record};
    use std::cell::Cell;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemSink {
        got: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl OutputSink for MemSink {
        fn emit(&self, filename: &str, contents: &[u8]) -> Result<PathBuf> {
            self.got
                .lock()
                .unwrap()
                .push((filename.to_string(), contents.to_vec()));
            Ok(PathBuf::from(filename))
        }
    }

    struct FailingSink;

    impl OutputSink for FailingSink {
        fn emit(&self, _filename: &str, _contents: &[u8]) -> Result<PathBuf> {
            Err(std::io::Error::other("disk full").into())
        }
    }

    fn sealed(name: &str, body: &str, password: &str) -> ArchiveRecord {
        let opts = SealOptions {
            compress: true,
            encrypt: true,
            password: password.to_string(),
            ..Default::default()
        };
        seal_record(body.as_bytes().to_vec(), name, &opts).unwrap()
    }

    fn abc() -> Vec<ArchiveRecord> {
        vec![
            sealed("a.txt", "alpha", "pw"),
            sealed("b.txt", "bravo", "pw"),
            sealed("c.txt", "charlie", "pw"),
        ]
    }

    #[test]
    fn name_search_stops_after_first_match() {
        let q = SearchQuery::new(Some("b.txt".into()), None).unwrap();
        let sink = MemSink::default();
        let engine = SearchEngine::new(&q, "pw", &sink);

        let pulled = Cell::new(0);
        let records = abc().into_iter().inspect(|_| pulled.set(pulled.get() + 1)).map(Ok);
        let out = engine.scan("p0", records);

        assert!(out.stopped);
        assert_eq!(pulled.get(), 2, "c.txt must not be pulled");
        assert_eq!(out.stats.filtered_out, 1);
        assert_eq!(out.stats.emitted, 1);
        assert_eq!(
            *sink.got.lock().unwrap(),
            vec![("b.txt".to_string(), b"bravo".to_vec())]
        );
    }

    #[test]
    fn keyword_search_emits_every_hit() {
        let records = vec![
            sealed("one.txt", "INVOICE #1", "pw"),
            sealed("two.txt", "nothing here", "pw"),
            sealed("three.txt", "second INVOICE", "pw"),
        ];
        let q = SearchQuery::new(None, Some("INVOICE".into())).unwrap();
        let sink = MemSink::default();
        let out = SearchEngine::new(&q, "pw", &sink).scan("p0", records.into_iter().map(Ok));

        assert!(!out.stopped);
        assert_eq!(out.stats.emitted, 2);
        assert_eq!(out.stats.missed, 1);
        let names: Vec<_> = sink.got.lock().unwrap().iter().map(|(n, _)| n.clone()).collect();
        assert_eq!(names, vec!["one.txt", "three.txt"]);
    }

    #[test]
    fn name_and_keyword_together_keep_scanning() {
        let records = vec![sealed("dup", "has KEY", "pw"), sealed("dup", "has KEY too", "pw")];
        let q = SearchQuery::new(Some("dup".into()), Some("KEY".into())).unwrap();
        let sink = MemSink::default();
        let out = SearchEngine::new(&q, "pw", &sink).scan("p0", records.into_iter().map(Ok));
        assert!(!out.stopped);
        assert_eq!(out.stats.emitted, 2);
    }

    #[test]
    fn wrong_password_skips_without_output() {
        let q = SearchQuery::new(None, Some("a".into())).unwrap();
        let sink = MemSink::default();
        let out = SearchEngine::new(&q, "wrong", &sink).scan("p0", abc().into_iter().map(Ok));
        assert_eq!(out.stats.rejected, 3);
        assert!(sink.got.lock().unwrap().is_empty());
        assert!(!out.stopped && !out.corrupt);
    }

    #[test]
    fn corrupt_record_abandons_partition() {
        let q = SearchQuery::new(None, Some("a".into())).unwrap();
        let sink = MemSink::default();
        let items = vec![
            Ok(sealed("a.txt", "alpha", "pw")),
            Err(SarError::corrupt("bad header")),
            Ok(sealed("b.txt", "banana", "pw")),
        ];
        let out = SearchEngine::new(&q, "pw", &sink).scan("p0", items);
        assert!(out.corrupt);
        assert_eq!(out.stats.scanned, 1);
        assert_eq!(out.stats.emitted, 1);
    }

    #[test]
    fn failed_write_does_not_stop_name_search() {
        let q = SearchQuery::new(Some("b.txt".into()), None).unwrap();
        let out = SearchEngine::new(&q, "pw", &FailingSink).scan("p0", abc().into_iter().map(Ok));
        assert!(!out.stopped);
        assert_eq!(out.stats.failed, 1);
        assert_eq!(out.stats.filtered_out, 2);
    }

    #[test]
    fn undecodable_record_is_skipped() {
        let mut bad = sealed("a.txt", "alpha", "pw");
        bad.payload = b"@@@@".to_vec();
        let q = SearchQuery::new(None, Some("l".into())).unwrap();
        let sink = MemSink::default();
        let out = SearchEngine::new(&q, "pw", &sink)
            .scan("p0", vec![Ok(bad), Ok(sealed("c.txt", "charlie", "pw"))]);
        assert_eq!(out.stats.failed, 1);
        assert_eq!(out.stats.emitted, 1);
    }
}
