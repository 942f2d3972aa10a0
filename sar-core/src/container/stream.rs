use super::record::ArchiveRecord;
use crate::error::Result;
use crate::storage::Storage;
use std::io::Read;
use std::path::Path;

/// Sequential reader over a container. Yields records until a clean end of
/// stream; after the first error it yields nothing more.
pub struct RecordStream<R: Read> {
    r: R,
    done: bool,
}

impl<R: Read> RecordStream<R> {
    pub fn new(r: R) -> Self {
        Self { r, done: false }
    }
}

impl<R: Read> Iterator for RecordStream<R> {
    type Item = Result<ArchiveRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match ArchiveRecord::read_from(&mut self.r) {
            Ok(Some(rec)) => Some(Ok(rec)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

pub fn open_stream(
    storage: &dyn Storage,
    path: &Path,
) -> Result<RecordStream<Box<dyn Read + Send>>> {
    Ok(RecordStream::new(storage.open(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SarError;

    #[test]
    fn stops_after_corruption() {
        let mut buf = Vec::new();
        ArchiveRecord::plain("a", b"1".to_vec())
            .write_to(&mut buf)
            .unwrap();
        ArchiveRecord::plain("b", b"22".to_vec())
            .write_to(&mut buf)
            .unwrap();
        buf.truncate(buf.len() - 1);

        let mut s = RecordStream::new(&buf[..]);
        assert_eq!(s.next().unwrap().unwrap().filename, "a");
        assert!(matches!(s.next(), Some(Err(SarError::CorruptRecord(_)))));
        assert!(s.next().is_none());
    }

    #[test]
    fn empty_container_has_no_records() {
        assert_eq!(RecordStream::new(&b""[..]).count(), 0);
    }
}
