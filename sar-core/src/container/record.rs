use crate::error::{Result, SarError};
use std::io::{ErrorKind, Read, Write};

/// Largest string a record header can carry (unsigned 16-bit length prefix).
pub const MAX_STR_LEN: usize = u16::MAX as usize;

/// Largest exactly representable integer in the float64 size field.
const MAX_EXACT_SIZE: f64 = 9_007_199_254_740_992.0; // 2^53

/// One archived file.
///
/// Layout on disk (all big-endian):
/// `locked:u8 | compressed:u8 | fingerprint:str16 | salt:str16 | filename:str16 |
///  file_size:f64 | payload_len:i32 | payload`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArchiveRecord {
    pub filename: String,
    /// Byte length of the original plaintext.
    pub file_size: u64,
    pub locked: bool,
    pub compressed: bool,
    /// Hex SHA-256 of the password; non-empty iff `locked`.
    pub key_fingerprint: String,
    /// Reserved. Empty unless the record was sealed with a per-record IV.
    pub salt: String,
    pub payload: Vec<u8>,
}

impl ArchiveRecord {
    /// Raw, untransformed record as produced by ingestion.
    pub fn plain(filename: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            file_size: payload.len() as u64,
            payload,
            ..Default::default()
        }
    }

    /// Serialize into `w`, returning the number of bytes written.
    pub fn write_to(&self, mut w: impl Write) -> Result<u64> {
        let payload_len = i32::try_from(self.payload.len()).map_err(|_| {
            SarError::transform(format!(
                "{}: payload of {} bytes exceeds record limit",
                self.filename,
                self.payload.len()
            ))
        })?;

        let mut n = 0u64;
        w.write_all(&[self.locked as u8, self.compressed as u8])?;
        n += 2;
        n += put_str(&mut w, &self.key_fingerprint)?;
        n += put_str(&mut w, &self.salt)?;
        n += put_str(&mut w, &self.filename)?;
        w.write_all(&(self.file_size as f64).to_be_bytes())?;
        w.write_all(&payload_len.to_be_bytes())?;
        w.write_all(&self.payload)?;
        n += 8 + 4 + self.payload.len() as u64;
        Ok(n)
    }

    /// Read the next record. `Ok(None)` on a clean end of stream (no bytes left
    /// before the first header byte); a stream that ends anywhere else is corrupt.
    pub fn read_from(mut r: impl Read) -> Result<Option<Self>> {
        let mut first = [0u8; 1];
        loop {
            match r.read(&mut first) {
                Ok(0) => return Ok(None),
                Ok(_) => break,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        let locked = flag(first[0], "locked")?;

        let mut b = [0u8; 1];
        fill(&mut r, &mut b, "compressed flag")?;
        let compressed = flag(b[0], "compressed")?;

        let key_fingerprint = get_str(&mut r, "key fingerprint")?;
        let salt = get_str(&mut r, "salt")?;
        let filename = get_str(&mut r, "filename")?;

        let mut f8 = [0u8; 8];
        fill(&mut r, &mut f8, "file size")?;
        let size = f64::from_be_bytes(f8);
        if !size.is_finite() || size < 0.0 || size.fract() != 0.0 || size > MAX_EXACT_SIZE {
            return Err(SarError::corrupt(format!(
                "{filename}: invalid file size {size}"
            )));
        }

        let mut l4 = [0u8; 4];
        fill(&mut r, &mut l4, "payload length")?;
        let len = i32::from_be_bytes(l4);
        if len < 0 {
            return Err(SarError::corrupt(format!(
                "{filename}: negative payload length {len}"
            )));
        }

        // Bounded read: a garbage length must not turn into a huge allocation.
        let mut payload = Vec::new();
        (&mut r).take(len as u64).read_to_end(&mut payload)?;
        if payload.len() != len as usize {
            return Err(SarError::corrupt(format!(
                "{filename}: payload truncated ({} of {len} bytes)",
                payload.len()
            )));
        }

        if locked && key_fingerprint.is_empty() {
            return Err(SarError::corrupt(format!(
                "{filename}: locked record without key fingerprint"
            )));
        }

        Ok(Some(Self {
            filename,
            file_size: size as u64,
            locked,
            compressed,
            key_fingerprint,
            salt,
            payload,
        }))
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Decode exactly one record; trailing bytes are an error.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let mut cur = buf;
        let rec = Self::read_from(&mut cur)?
            .ok_or_else(|| SarError::corrupt("empty record buffer"))?;
        if !cur.is_empty() {
            return Err(SarError::corrupt(format!(
                "{} trailing bytes after record",
                cur.len()
            )));
        }
        Ok(rec)
    }

    pub fn encoded_len(&self) -> usize {
        2 + 2
            + self.key_fingerprint.len()
            + 2
            + self.salt.len()
            + 2
            + self.filename.len()
            + 8
            + 4
            + self.payload.len()
    }
}

impl std::fmt::Display for ArchiveRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}  {} bytes  locked={} compressed={}",
            self.filename, self.file_size, self.locked, self.compressed
        )
    }
}

fn put_str(w: &mut impl Write, s: &str) -> Result<u64> {
    if s.len() > MAX_STR_LEN {
        return Err(SarError::transform(format!(
            "string field of {} bytes exceeds {MAX_STR_LEN}",
            s.len()
        )));
    }
    w.write_all(&(s.len() as u16).to_be_bytes())?;
    w.write_all(s.as_bytes())?;
    Ok(2 + s.len() as u64)
}

fn get_str(r: &mut impl Read, what: &str) -> Result<String> {
    let mut l2 = [0u8; 2];
    fill(r, &mut l2, what)?;
    let mut buf = vec![0u8; u16::from_be_bytes(l2) as usize];
    fill(r, &mut buf, what)?;
    String::from_utf8(buf).map_err(|e| SarError::corrupt(format!("{what}: {e}")))
}

fn fill(r: &mut impl Read, buf: &mut [u8], what: &str) -> Result<()> {
    r.read_exact(buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            SarError::corrupt(format!("truncated while reading {what}"))
        } else {
            SarError::Io(e)
        }
    })
}

fn flag(b: u8, what: &str) -> Result<bool> {
    match b {
        0 => Ok(false),
        1 => Ok(true),
        x => Err(SarError::corrupt(format!("{what} flag has value {x:#04x}"))),
    }
}
