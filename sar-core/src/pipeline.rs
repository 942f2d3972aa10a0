//! Record transforms: compress then encrypt on the way in, decrypt then
//! decompress on the way out.

use crate::codec::{self, CodecId};
use crate::container::record::ArchiveRecord;
use crate::crypto::fingerprint;
use crate::crypto::legacy::{self, CipherKey, IvMode};
use crate::error::{Result, SarError};
use tracing::debug;

#[derive(Clone, Debug)]
pub struct SealOptions {
    pub compress: bool,
    pub encrypt: bool,
    pub password: String,
    pub codec: CodecId,
    pub iv_mode: IvMode,
}

impl Default for SealOptions {
    fn default() -> Self {
        Self {
            compress: false,
            encrypt: false,
            password: crate::config::DEFAULT_KEY.to_string(),
            codec: CodecId::default(),
            iv_mode: IvMode::default(),
        }
    }
}

/// Turn raw file bytes into a sealed record.
pub fn seal_record(raw: Vec<u8>, filename: &str, opts: &SealOptions) -> Result<ArchiveRecord> {
    let file_size = raw.len() as u64;

    let body = if opts.compress {
        let c = codec::compress_bytes(opts.codec, &raw)?;
        debug!(filename, len = c.len(), "compressed");
        c
    } else {
        raw
    };

    let (payload, key_fingerprint, salt) = if opts.encrypt {
        let key = CipherKey::from_password(&opts.password);
        let (iv, salt) = opts.iv_mode.next_iv()?;
        let text = legacy::encrypt(&key, &iv, &body);
        debug!(filename, len = text.len(), "encrypted");
        (text, fingerprint::fingerprint(&opts.password), salt)
    } else {
        (body, String::new(), String::new())
    };

    Ok(ArchiveRecord {
        filename: filename.to_string(),
        file_size,
        locked: opts.encrypt,
        compressed: opts.compress,
        key_fingerprint,
        salt,
        payload,
    })
}

/// Recover the original bytes of a record.
///
/// For locked records the password fingerprint is checked first; a mismatch
/// returns [`SarError::PasswordMismatch`] without touching the ciphertext.
pub fn open_record(record: &ArchiveRecord, password: &str) -> Result<Vec<u8>> {
    let body = if record.locked {
        if !fingerprint::verify(password, &record.key_fingerprint) {
            return Err(SarError::PasswordMismatch {
                filename: record.filename.clone(),
            });
        }
        let key = CipherKey::from_password(password);
        let iv = legacy::iv_from_salt(&record.salt)?;
        legacy::decrypt(&key, &iv, &record.payload)?
    } else {
        record.payload.clone()
    };

    let plain = if record.compressed {
        codec::decompress_bytes(&body, record.file_size).map_err(|e| match e {
            SarError::Transform(m) => SarError::Transform(format!("{}: {m}", record.filename)),
            other => other,
        })?
    } else {
        body
    };

    if plain.len() as u64 != record.file_size {
        return Err(SarError::transform(format!(
            "{}: decoded {} bytes, header says {}",
            record.filename,
            plain.len(),
            record.file_size
        )));
    }
    Ok(plain)
}
