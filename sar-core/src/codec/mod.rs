use crate::error::{Result, SarError};
use std::io::{Read, Write};

#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CodecId {
    /// Legacy archives are gzip; this stays the default.
    #[default]
    Gzip = 1,
    Zstd = 2,
}

impl CodecId {
    /// Identify a compressed frame by its magic bytes.
    pub fn detect(buf: &[u8]) -> Option<Self> {
        if buf.starts_with(&gzip::MAGIC) {
            Some(CodecId::Gzip)
        } else if buf.starts_with(&zstdc::MAGIC) {
            Some(CodecId::Zstd)
        } else {
            None
        }
    }
}

impl std::str::FromStr for CodecId {
    type Err = SarError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gzip" | "gz" => Ok(CodecId::Gzip),
            "zstd" | "zst" => Ok(CodecId::Zstd),
            other => Err(SarError::Argument(format!("unknown codec: {other}"))),
        }
    }
}

pub trait Compressor: Send + Sync {
    fn id(&self) -> CodecId;
    fn compress(&self, src: &mut dyn Read, dst: &mut dyn Write) -> Result<u64>;
    /// Writes at most `limit` bytes of output.
    fn decompress(&self, src: &mut dyn Read, dst: &mut dyn Write, limit: u64) -> Result<u64>;
}

pub fn compressor(id: CodecId) -> &'static dyn Compressor {
    match id {
        CodecId::Gzip => &gzip::GzipCompressor,
        CodecId::Zstd => &zstdc::ZstdCompressor,
    }
}

/// Compress a whole buffer into one frame.
pub fn compress_bytes(id: CodecId, plain: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(plain.len() / 2 + 64);
    compressor(id).compress(&mut &plain[..], &mut out)?;
    Ok(out)
}

/// Decompress one frame, picking the codec from its magic. Output past
/// `max_len` bytes is never produced; such a frame is a transform error.
pub fn decompress_bytes(frame: &[u8], max_len: u64) -> Result<Vec<u8>> {
    let id = CodecId::detect(frame)
        .ok_or_else(|| SarError::transform("unrecognized compression frame"))?;
    let cap = (frame.len() as u64 * 2).min(max_len.saturating_add(1));
    let mut out = Vec::with_capacity(cap as usize);
    let n = compressor(id).decompress(&mut &frame[..], &mut out, max_len.saturating_add(1))?;
    if n > max_len {
        return Err(SarError::transform(format!("frame inflates past {max_len} bytes")));
    }
    Ok(out)
}

pub mod gzip;
pub mod zstdc;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn codec() -> impl Strategy<Value = CodecId> {
        prop_oneof![Just(CodecId::Gzip), Just(CodecId::Zstd)]
    }

    proptest! {
        #[test]
        fn decompress_inverts_compress(
            id in codec(),
            plain in prop::collection::vec(any::<u8>(), 0..4096),
        ) {
            let frame = compress_bytes(id, &plain).unwrap();
            prop_assert_eq!(CodecId::detect(&frame), Some(id));
            prop_assert_eq!(decompress_bytes(&frame, plain.len() as u64).unwrap(), plain);
        }
    }

    #[test]
    fn both_codecs_shrink_text() {
        let text = b"Q3 results: revenue up 12%\n".repeat(50);
        for id in [CodecId::Gzip, CodecId::Zstd] {
            assert_eq!(compressor(id).id(), id);
            let frame = compress_bytes(id, &text).unwrap();
            assert!(frame.len() < text.len());
        }
    }

    #[test]
    fn empty_input_still_makes_a_frame() {
        let frame = compress_bytes(CodecId::Gzip, b"").unwrap();
        assert!(decompress_bytes(&frame, 0).unwrap().is_empty());
    }

    #[test]
    fn inflation_stops_at_the_limit() {
        let bomb = vec![0u8; 8 << 20];
        for id in [CodecId::Gzip, CodecId::Zstd] {
            let frame = compress_bytes(id, &bomb).unwrap();
            assert!(frame.len() < 64 * 1024);
            let err = decompress_bytes(&frame, 1).unwrap_err();
            assert!(matches!(err, SarError::Transform(_)), "{err}");
            let mut sink = Vec::new();
            let n = compressor(id).decompress(&mut &frame[..], &mut sink, 2).unwrap();
            assert_eq!(n, 2);
            assert_eq!(sink.len(), 2);
        }
    }

    #[test]
    fn unknown_frame_is_a_transform_error() {
        assert!(matches!(
            decompress_bytes(b"plain text", 100),
            Err(SarError::Transform(_))
        ));
        assert!("lz4".parse::<CodecId>().is_err());
        assert_eq!("ZSTD".parse::<CodecId>().unwrap(), CodecId::Zstd);
    }
}
