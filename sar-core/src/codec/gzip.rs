use super::{CodecId, Compressor};
use crate::error::Result;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::io::{Read, Write};

pub const MAGIC: [u8; 2] = [0x1f, 0x8b];

pub struct GzipCompressor;

impl Compressor for GzipCompressor {
    fn id(&self) -> CodecId {
        CodecId::Gzip
    }

    fn compress(&self, src: &mut dyn Read, dst: &mut dyn Write) -> Result<u64> {
        let mut enc = GzEncoder::new(dst, Compression::default());
        let written_uncompressed = std::io::copy(src, &mut enc)?;
        enc.finish()?;
        Ok(written_uncompressed)
    }

    fn decompress(&self, src: &mut dyn Read, dst: &mut dyn Write, limit: u64) -> Result<u64> {
        let dec = GzDecoder::new(src);
        let written_uncompressed = std::io::copy(&mut dec.take(limit), dst)?;
        Ok(written_uncompressed)
    }
}
