use super::{CodecId, Compressor};
use crate::error::Result;
use std::io::{Read, Write};

pub const MAGIC: [u8; 4] = [0x28, 0xb5, 0x2f, 0xfd];

const LEVEL: i32 = 3;

pub struct ZstdCompressor;

impl Compressor for ZstdCompressor {
    fn id(&self) -> CodecId {
        CodecId::Zstd
    }
    fn compress(&self, src: &mut dyn Read, dst: &mut dyn Write) -> Result<u64> {
        let mut enc = zstd::stream::Encoder::new(dst, LEVEL)?;
        let written_uncompressed = std::io::copy(src, &mut enc)?;
        enc.finish()?;
        Ok(written_uncompressed)
    }

    fn decompress(&self, src: &mut dyn Read, dst: &mut dyn Write, limit: u64) -> Result<u64> {
        let dec = zstd::stream::Decoder::new(src)?;
        let written_uncompressed = std::io::copy(&mut dec.take(limit), dst)?;
        Ok(written_uncompressed)
    }
}
