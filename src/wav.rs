//! WAV (RIFF WAVE) serialization.
//!
//! Emits the canonical 44-byte header followed by raw little-endian
//! 16-bit PCM: one `fmt ` chunk, one `data` chunk, format tag 1 (PCM).
//! That is the whole universe of files this converter produces, so there
//! is no support for other formats or extra chunks.

use std::fs;
use std::path::Path;

use crate::error::{ConvertError, Result};

// Chunk identifiers in on-disk byte order.
const RIFF_ID: &[u8; 4] = b"RIFF";
const WAVE_ID: &[u8; 4] = b"WAVE";
const FMT_ID: &[u8; 4] = b"fmt ";
const DATA_ID: &[u8; 4] = b"data";

/// Format tag for plain PCM in the fmt chunk.
const WAVE_FORMAT_PCM: u16 = 1;
/// The writer serializes `i16` samples; the width is fixed.
const BITS_PER_SAMPLE: u16 = 16;
/// fmt chunk payload size for plain PCM.
const FMT_CHUNK_LEN: u32 = 16;

/// Output format parameters carried in the fmt chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavParams {
    pub channels: u16,
    pub sample_rate: u32,
}

impl WavParams {
    /// Bytes per sample frame across all channels.
    fn block_align(&self) -> u16 {
        self.channels * (BITS_PER_SAMPLE / 8)
    }

    /// Bytes per second of audio.
    fn byte_rate(&self) -> u32 {
        self.sample_rate * u32::from(self.block_align())
    }
}

/// data chunk length for `sample_count` 16-bit samples, if a RIFF header
/// can describe it. Chunk and file lengths are 32-bit fields; a payload
/// past that has no well-formed encoding and is refused outright.
fn data_chunk_len(sample_count: usize) -> Result<u32> {
    sample_count
        .checked_mul(2)
        .and_then(|bytes| u32::try_from(bytes).ok())
        .filter(|&len| len <= u32::MAX - 36) // riff length is 36 + data length
        .ok_or(ConvertError::PayloadTooLarge {
            samples: sample_count,
        })
}

/// Serialize `samples` into a complete in-memory WAV image.
///
/// A zero-sample input still yields a valid 44-byte file with an empty
/// data chunk.
pub fn encode(params: &WavParams, samples: &[i16]) -> Result<Vec<u8>> {
    let data_len = data_chunk_len(samples.len())?;
    let riff_len = 4 + (8 + FMT_CHUNK_LEN) + (8 + data_len);

    let mut out = Vec::with_capacity(44 + samples.len() * 2);
    out.extend_from_slice(RIFF_ID);
    out.extend_from_slice(&riff_len.to_le_bytes());
    out.extend_from_slice(WAVE_ID);

    out.extend_from_slice(FMT_ID);
    out.extend_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
    out.extend_from_slice(&WAVE_FORMAT_PCM.to_le_bytes());
    out.extend_from_slice(&params.channels.to_le_bytes());
    out.extend_from_slice(&params.sample_rate.to_le_bytes());
    out.extend_from_slice(&params.byte_rate().to_le_bytes());
    out.extend_from_slice(&params.block_align().to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    out.extend_from_slice(DATA_ID);
    out.extend_from_slice(&data_len.to_le_bytes());
    for &sample in samples {
        out.extend_from_slice(&sample.to_le_bytes());
    }
    Ok(out)
}

/// Serialize and write the whole file in one operation.
///
/// The image is assembled in memory first, so the file either appears
/// with its final contents or the call fails with a `Write` error; this
/// function never reports success for a half-written file.
pub fn write_file(path: &Path, params: &WavParams, samples: &[i16]) -> Result<()> {
    let image = encode(params, samples)?;
    fs::write(path, image).map_err(|source| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    })
}
