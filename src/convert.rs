//! The conversion pipeline.
//!
//! One linear pass: parse the header, bring up a decoder for the
//! container's mode, decode every frame in order into the accumulator,
//! release the decoder, then serialize the WAV. Any failure aborts the
//! whole run; nothing is retried and no partial output is reported as
//! success.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::container::{Container, ContainerHeader};
use crate::error::{ConvertError, Result};
use crate::pcm::PcmBuffer;
use crate::speex::{CodecError, SpeexCodec};
use crate::wav::{self, WavParams};

/// Channel count of every file this container family produces.
pub const OUTPUT_CHANNELS: u16 = 1;

/// Output sample rate. The containers carry ultra-wideband Speex, which
/// is the 32 kHz family; the rate is fixed by that convention rather
/// than read from the header.
pub const OUTPUT_SAMPLE_RATE: u32 = 32_000;

/// Everything a finished conversion can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Compressed frames consumed.
    pub frames: usize,
    /// Decoded samples written to the WAV payload.
    pub samples: usize,
    /// The header's decoded-size hint, in bytes.
    pub declared_bytes: u32,
    /// Actual decoded payload size, in bytes.
    pub decoded_bytes: usize,
}

impl Summary {
    /// True when the header's size hint disagrees with the real output.
    pub fn size_hint_mismatch(&self) -> bool {
        self.declared_bytes as usize != self.decoded_bytes
    }
}

/// Result of draining one container through a decoder.
#[derive(Debug)]
pub struct DecodedAudio {
    pub header: ContainerHeader,
    pub pcm: PcmBuffer,
    pub frames: usize,
}

impl DecodedAudio {
    pub fn summary(&self) -> Summary {
        Summary {
            frames: self.frames,
            samples: self.pcm.len(),
            declared_bytes: self.header.decoded_size,
            decoded_bytes: self.pcm.byte_len(),
        }
    }
}

/// Decode every frame of `data` through `codec`.
///
/// Decoder state lives exactly as long as this function: it is created
/// after a successful mode lookup and released on return, whether the
/// return is `Ok` or an early `?`.
pub fn decode_container(data: &[u8], codec: &dyn SpeexCodec) -> Result<DecodedAudio> {
    let container = Container::parse(data)?;
    let header = *container.header();
    debug!(
        codec = codec.name(),
        mode_id = header.mode_id,
        samples_per_frame = header.samples_per_frame,
        declared_bytes = header.decoded_size,
        "parsed container header"
    );

    let mut decoder = codec.open_decoder(header.mode_id).map_err(|e| match e {
        CodecError::UnsupportedMode(id) => ConvertError::UnsupportedMode(id),
        other => ConvertError::DecoderSetup(other),
    })?;

    let mut pcm = PcmBuffer::with_capacity_hint(header.decoded_size);
    let mut block = vec![0i16; usize::from(header.samples_per_frame)];
    let mut frames = 0usize;
    for (index, frame) in container.frames().enumerate() {
        let frame = frame?;
        decoder
            .decode_frame(frame, &mut block)
            .map_err(|source| ConvertError::Decode { index, source })?;
        pcm.append_block(&block);
        frames += 1;
    }

    if pcm.byte_len() != header.decoded_size as usize {
        // Known quirk of these containers: the header's size hint drifts
        // from the real decoded size. Surface it, never act on it.
        warn!(
            declared = header.decoded_size,
            actual = pcm.byte_len(),
            "decoded size differs from header hint"
        );
    }

    Ok(DecodedAudio {
        header,
        pcm,
        frames,
    })
}

/// Convert an in-memory container and write the WAV to `output`.
pub fn convert(data: &[u8], codec: &dyn SpeexCodec, output: &Path) -> Result<Summary> {
    let decoded = decode_container(data, codec)?;
    let params = WavParams {
        channels: OUTPUT_CHANNELS,
        sample_rate: OUTPUT_SAMPLE_RATE,
    };
    wav::write_file(output, &params, decoded.pcm.samples())?;
    debug!(
        frames = decoded.frames,
        samples = decoded.pcm.len(),
        path = %output.display(),
        "wav written"
    );
    Ok(decoded.summary())
}

/// Read `input`, convert it, and write the WAV to `output`.
pub fn convert_file(input: &Path, output: &Path, codec: &dyn SpeexCodec) -> Result<Summary> {
    let data = fs::read(input).map_err(|source| ConvertError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    convert(&data, codec, output)
}
