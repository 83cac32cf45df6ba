//! Conversion failure taxonomy.
//!
//! Every failure here is fatal: the pipeline stops at the first error and
//! the CLI reports it with a non-zero exit. There is no retry path and no
//! partial-output mode.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::speex::CodecError;

/// Errors surfaced by the container-to-WAV pipeline.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Input ends before the fixed-size container header does.
    #[error("truncated header: {len} of {expected} header bytes present")]
    TruncatedHeader { len: usize, expected: usize },

    /// A frame's length prefix points past the end of the input.
    #[error("truncated frame {index}: length prefix declares {declared} bytes, {remaining} remain")]
    TruncatedFrame {
        index: usize,
        declared: usize,
        remaining: usize,
    },

    /// The container names a codec mode the decoder does not recognize.
    #[error("unsupported speex mode id {0}")]
    UnsupportedMode(i32),

    /// Mode lookup succeeded but decoder state could not be brought up.
    #[error("decoder setup failed")]
    DecoderSetup(#[source] CodecError),

    /// The decoder rejected one frame's bitstream; the run aborts.
    #[error("decode failed on frame {index}")]
    Decode {
        index: usize,
        #[source]
        source: CodecError,
    },

    /// The decoded PCM exceeds what a RIFF chunk's 32-bit length can
    /// describe, so no well-formed WAV file exists for it.
    #[error("decoded payload of {samples} samples exceeds the wav format limit")]
    PayloadTooLarge { samples: usize },

    /// The input file could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output file could not be created or written.
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConvertError>;
