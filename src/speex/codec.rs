//! Decoder capability seam.
//!
//! The conversion pipeline drives Speex through these two traits and never
//! looks inside the codec: mode resolution and state allocation happen in
//! [`SpeexCodec::open_decoder`], per-frame work in
//! [`SpeexFrameDecoder::decode_frame`]. The native libspeex binding lives
//! in `super::native`; tests substitute scripted implementations.

use thiserror::Error;

/// Errors reported by a codec implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The mode id is not one the codec recognizes.
    #[error("unrecognized speex mode id {0}")]
    UnsupportedMode(i32),

    /// Mode lookup succeeded but decoder state could not be allocated.
    #[error("decoder allocation failed for mode id {0}")]
    DecoderInit(i32),

    /// The container's samples-per-frame disagrees with the mode's own
    /// frame size.
    #[error("container wants {container} samples per frame, mode produces {mode}")]
    FrameSize { container: usize, mode: usize },

    /// The decoder rejected a frame's bitstream content.
    #[error("decoder rejected bitstream (status {0})")]
    Rejected(i32),
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// A Speex implementation capable of opening decoders.
pub trait SpeexCodec {
    /// Implementation name, for logs.
    fn name(&self) -> &'static str;

    /// Resolve `mode_id` and allocate decoder state for it.
    ///
    /// Mode lookup comes first: an unrecognized id fails with
    /// [`CodecError::UnsupportedMode`] before any decoder state exists.
    fn open_decoder(&self, mode_id: i32) -> CodecResult<Box<dyn SpeexFrameDecoder>>;
}

/// Decoder state for one conversion run.
///
/// Implementations own whatever staging the bitstream needs and may reuse
/// it across frames. Native resources are released on drop.
pub trait SpeexFrameDecoder {
    /// Decode one compressed frame into `out`, filling it completely.
    fn decode_frame(&mut self, frame: &[u8], out: &mut [i16]) -> CodecResult<()>;
}
