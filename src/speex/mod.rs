//! Speex decoding seam.
//!
//! `codec` defines the narrow interface the pipeline drives; `native`
//! binds it to the system libspeex when the `libspeex` feature is on.
//! The DSP itself always lives on the far side of that boundary.

pub mod codec;
#[cfg(feature = "libspeex")]
pub mod native;

pub use codec::{CodecError, CodecResult, SpeexCodec, SpeexFrameDecoder};
#[cfg(feature = "libspeex")]
pub use native::LibSpeex;
