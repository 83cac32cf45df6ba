//! Convert proprietary Speex voice containers to standard PCM WAV.
//!
//! The container is a 15-byte fixed header followed by length-prefixed
//! Speex frames (see [`container`]). Decoding happens behind the narrow
//! seam in [`speex`]; decoded samples accumulate in [`pcm`] and
//! serialize through [`wav`]. [`convert`] wires the whole pipeline
//! together in one pass.

pub mod container;
pub mod convert;
pub mod error;
pub mod pcm;
pub mod speex;
pub mod wav;

pub use container::{Container, ContainerHeader, Frames, HEADER_LEN};
pub use convert::{convert_file, Summary, OUTPUT_CHANNELS, OUTPUT_SAMPLE_RATE};
pub use error::{ConvertError, Result};
