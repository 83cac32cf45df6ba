//! Shared fixtures for integration tests: synthetic container images and
//! a scripted stand-in for the Speex library.

use std::cell::Cell;

use spx2wav::speex::{CodecError, CodecResult, SpeexCodec, SpeexFrameDecoder};

/// Build a container image from header fields and frame payloads.
pub fn build_container(
    decoded_size: u32,
    mode_id: i32,
    samples_per_frame: u16,
    frames: &[&[u8]],
) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"VOX01");
    data.extend_from_slice(&decoded_size.to_le_bytes());
    data.extend_from_slice(&mode_id.to_le_bytes());
    data.extend_from_slice(&samples_per_frame.to_le_bytes());
    for frame in frames {
        data.push(frame.len() as u8);
        data.extend_from_slice(frame);
    }
    data
}

/// Codec recognizing a single mode id; every decoded frame is a 1-based
/// ramp, so frame 0 of 4 samples becomes `[1, 2, 3, 4]` and frame 1
/// continues `[5, 6, 7, 8]`.
pub struct RampCodec {
    pub mode_id: i32,
    pub opened: Cell<usize>,
}

impl RampCodec {
    pub fn new(mode_id: i32) -> Self {
        Self {
            mode_id,
            opened: Cell::new(0),
        }
    }

    /// The full ramp a container of `frames` frames decodes to.
    pub fn expected_samples(frames: usize, samples_per_frame: usize) -> Vec<i16> {
        (0..frames * samples_per_frame)
            .map(|n| (n + 1) as i16)
            .collect()
    }
}

impl SpeexCodec for RampCodec {
    fn name(&self) -> &'static str {
        "ramp"
    }

    fn open_decoder(&self, mode_id: i32) -> CodecResult<Box<dyn SpeexFrameDecoder>> {
        if mode_id != self.mode_id {
            return Err(CodecError::UnsupportedMode(mode_id));
        }
        self.opened.set(self.opened.get() + 1);
        Ok(Box::new(RampDecoder { frame: 0 }))
    }
}

struct RampDecoder {
    frame: usize,
}

impl SpeexFrameDecoder for RampDecoder {
    fn decode_frame(&mut self, _frame: &[u8], out: &mut [i16]) -> CodecResult<()> {
        let len = out.len();
        for (i, sample) in out.iter_mut().enumerate() {
            *sample = (self.frame * len + i + 1) as i16;
        }
        self.frame += 1;
        Ok(())
    }
}
