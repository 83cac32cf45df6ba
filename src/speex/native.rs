//! libspeex binding.
//!
//! Hand-written declarations against the system library; no Speex DSP is
//! reimplemented on this side of the boundary. [`LibSpeex`] resolves a
//! mode and allocates decoder state; [`NativeDecoder`] owns that state
//! plus the `SpeexBits` staging buffer for the whole run and releases
//! both exactly once on drop.

use std::mem;
use std::ptr::NonNull;

use libc::{c_char, c_int, c_void};

use super::codec::{CodecError, CodecResult, SpeexCodec, SpeexFrameDecoder};

/// Narrowband mode id (8 kHz).
pub const SPEEX_MODEID_NB: i32 = 0;
/// Wideband mode id (16 kHz).
pub const SPEEX_MODEID_WB: i32 = 1;
/// Ultra-wideband mode id (32 kHz), the mode these containers carry.
pub const SPEEX_MODEID_UWB: i32 = 2;

/// `speex_decoder_ctl` request: decoded samples per frame.
const SPEEX_GET_FRAME_SIZE: c_int = 3;

/// Opaque mode descriptor owned by libspeex.
#[repr(C)]
pub struct SpeexMode {
    _private: [u8; 0],
}

/// Bit-level cursor over one frame of compressed data.
///
/// Mirrors `SpeexBits` from `<speex/speex_bits.h>`; field order and
/// types must match the C definition exactly.
#[repr(C)]
struct SpeexBits {
    chars: *mut c_char,
    nb_bits: c_int,
    char_ptr: c_int,
    bit_ptr: c_int,
    owner: c_int,
    overflow: c_int,
    buf_size: c_int,
    reserved1: c_int,
    reserved2: *mut c_void,
}

#[link(name = "speex")]
extern "C" {
    fn speex_lib_get_mode(mode: c_int) -> *const SpeexMode;
    fn speex_decoder_init(mode: *const SpeexMode) -> *mut c_void;
    fn speex_decoder_destroy(state: *mut c_void);
    fn speex_decoder_ctl(state: *mut c_void, request: c_int, ptr: *mut c_void) -> c_int;
    fn speex_bits_init(bits: *mut SpeexBits);
    fn speex_bits_destroy(bits: *mut SpeexBits);
    fn speex_bits_read_from(bits: *mut SpeexBits, bytes: *const c_char, len: c_int);
    fn speex_decode_int(state: *mut c_void, bits: *mut SpeexBits, out: *mut i16) -> c_int;
}

/// The system libspeex, exposed through the codec seam.
pub struct LibSpeex;

impl SpeexCodec for LibSpeex {
    fn name(&self) -> &'static str {
        "libspeex"
    }

    fn open_decoder(&self, mode_id: i32) -> CodecResult<Box<dyn SpeexFrameDecoder>> {
        // Mode lookup first; no decoder state exists until the id resolves.
        let mode = unsafe { speex_lib_get_mode(mode_id as c_int) };
        if mode.is_null() {
            return Err(CodecError::UnsupportedMode(mode_id));
        }

        let state = NonNull::new(unsafe { speex_decoder_init(mode) })
            .ok_or(CodecError::DecoderInit(mode_id))?;

        let mut decoder = Box::new(NativeDecoder {
            state,
            bits: unsafe { mem::zeroed() },
            frame_size: 0,
        });
        unsafe {
            speex_bits_init(&mut decoder.bits);
            let mut frame_size: c_int = 0;
            let status = speex_decoder_ctl(
                decoder.state.as_ptr(),
                SPEEX_GET_FRAME_SIZE,
                &mut frame_size as *mut c_int as *mut c_void,
            );
            // The early return drops `decoder`, which releases the state
            // and bits it already owns.
            if status != 0 || frame_size <= 0 {
                return Err(CodecError::DecoderInit(mode_id));
            }
            decoder.frame_size = frame_size as usize;
        }
        Ok(decoder)
    }
}

/// Live decoder state plus the staging bits for one conversion run.
struct NativeDecoder {
    state: NonNull<c_void>,
    bits: SpeexBits,
    /// Samples the mode writes per decode call, from SPEEX_GET_FRAME_SIZE.
    frame_size: usize,
}

impl SpeexFrameDecoder for NativeDecoder {
    fn decode_frame(&mut self, frame: &[u8], out: &mut [i16]) -> CodecResult<()> {
        // speex_decode_int always writes the mode's full frame; refuse an
        // output buffer of any other size rather than let it write past
        // the end.
        if out.len() != self.frame_size {
            return Err(CodecError::FrameSize {
                container: out.len(),
                mode: self.frame_size,
            });
        }

        unsafe {
            speex_bits_read_from(
                &mut self.bits,
                frame.as_ptr() as *const c_char,
                frame.len() as c_int,
            );
            let status = speex_decode_int(self.state.as_ptr(), &mut self.bits, out.as_mut_ptr());
            if status != 0 {
                return Err(CodecError::Rejected(status));
            }
        }
        Ok(())
    }
}

impl Drop for NativeDecoder {
    fn drop(&mut self) {
        unsafe {
            speex_decoder_destroy(self.state.as_ptr());
            speex_bits_destroy(&mut self.bits);
        }
    }
}
