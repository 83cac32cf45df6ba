//! Decoded-sample accumulator.

/// Largest pre-allocation a size hint may request, in bytes. Headers are
/// untrusted, so the hint bounds only the initial capacity; the buffer
/// still grows past this when frames really decode to more.
const MAX_HINT_BYTES: u32 = 1 << 24;

/// Append-only buffer of decoded 16-bit samples in frame arrival order.
///
/// This becomes the WAV data payload once the frame sequence is
/// exhausted; nothing is written out while frames are still decoding.
#[derive(Debug, Default)]
pub struct PcmBuffer {
    samples: Vec<i16>,
}

impl PcmBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the buffer from the container's decoded-size hint, given
    /// in bytes. The hint shapes the allocation and nothing else, capped
    /// at `MAX_HINT_BYTES`.
    pub fn with_capacity_hint(bytes: u32) -> Self {
        Self {
            samples: Vec::with_capacity(bytes.min(MAX_HINT_BYTES) as usize / 2),
        }
    }

    /// Append one decoded block after everything already stored.
    pub fn append_block(&mut self, block: &[i16]) {
        self.samples.extend_from_slice(block);
    }

    /// Number of samples accumulated so far.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Size of the accumulated PCM in bytes, as a WAV data chunk counts it.
    pub fn byte_len(&self) -> usize {
        self.samples.len() * 2
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_append_in_order() {
        let mut pcm = PcmBuffer::new();
        pcm.append_block(&[1, 2, 3]);
        pcm.append_block(&[4, 5]);
        assert_eq!(pcm.samples(), &[1, 2, 3, 4, 5]);
        assert_eq!(pcm.len(), 5);
        assert_eq!(pcm.byte_len(), 10);
    }

    #[test]
    fn test_empty_buffer() {
        let pcm = PcmBuffer::new();
        assert!(pcm.is_empty());
        assert_eq!(pcm.byte_len(), 0);
        assert_eq!(pcm.samples(), &[] as &[i16]);
    }

    #[test]
    fn test_capacity_hint_does_not_add_samples() {
        let pcm = PcmBuffer::with_capacity_hint(1000);
        assert!(pcm.is_empty());
        assert_eq!(pcm.len(), 0);
    }

    #[test]
    fn test_capacity_hint_is_capped() {
        let pcm = PcmBuffer::with_capacity_hint(u32::MAX);
        assert!(pcm.samples.capacity() <= MAX_HINT_BYTES as usize);
        assert!(pcm.is_empty());
    }
}
