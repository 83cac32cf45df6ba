//! Parsing for the proprietary Speex voice container.
//!
//! The format is not standard Speex framing. A fixed 15-byte header is
//! followed by length-prefixed compressed frames packed back to back
//! until end of file:
//!
//! ```text
//! offset 0   [5 bytes]  tag, opaque (carried through, never interpreted)
//! offset 5   [4 bytes]  decoded PCM size hint in bytes, little-endian u32
//!                       (informational only; known to drift from the
//!                       actual decoded size)
//! offset 9   [4 bytes]  codec mode id, little-endian i32
//! offset 13  [2 bytes]  samples per frame, little-endian u16
//! offset 15  [1 byte]   frame length N, then N bytes of Speex bitstream,
//!                       repeated until EOF
//! ```
//!
//! There is no frame count field and no trailer; the frame sequence ends
//! exactly when the byte cursor reaches the end of the input.

use crate::error::{ConvertError, Result};

/// Total size of the fixed container header.
pub const HEADER_LEN: usize = 15;

/// Size of the opaque tag prefix.
const TAG_LEN: usize = 5;

/// Parsed fixed-layout container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Leading tag bytes, kept so the header re-serializes exactly.
    pub tag: [u8; TAG_LEN],
    /// Declared size of the decoded PCM stream in bytes. Advisory; the
    /// decode loop never trusts it.
    pub decoded_size: u32,
    /// Codec mode identifier (2 = ultra-wideband, the 32 kHz family).
    pub mode_id: i32,
    /// Decoded samples produced per compressed frame.
    pub samples_per_frame: u16,
}

impl ContainerHeader {
    /// Parse the fixed header from the start of `data`.
    ///
    /// The length check happens once up front; the offsets below match
    /// the table in the module docs.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(ConvertError::TruncatedHeader {
                len: data.len(),
                expected: HEADER_LEN,
            });
        }

        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(&data[..TAG_LEN]);
        let decoded_size = u32::from_le_bytes([data[5], data[6], data[7], data[8]]);
        let mode_id = i32::from_le_bytes([data[9], data[10], data[11], data[12]]);
        let samples_per_frame = u16::from_le_bytes([data[13], data[14]]);

        Ok(Self {
            tag,
            decoded_size,
            mode_id,
            samples_per_frame,
        })
    }

    /// Re-serialize the header exactly as it appeared on disk.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[..TAG_LEN].copy_from_slice(&self.tag);
        out[5..9].copy_from_slice(&self.decoded_size.to_le_bytes());
        out[9..13].copy_from_slice(&self.mode_id.to_le_bytes());
        out[13..15].copy_from_slice(&self.samples_per_frame.to_le_bytes());
        out
    }
}

/// A parsed container: the header plus the frame region after it.
#[derive(Debug, Clone, Copy)]
pub struct Container<'a> {
    header: ContainerHeader,
    body: &'a [u8],
}

impl<'a> Container<'a> {
    /// Parse the header and hold on to the frame region that follows it.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let header = ContainerHeader::parse(data)?;
        Ok(Self {
            header,
            body: &data[HEADER_LEN..],
        })
    }

    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    /// Iterate over the compressed frame payloads in container order.
    pub fn frames(&self) -> Frames<'a> {
        Frames {
            rest: self.body,
            index: 0,
        }
    }
}

/// Iterator over length-prefixed frames.
///
/// Yields each frame's payload in order. A length prefix that overruns
/// the input yields one [`ConvertError::TruncatedFrame`] and the iterator
/// then stays exhausted; it never resynchronizes past a bad prefix.
#[derive(Debug)]
pub struct Frames<'a> {
    rest: &'a [u8],
    index: usize,
}

impl<'a> Iterator for Frames<'a> {
    type Item = Result<&'a [u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let declared = self.rest[0] as usize;
        let remaining = self.rest.len() - 1;
        if declared > remaining {
            self.rest = &[];
            return Some(Err(ConvertError::TruncatedFrame {
                index: self.index,
                declared,
                remaining,
            }));
        }

        let payload = &self.rest[1..1 + declared];
        self.rest = &self.rest[1 + declared..];
        self.index += 1;
        Some(Ok(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes() -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(b"VOX01"); // tag
        data.extend_from_slice(&1000u32.to_le_bytes()); // decoded size hint
        data.extend_from_slice(&2i32.to_le_bytes()); // mode id (UWB)
        data.extend_from_slice(&640u16.to_le_bytes()); // samples per frame
        data
    }

    fn with_frames(frames: &[&[u8]]) -> Vec<u8> {
        let mut data = header_bytes();
        for frame in frames {
            data.push(frame.len() as u8);
            data.extend_from_slice(frame);
        }
        data
    }

    #[test]
    fn test_header_parse_fields() {
        let header = ContainerHeader::parse(&header_bytes()).unwrap();
        assert_eq!(&header.tag, b"VOX01");
        assert_eq!(header.decoded_size, 1000);
        assert_eq!(header.mode_id, 2);
        assert_eq!(header.samples_per_frame, 640);
    }

    #[test]
    fn test_header_negative_mode_id() {
        let mut data = header_bytes();
        data[9..13].copy_from_slice(&(-1i32).to_le_bytes());
        let header = ContainerHeader::parse(&data).unwrap();
        assert_eq!(header.mode_id, -1);
    }

    #[test]
    fn test_header_roundtrip() {
        let data = header_bytes();
        let header = ContainerHeader::parse(&data).unwrap();
        assert_eq!(header.to_bytes().as_slice(), data.as_slice());
    }

    #[test]
    fn test_header_short_by_one() {
        let data = header_bytes();
        let err = ContainerHeader::parse(&data[..HEADER_LEN - 1]).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::TruncatedHeader {
                len: 14,
                expected: HEADER_LEN,
            }
        ));
    }

    #[test]
    fn test_header_empty_input() {
        let err = ContainerHeader::parse(&[]).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::TruncatedHeader { len: 0, .. }
        ));
    }

    #[test]
    fn test_frames_in_order() {
        let data = with_frames(&[&[0xAA, 0xBB], &[0x01], &[0x10, 0x20, 0x30]]);
        let container = Container::parse(&data).unwrap();
        let frames: Vec<&[u8]> = container
            .frames()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0], &[0xAA, 0xBB]);
        assert_eq!(frames[1], &[0x01]);
        assert_eq!(frames[2], &[0x10, 0x20, 0x30]);
    }

    #[test]
    fn test_frames_header_only() {
        let data = header_bytes();
        let container = Container::parse(&data).unwrap();
        assert_eq!(container.frames().count(), 0);
    }

    #[test]
    fn test_frames_zero_length_payload() {
        // A zero prefix is a legal frame with an empty payload.
        let data = with_frames(&[&[], &[0x42]]);
        let container = Container::parse(&data).unwrap();
        let frames: Vec<&[u8]> = container
            .frames()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(frames[0], &[] as &[u8]);
        assert_eq!(frames[1], &[0x42]);
    }

    #[test]
    fn test_frames_truncated_tail() {
        let mut data = with_frames(&[&[0x11, 0x22]]);
        data.push(5); // declares 5 payload bytes
        data.extend_from_slice(&[0x01, 0x02]); // only 2 present
        let container = Container::parse(&data).unwrap();
        let mut frames = container.frames();

        assert_eq!(frames.next().unwrap().unwrap(), &[0x11, 0x22]);
        let err = frames.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            ConvertError::TruncatedFrame {
                index: 1,
                declared: 5,
                remaining: 2,
            }
        ));
        // Exhausted after the error; no resynchronization.
        assert!(frames.next().is_none());
    }

    #[test]
    fn test_frames_prefix_with_no_payload_bytes() {
        let mut data = header_bytes();
        data.push(1); // declares 1 byte, input ends here
        let container = Container::parse(&data).unwrap();
        let err = container.frames().next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            ConvertError::TruncatedFrame {
                index: 0,
                declared: 1,
                remaining: 0,
            }
        ));
    }

    #[test]
    fn test_frames_drain_whole_body() {
        // Every byte after the header belongs to exactly one frame record.
        let data = with_frames(&[&[1, 2, 3], &[], &[4, 5]]);
        let container = Container::parse(&data).unwrap();
        let consumed: usize = container
            .frames()
            .map(|f| 1 + f.unwrap().len())
            .sum();
        assert_eq!(consumed, data.len() - HEADER_LEN);
    }

    #[test]
    fn test_max_length_frame() {
        let payload = [0x5A; 255];
        let data = with_frames(&[&payload]);
        let container = Container::parse(&data).unwrap();
        let frames: Vec<&[u8]> = container
            .frames()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(frames[0].len(), 255);
        assert_eq!(frames[0], payload.as_slice());
    }
}
