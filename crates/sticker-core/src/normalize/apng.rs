//! APNG detection by chunk scan
//!
//! The generic decoder reports an animated PNG as a plain PNG, so animation is
//! detected by walking the raw chunk stream. An `acTL` chunk must appear before
//! the first `IDAT` for the file to be an APNG.

/// PNG file signature
const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Length + type + CRC framing around each chunk payload
const CHUNK_OVERHEAD: usize = 12;

/// Contents of an APNG `acTL` (animation control) chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationControl {
    /// Number of frames in the animation
    pub num_frames: u32,
    /// Number of times to play the animation, 0 means forever
    pub num_plays: u32,
}

impl AnimationControl {
    /// Whether the animation repeats indefinitely
    pub fn loops_forever(&self) -> bool {
        self.num_plays == 0
    }
}

/// Find the animation control chunk of an APNG
///
/// Returns `None` for non-PNG data, still PNGs and malformed chunk streams.
pub fn find_animation_control(data: &[u8]) -> Option<AnimationControl> {
    let mut rest = data.strip_prefix(PNG_SIGNATURE.as_slice())?;

    while rest.len() >= CHUNK_OVERHEAD {
        let length = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize;
        let chunk_type = &rest[4..8];
        let chunk_end = length.checked_add(CHUNK_OVERHEAD)?;
        if rest.len() < chunk_end {
            return None;
        }
        let payload = &rest[8..8 + length];

        match chunk_type {
            b"acTL" => {
                if payload.len() < 8 {
                    return None;
                }
                return Some(AnimationControl {
                    num_frames: u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]),
                    num_plays: u32::from_be_bytes([payload[4], payload[5], payload[6], payload[7]]),
                });
            }
            b"IDAT" | b"IEND" => return None,
            _ => {}
        }

        rest = &rest[chunk_end..];
    }

    None
}
